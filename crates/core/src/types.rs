/// Collection, task, and rights primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Users are identified by an opaque UUID.
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
