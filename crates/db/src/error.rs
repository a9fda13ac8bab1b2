/// Errors raised by a store implementation.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    /// A write would duplicate a value guarded by the named unique constraint.
    #[error("Duplicate value violates unique constraint: {0}")]
    UniqueViolation(&'static str),

    /// A write references a row that does not exist.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(&'static str),
}

pub type DbResult<T> = Result<T, DbError>;
