//! Task priority and status enums, input limits, and listing order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum task name length in characters.
pub const TASK_NAME_MAX_LEN: usize = 50;

/// Maximum task description length in characters.
pub const TASK_DESCRIPTION_MAX_LEN: usize = 500;

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Mid,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Mid, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Mid => "mid",
            Priority::High => "high",
        }
    }

    /// Ordering rank, lowest priority first.
    pub fn rank(self) -> i32 {
        match self {
            Priority::Low => 1,
            Priority::Mid => 2,
            Priority::High => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                CoreError::validation("priority must be one of the following values: low, mid, high")
            })
    }
}

impl TryFrom<String> for Priority {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle state of a task.
///
/// Any state may move to any other state; only the change-status right
/// gates the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    New,
    InProcess,
    Completed,
    Canceled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::New,
        TaskStatus::InProcess,
        TaskStatus::Completed,
        TaskStatus::Canceled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::New => "new",
            TaskStatus::InProcess => "in_process",
            TaskStatus::Completed => "completed",
            TaskStatus::Canceled => "canceled",
        }
    }

    /// Fixed listing rank: new=1, in_process=2, completed=3, canceled=4.
    pub fn rank(self) -> i32 {
        match self {
            TaskStatus::New => 1,
            TaskStatus::InProcess => 2,
            TaskStatus::Completed => 3,
            TaskStatus::Canceled => 4,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| {
                CoreError::validation(
                    "status must be one of the following values: new, in_process, completed, canceled",
                )
            })
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Parse a list of raw status filters, defaulting to every status when empty.
///
/// Duplicates are dropped while keeping first-seen order.
pub fn parse_status_filter<S: AsRef<str>>(raw: &[S]) -> Result<Vec<TaskStatus>, CoreError> {
    if raw.is_empty() {
        return Ok(TaskStatus::ALL.to_vec());
    }
    let mut statuses = Vec::with_capacity(raw.len());
    for value in raw {
        let status: TaskStatus = value.as_ref().parse()?;
        if !statuses.contains(&status) {
            statuses.push(status);
        }
    }
    Ok(statuses)
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Caller-selectable secondary sort key for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Priority,
}

impl FromStr for TaskSortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(Self::CreatedAt),
            "updatedAt" => Ok(Self::UpdatedAt),
            "priority" => Ok(Self::Priority),
            _ => Err(CoreError::validation(
                "sort must be one of the following values: createdAt, updatedAt, priority",
            )),
        }
    }
}

/// Fields a task must expose to be ordered for listing.
pub trait SortableTask {
    fn id(&self) -> DbId;
    fn status(&self) -> TaskStatus;
    fn priority(&self) -> Priority;
    fn created_at(&self) -> Timestamp;
    fn updated_at(&self) -> Timestamp;
}

/// Listing order: status rank descending, then `sort` descending, then id
/// descending so pages are stable.
pub fn compare_for_listing<T: SortableTask>(a: &T, b: &T, sort: TaskSortField) -> Ordering {
    let by_status = b.status().rank().cmp(&a.status().rank());
    let by_field = match sort {
        TaskSortField::CreatedAt => b.created_at().cmp(&a.created_at()),
        TaskSortField::UpdatedAt => b.updated_at().cmp(&a.updated_at()),
        TaskSortField::Priority => b.priority().rank().cmp(&a.priority().rank()),
    };
    by_status
        .then(by_field)
        .then_with(|| b.id().cmp(&a.id()))
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Trim and bound-check a task name.
pub fn normalize_task_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation("name must not be empty"));
    }
    if trimmed.chars().count() > TASK_NAME_MAX_LEN {
        return Err(CoreError::validation(format!(
            "name must be at most {TASK_NAME_MAX_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub fn validate_task_description(description: &str) -> Result<(), CoreError> {
    if description.chars().count() > TASK_DESCRIPTION_MAX_LEN {
        return Err(CoreError::validation(format!(
            "description must be at most {TASK_DESCRIPTION_MAX_LEN} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    struct Row {
        id: DbId,
        status: TaskStatus,
        priority: Priority,
        created_at: Timestamp,
        updated_at: Timestamp,
    }

    impl SortableTask for Row {
        fn id(&self) -> DbId {
            self.id
        }
        fn status(&self) -> TaskStatus {
            self.status
        }
        fn priority(&self) -> Priority {
            self.priority
        }
        fn created_at(&self) -> Timestamp {
            self.created_at
        }
        fn updated_at(&self) -> Timestamp {
            self.updated_at
        }
    }

    fn row(id: DbId, status: TaskStatus, priority: Priority, minutes: i64) -> Row {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Row {
            id,
            status,
            priority,
            created_at: base + Duration::minutes(minutes),
            updated_at: base + Duration::minutes(100 - minutes),
        }
    }

    fn sorted_ids(mut rows: Vec<Row>, sort: TaskSortField) -> Vec<DbId> {
        rows.sort_by(|a, b| compare_for_listing(a, b, sort));
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn status_rank_sorts_descending_before_the_sort_field() {
        let rows = vec![
            row(1, TaskStatus::New, Priority::Low, 30),
            row(2, TaskStatus::Canceled, Priority::Low, 10),
            row(3, TaskStatus::InProcess, Priority::Low, 20),
            row(4, TaskStatus::Completed, Priority::Low, 40),
        ];
        assert_eq!(sorted_ids(rows, TaskSortField::CreatedAt), vec![2, 4, 3, 1]);
    }

    #[test]
    fn secondary_key_follows_the_requested_field() {
        let rows = || {
            vec![
                row(1, TaskStatus::New, Priority::High, 10),
                row(2, TaskStatus::New, Priority::Low, 30),
                row(3, TaskStatus::New, Priority::Mid, 20),
            ]
        };
        assert_eq!(sorted_ids(rows(), TaskSortField::CreatedAt), vec![2, 3, 1]);
        assert_eq!(sorted_ids(rows(), TaskSortField::UpdatedAt), vec![1, 3, 2]);
        assert_eq!(sorted_ids(rows(), TaskSortField::Priority), vec![1, 3, 2]);
    }

    #[test]
    fn ties_break_on_id_descending() {
        let rows = vec![
            row(1, TaskStatus::New, Priority::Mid, 10),
            row(7, TaskStatus::New, Priority::Mid, 10),
            row(4, TaskStatus::New, Priority::Mid, 10),
        ];
        assert_eq!(sorted_ids(rows, TaskSortField::CreatedAt), vec![7, 4, 1]);
    }

    #[test]
    fn priority_rejects_unknown_values_with_field_message() {
        assert_eq!("mid".parse::<Priority>().unwrap(), Priority::Mid);
        assert_matches!(
            "urgent".parse::<Priority>(),
            Err(CoreError::Validation(msg)) if msg.starts_with("priority must be one of")
        );
    }

    #[test]
    fn status_round_trips_through_its_wire_name() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
        assert_matches!("done".parse::<TaskStatus>(), Err(CoreError::Validation(_)));
        assert_eq!(TaskStatus::default(), TaskStatus::New);
    }

    #[test]
    fn empty_status_filter_means_all_statuses() {
        let none: [&str; 0] = [];
        assert_eq!(parse_status_filter(&none).unwrap(), TaskStatus::ALL.to_vec());
        assert_eq!(
            parse_status_filter(&["completed", "new", "completed"]).unwrap(),
            vec![TaskStatus::Completed, TaskStatus::New]
        );
        assert!(parse_status_filter(&["new", "archived"]).is_err());
    }

    #[test]
    fn sort_field_uses_camel_case_names() {
        assert_eq!("updatedAt".parse::<TaskSortField>().unwrap(), TaskSortField::UpdatedAt);
        assert!("updated_at".parse::<TaskSortField>().is_err());
    }

    #[test]
    fn task_name_is_trimmed_and_bounded() {
        assert_eq!(normalize_task_name("  Fix bug ").unwrap(), "Fix bug");
        assert!(normalize_task_name("   ").is_err());
        assert!(normalize_task_name(&"x".repeat(51)).is_err());
        assert!(normalize_task_name(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn description_is_bounded() {
        assert!(validate_task_description(&"d".repeat(500)).is_ok());
        assert!(validate_task_description(&"d".repeat(501)).is_err());
    }
}
