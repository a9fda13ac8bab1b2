//! Task entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use taskboard_core::pagination::PageRequest;
use taskboard_core::task::{Priority, SortableTask, TaskSortField, TaskStatus};
use taskboard_core::types::{DbId, Timestamp};

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: DbId,
    pub collection_id: DbId,
    pub name: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SortableTask for Task {
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

/// DTO for creating a task. Status is always `new` on insert.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub collection_id: DbId,
    pub name: String,
    pub description: String,
    pub priority: Priority,
}

/// DTO for editing a task. `description: None` keeps the stored value.
///
/// Has no status field: status only changes through the status update.
#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub name: String,
    pub priority: Priority,
    pub description: Option<String>,
}

/// Filter, order, and page for a task listing.
#[derive(Debug, Clone)]
pub struct TaskListQuery {
    pub statuses: Vec<TaskStatus>,
    pub sort: TaskSortField,
    pub page: PageRequest,
}
