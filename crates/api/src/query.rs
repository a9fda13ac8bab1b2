//! Shared query parameter types for API handlers.

use serde::Deserialize;
use taskboard_core::error::CoreError;
use taskboard_core::pagination::PageRequest;
use taskboard_core::task::{parse_status_filter, TaskSortField};
use taskboard_db::models::task::TaskListQuery;

/// Pagination parameters (`?page=&limit=`).
///
/// Values are clamped by [`PageRequest::new`].
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// Query parameters for `GET /collections/{collection_id}/tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    #[serde(default, rename = "statuses[]", alias = "statuses")]
    pub statuses: Vec<String>,
}

impl TaskListParams {
    /// Validate the filter and sort key into a store query.
    pub fn into_query(self) -> Result<TaskListQuery, CoreError> {
        let sort = match self.sort.as_deref() {
            None | Some("") => TaskSortField::default(),
            Some(raw) => raw.parse()?,
        };
        Ok(TaskListQuery {
            statuses: parse_status_filter(&self.statuses)?,
            sort,
            page: PageRequest::new(self.page, self.limit),
        })
    }
}
