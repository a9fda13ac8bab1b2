//! Shared response body types for API handlers.

use serde::Serialize;
use taskboard_core::pagination::Page;
use taskboard_core::rights::RightFlags;
use taskboard_core::types::{DbId, UserId};
use taskboard_db::models::user::User;

/// `{ "message": ... }` body for operations with nothing else to return.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Public identity returned by register and login.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// A bare `{ "id": ... }` reference to a created row.
#[derive(Debug, Serialize)]
pub struct IdRef {
    pub id: DbId,
}

/// Rights as echoed back after a grant.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RightsSummary {
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
    pub change_status: bool,
}

impl From<RightFlags> for RightsSummary {
    fn from(flags: RightFlags) -> Self {
        Self {
            create: flags.right_to_create,
            edit: flags.right_to_edit,
            delete: flags.right_to_delete,
            change_status: flags.right_to_change_status,
        }
    }
}

/// Paginated listing body: `{ "page", "totalPages", "<key>": [...] }`.
///
/// The item key differs per resource, so it is flattened in from a
/// caller-supplied wrapper.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T: Serialize> {
    pub page: i64,
    pub total_pages: i64,
    #[serde(flatten)]
    pub items: T,
}

impl<T: Serialize> PageResponse<T> {
    pub fn from_page<I>(page: Page<I>, wrap: impl FnOnce(Vec<I>) -> T) -> Self {
        Self {
            page: page.page,
            total_pages: page.total_pages,
            items: wrap(page.items),
        }
    }
}
