//! Route definitions for the `/collections` resource, including the nested
//! member and task routes.

use axum::routing::{delete, get, patch, put};
use axum::Router;

use crate::handlers::{collection, task};
use crate::state::AppState;

/// Routes mounted at `/collections`.
///
/// ```text
/// GET    /                                        -> list_collections
/// POST   /                                        -> create_collection
/// DELETE /{collection_id}                         -> delete_collection
/// GET    /{collection_id}/users                   -> list_users
/// PATCH  /{collection_id}/users/{user_id}         -> set_user_rights
/// DELETE /{collection_id}/users/{user_id}         -> remove_user
/// GET    /{collection_id}/tasks                   -> list_tasks
/// POST   /{collection_id}/tasks                   -> create_task
/// PUT    /{collection_id}/tasks/{task_id}         -> edit_task
/// DELETE /{collection_id}/tasks/{task_id}         -> delete_task
/// PATCH  /{collection_id}/tasks/{task_id}/status  -> change_task_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(collection::list_collections).post(collection::create_collection),
        )
        .route("/{collection_id}", delete(collection::delete_collection))
        .route("/{collection_id}/users", get(collection::list_users))
        .route(
            "/{collection_id}/users/{user_id}",
            patch(collection::set_user_rights).delete(collection::remove_user),
        )
        .route(
            "/{collection_id}/tasks",
            get(task::list_tasks).post(task::create_task),
        )
        .route(
            "/{collection_id}/tasks/{task_id}",
            put(task::edit_task).delete(task::delete_task),
        )
        .route(
            "/{collection_id}/tasks/{task_id}/status",
            patch(task::change_task_status),
        )
}
