pub mod auth;
pub mod collection;
pub mod health;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/logout                                     logout
///
/// /users/me                                        own profile (auth required)
///
/// /collections                                     list, create
/// /collections/{collection_id}                     delete (creator only)
/// /collections/{collection_id}/users               list members
/// /collections/{collection_id}/users/{user_id}     set rights (PATCH), remove (DELETE)
/// /collections/{collection_id}/tasks               list, create
/// /collections/{collection_id}/tasks/{task_id}     edit (PUT), delete
/// /collections/{collection_id}/tasks/{task_id}/status
///                                                  change status (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", user::router())
        .nest("/collections", collection::router())
}
