//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use taskboard_db::models::user::UserResponse;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
}

/// GET /api/v1/users/me
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ProfileResponse>> {
    let user = state.users.profile(auth.user_id).await?;
    Ok(Json(ProfileResponse { user }))
}
