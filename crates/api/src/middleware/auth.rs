//! Cookie-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use taskboard_core::error::CoreError;
use taskboard_core::types::UserId;

use crate::auth::cookie::AUTH_COOKIE;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from the `userToken` cookie.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: UserId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(AUTH_COOKIE).map(|c| c.value()).unwrap_or_default();
        if token.is_empty() {
            return Err(unauthorized());
        }

        let user_id = state.tokens.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected session cookie");
            unauthorized()
        })?;

        Ok(AuthUser { user_id })
    }
}

fn unauthorized() -> AppError {
    AppError::Core(CoreError::Unauthorized("Unauthorized".into()))
}
