//! Handlers for the `/auth` resource (register, login, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::cookie::{removal_cookie, session_cookie};
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::handlers::validate_body;
use crate::response::{MessageResponse, UserSummary};
use crate::services::auth::{Registration, Session};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "name must be between 1 and 50 characters"))]
    pub name: String,
    #[validate(
        email(message = "email must be a valid email address"),
        length(max = 50, message = "email must be at most 50 characters")
    )]
    pub email: String,
    #[validate(length(min = 6, max = 50, message = "password must be between 6 and 50 characters"))]
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: UserSummary,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account and set the session cookie.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, CookieJar, Json<AuthResponse>)> {
    validate_body(&input)?;

    let session = state
        .auth
        .register(Registration {
            name: input.name,
            email: input.email,
            password: input.password,
        })
        .await?;

    let (jar, user) = sign_in(&state, jar, session);
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            message: "User registered successfully",
            user,
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Check credentials and set the session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    validate_body(&input)?;

    let session = state.auth.login(&input.email, &input.password).await?;

    let (jar, user) = sign_in(&state, jar, session);
    Ok((
        jar,
        Json(AuthResponse {
            message: "Login successfully",
            user,
        }),
    ))
}

/// POST /api/v1/auth/logout
///
/// Expire the session cookie. Succeeds whether or not one was set.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(removal_cookie(state.config.cookie_secure));
    (jar, Json(MessageResponse::new("Logout successfully")))
}

fn sign_in(state: &AppState, jar: CookieJar, session: Session) -> (CookieJar, UserSummary) {
    let cookie = session_cookie(
        session.token,
        state.tokens.lifetime_secs(),
        state.config.cookie_secure,
    );
    (jar.add(cookie), session.user.into())
}
