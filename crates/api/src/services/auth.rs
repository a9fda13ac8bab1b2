//! Registration and login.

use std::sync::Arc;

use taskboard_core::error::CoreError;
use taskboard_db::models::user::{CreateUser, User};
use taskboard_db::{DbError, Gateway};

use crate::auth::jwt::TokenIssuer;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// A user together with a freshly issued identity token.
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Fields of a registration, already shape-validated by the caller.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct AuthService {
    gateway: Arc<dyn Gateway>,
    tokens: Arc<dyn TokenIssuer>,
}

impl AuthService {
    pub fn new(gateway: Arc<dyn Gateway>, tokens: Arc<dyn TokenIssuer>) -> Self {
        Self { gateway, tokens }
    }

    /// Create an account and sign it in.
    pub async fn register(&self, input: Registration) -> AppResult<Session> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(CoreError::validation("name must not be empty").into());
        }

        if self.gateway.find_user_by_email(&input.email).await?.is_some() {
            return Err(email_taken());
        }

        let password_hash = hash_password(&input.password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

        let user = self
            .gateway
            .create_user(&CreateUser {
                name: name.to_string(),
                email: input.email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                DbError::UniqueViolation(_) => email_taken(),
                other => other.into(),
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        self.start_session(user)
    }

    /// Check credentials. Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Session> {
        let user = self
            .gateway
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| CoreError::Unauthorized(INVALID_CREDENTIALS.into()))?;

        let password_valid = verify_password(password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
        if !password_valid {
            tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()).into());
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.start_session(user)
    }

    fn start_session(&self, user: User) -> AppResult<Session> {
        let token = self
            .tokens
            .issue(user.id)
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        Ok(Session { user, token })
    }
}

fn email_taken() -> AppError {
    CoreError::Conflict("This email already exists".into()).into()
}
