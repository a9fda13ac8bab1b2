//! Identity tokens.
//!
//! Services only see the [`TokenIssuer`] trait. [`JwtTokenIssuer`] is the
//! production implementation: HS256-signed JWTs carrying a [`Claims`] payload
//! whose subject is the user's id.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use taskboard_core::types::UserId;
use uuid::Uuid;

use crate::config::{parse_or_default, ConfigError};

/// JWT claims embedded in every identity token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's id.
    pub sub: UserId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in days (default: 7). Also the cookie's `Max-Age`.
    pub expiry_days: i64,
}

/// Default token expiry in days.
const DEFAULT_EXPIRY_DAYS: i64 = 7;

/// Upper bound on `JWT_EXPIRY_DAYS` (ten years).
const MAX_EXPIRY_DAYS: i64 = 3650;

impl JwtConfig {
    /// Load JWT configuration through `lookup` (normally the process env).
    ///
    /// | Env Var           | Required | Default |
    /// |-------------------|----------|---------|
    /// | `JWT_SECRET`      | **yes**  | --      |
    /// | `JWT_EXPIRY_DAYS` | no       | `7` (at most 3650) |
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let expiry_days: i64 = parse_or_default(lookup, "JWT_EXPIRY_DAYS", DEFAULT_EXPIRY_DAYS)?;
        if !(1..=MAX_EXPIRY_DAYS).contains(&expiry_days) {
            return Err(ConfigError::Invalid {
                name: "JWT_EXPIRY_DAYS",
                reason: format!("must be between 1 and {MAX_EXPIRY_DAYS}"),
            });
        }

        Ok(Self {
            secret,
            expiry_days,
        })
    }

    /// Token lifetime in seconds.
    pub fn expiry_secs(&self) -> i64 {
        self.expiry_days * 24 * 60 * 60
    }
}

/// Why a token could not be issued or accepted.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Failed to issue token: {0}")]
    Issue(String),

    #[error("Invalid or expired token")]
    Invalid,
}

/// Issues and validates opaque identity tokens bound to a user id.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user_id: UserId) -> Result<String, TokenError>;

    /// Resolve a token back to the user id it was issued for.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;

    /// How long an issued token stays valid, in seconds.
    fn lifetime_secs(&self) -> i64;
}

/// [`TokenIssuer`] backed by HS256 JWTs.
#[derive(Debug, Clone)]
pub struct JwtTokenIssuer {
    config: JwtConfig,
}

impl JwtTokenIssuer {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        generate_token(user_id, &self.config).map_err(|e| TokenError::Issue(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        validate_token(token, &self.config)
            .map(|claims| claims.sub)
            .map_err(|_| TokenError::Invalid)
    }

    fn lifetime_secs(&self) -> i64 {
        self.config.expiry_secs()
    }
}

/// Generate an HS256 token for the given user.
pub fn generate_token(
    user_id: UserId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        exp: now + config.expiry_secs(),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a token, returning the embedded [`Claims`].
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}
