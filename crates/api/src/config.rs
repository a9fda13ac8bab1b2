use std::str::FromStr;

use axum::http::HeaderValue;
use taskboard_core::rights::ReadPolicy;

use crate::auth::jwt::JwtConfig;

/// A missing or unparsable configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Which persistence gateway the server runs against.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    /// In-process store; state is lost on restart.
    Memory,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}', expected 'text' or 'json'")),
        }
    }
}

impl LogFormat {
    /// Read `LOG_FORMAT` from the environment, falling back to text output.
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

/// Server configuration loaded from environment variables.
///
/// Everything except `JWT_SECRET` (and `DATABASE_URL` for PostgreSQL storage)
/// has a default suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub storage: StorageConfig,
    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
    /// How non-creators are granted read access to a collection.
    pub read_policy: ReadPolicy,
    pub log_format: LogFormat,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `STORAGE`                  | `postgres` (or `memory`)   |
    /// | `DATABASE_URL`             | required for `postgres`    |
    /// | `DATABASE_MAX_CONNECTIONS` | `20`                       |
    /// | `COOKIE_SECURE`            | `false`                    |
    /// | `READ_POLICY`              | `membership`               |
    /// | `LOG_FORMAT`               | `text`                     |
    ///
    /// See [`JwtConfig::from_lookup`] for the `JWT_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or_default(lookup, "PORT", 3000)?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|origin| {
                origin.parse::<HeaderValue>().map_err(|e| ConfigError::Invalid {
                    name: "CORS_ORIGINS",
                    reason: format!("'{origin}': {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let request_timeout_secs: u64 = parse_or_default(lookup, "REQUEST_TIMEOUT_SECS", 30)?;

        let storage = match lookup("STORAGE").as_deref().map(str::trim) {
            None | Some("") | Some("postgres") => StorageConfig::Postgres {
                database_url: lookup("DATABASE_URL")
                    .filter(|s| !s.is_empty())
                    .ok_or(ConfigError::Missing("DATABASE_URL"))?,
                max_connections: parse_or_default(lookup, "DATABASE_MAX_CONNECTIONS", 20)?,
            },
            Some("memory") => StorageConfig::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE",
                    reason: format!("unknown storage '{other}', expected 'postgres' or 'memory'"),
                })
            }
        };

        let cookie_secure: bool = parse_or_default(lookup, "COOKIE_SECURE", false)?;
        let read_policy: ReadPolicy = parse_or_default(lookup, "READ_POLICY", ReadPolicy::default())?;
        let log_format: LogFormat = parse_or_default(lookup, "LOG_FORMAT", LogFormat::default())?;

        let jwt = JwtConfig::from_lookup(lookup)?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            storage,
            cookie_secure,
            read_policy,
            log_format,
            jwt,
        })
    }
}

/// Parse `name` if present, otherwise return `default`.
pub(crate) fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                name,
                reason: e.to_string(),
            })
        }
        _ => Ok(default),
    }
}
