//! Parsing of identifiers that arrive as raw path segments.
//!
//! Path ids are parsed here rather than by the router so that a malformed id
//! yields a message naming the offending parameter, before any lookup.

use crate::error::CoreError;
use crate::types::{DbId, UserId};

/// Parse a numeric id, e.g. `'collectionId' must be a number`.
pub fn parse_db_id(raw: &str, field: &str) -> Result<DbId, CoreError> {
    raw.trim()
        .parse::<DbId>()
        .map_err(|_| CoreError::validation(format!("'{field}' must be a number")))
}

/// Parse a user id (UUID).
pub fn parse_user_id(raw: &str, field: &str) -> Result<UserId, CoreError> {
    raw.trim()
        .parse::<UserId>()
        .map_err(|_| CoreError::validation(format!("'{field}' must be a valid id")))
}
