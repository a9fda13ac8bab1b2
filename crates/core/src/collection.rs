//! Collection input limits.

use crate::error::CoreError;

/// Maximum collection name length in characters (after trimming).
pub const COLLECTION_NAME_MAX_LEN: usize = 50;

/// Trim a collection name and check it is non-empty and within bounds.
pub fn normalize_collection_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation("name must not be empty"));
    }
    if trimmed.chars().count() > COLLECTION_NAME_MAX_LEN {
        return Err(CoreError::validation(format!(
            "name must be at most {COLLECTION_NAME_MAX_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}
