//! Request handlers.
//!
//! Handlers are thin: they parse path ids and bodies, call one service
//! method, and shape the JSON response. All rules live in the services.

pub mod auth;
pub mod collection;
pub mod health;
pub mod task;
pub mod user;

use validator::{Validate, ValidationErrors};

use crate::error::{AppError, AppResult};

/// Run `validator` rules on a request body, reporting the first failure.
pub(crate) fn validate_body<T: Validate>(body: &T) -> AppResult<()> {
    body.validate()
        .map_err(|errors| AppError::BadRequest(first_message(&errors)))
}

/// First error message, taking fields in name order so the result is stable.
fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .find_map(|(field, errs)| {
            errs.first().map(|e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .unwrap_or_else(|| "Invalid request body".to_string())
}
