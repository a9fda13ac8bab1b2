//! Request extractors shared by handlers.
//!
//! - [`auth::AuthUser`] -- The authenticated user, resolved from the `userToken` cookie.

pub mod auth;
