//! Authentication primitives: identity tokens, password hashing, and the
//! session cookie.
//!
//! - [`jwt`] -- The [`TokenIssuer`](jwt::TokenIssuer) seam and its HS256 implementation.
//! - [`password`] -- Argon2id hashing and verification.
//! - [`cookie`] -- Building and clearing the `userToken` cookie.

pub mod cookie;
pub mod jwt;
pub mod password;
