//! Wrappers around the stock extractors whose rejections become
//! [`AppError`]s, so malformed input gets the uniform error body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string, with repeated keys (`statuses[]=a&statuses[]=b`) collected into sequences.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum_extra::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Raw path parameters. Ids are parsed by the handlers so that errors name the field.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
