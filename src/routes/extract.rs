//! Request extractors whose rejections use the common error body.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path},
};

use crate::error::AppError;

/// JSON request body; decoding failures answer 400 like any other invalid input.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters; a malformed board id answers 400.
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
