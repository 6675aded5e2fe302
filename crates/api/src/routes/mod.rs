//! HTTP handlers, one module per resource.

pub mod auth;
pub mod customers;
pub mod employees;
pub mod products;
pub mod reports;
pub mod sales;
pub mod system;

use std::str::FromStr;

use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

use crate::error::ApiError;

/// Body of every successful mutation.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub id: i64,
}

/// A 201 answer for a newly created record.
pub fn created(message: String, id: i64) -> (StatusCode, Json<MessageResponse>) {
    (StatusCode::CREATED, Json(MessageResponse { message, id }))
}

/// A 200 answer for an edit or a delete.
pub fn done(message: String, id: i64) -> (StatusCode, Json<MessageResponse>) {
    (StatusCode::OK, Json(MessageResponse { message, id }))
}

/// Parses a row id taken from the URL path.
pub fn parse_id<T: FromStr>(entity: &str, raw: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {entity} id: {raw}")))
}
