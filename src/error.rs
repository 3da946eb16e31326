//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the error type returned by HTTP handlers.
//! The stores and the auth subsystem return their own typed errors
//! (`StoreError`, `TokenError`, `HashError`); the `From` implementations below
//! decide which HTTP status each of them maps to, so handlers can simply use `?`.
//!
//! `AppError` implements `actix_web::error::ResponseError` and renders every
//! variant as a JSON body of the form `{"error": "<message>"}`.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::TokenError;
use crate::store::StoreError;

/// Represents all errors surfaced to HTTP clients.
#[derive(Debug)]
pub enum AppError {
    /// Missing or rejected credentials (HTTP 401).
    Unauthorized(String),
    /// Malformed request body (HTTP 400).
    BadRequest(String),
    /// Referenced entity does not exist (HTTP 404).
    NotFound(String),
    /// Unexpected server-side failure, e.g. the hashing backend (HTTP 500).
    InternalServerError(String),
    /// Request body parsed but failed validation (HTTP 422 Unprocessable Entity).
    ValidationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let msg = match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::InternalServerError(msg)
            | AppError::ValidationError(msg) => msg,
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": msg }))
    }
}

/// Converts store failures into their HTTP counterparts.
///
/// Bad login credentials become 401 with a message that does not reveal
/// whether the username exists. Hashing and token issuance failures are
/// server-side problems.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::NotFound(_) => AppError::NotFound("Task not found".into()),
            StoreError::InvalidCredentials => AppError::Unauthorized("invalid credentials".into()),
            StoreError::Hash(e) => AppError::InternalServerError(e.to_string()),
            StoreError::Token(e) => AppError::InternalServerError(e.to_string()),
        }
    }
}

/// Token failures outside the stores only happen while checking a presented
/// credential. They all collapse to one `Unauthorized` message so clients
/// cannot tell a forged token from an expired one.
impl From<TokenError> for AppError {
    fn from(_: TokenError) -> AppError {
        AppError::Unauthorized("Unauthorized".into())
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}
