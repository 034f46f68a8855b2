//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Keeps error bodies uniform across portal endpoints: a stable `code` plus a
//! human-readable `message`.
//!
//! # Key invariants and assumptions
//! - Status codes must align with the error code.
//! - Session tokens never appear in messages.
use crate::api::types::ErrorResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Structured API error returned by handlers.
///
/// # Example
/// ```rust
/// use axum::http::StatusCode;
/// use portal::api::error::api_validation_error;
///
/// let err = api_validation_error("path must start with '/'");
/// assert_eq!(err.status, StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn api_error(status: StatusCode, code: &str, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
            request_id: None,
        },
    }
}

/// 404 with code `not_found`.
pub fn api_not_found(message: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, "not_found", message)
}

/// 404 with code `not_enabled`, for endpoints whose backend is not configured.
pub fn api_not_enabled(message: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, "not_enabled", message)
}

/// 401 with code `unauthorized`.
pub fn api_unauthorized(message: &str) -> ApiError {
    api_error(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

/// 400 with code `validation_error`.
pub fn api_validation_error(message: &str) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "validation_error", message)
}
