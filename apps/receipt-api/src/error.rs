//! # API Error Type
//!
//! HTTP projection of service failures.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Receipt API                        │
//! │                                                                         │
//! │  Handler                                                               │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  ServiceError::Validation ──► 400 "The receipt is invalid"             │
//! │  ServiceError::NotFound   ──► 404 "No receipt found for that id"       │
//! │  ServiceError::Storage    ──► 500 generic message, details logged      │
//! │                                                                         │
//! │  Response body:                                                         │
//! │  { "status_code": 404, "message": "No receipt found for that id" }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation details never reach the client; they are logged at the
//! service boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::service::ServiceError;

/// Message for any rejected or undecodable receipt.
pub const INVALID_RECEIPT_MESSAGE: &str = "The receipt is invalid";

/// Message for an unknown receipt id.
pub const RECEIPT_NOT_FOUND_MESSAGE: &str = "No receipt found for that id";

/// API error returned from HTTP handlers.
///
/// ## Serialization
/// ```json
/// {
///   "status_code": 400,
///   "message": "The receipt is invalid"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    /// HTTP status code, repeated in the body
    pub status_code: u16,

    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status_code: status.as_u16(),
            message: message.into(),
        }
    }

    /// 400 for a receipt that failed decoding or validation.
    pub fn invalid_receipt() -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, INVALID_RECEIPT_MESSAGE)
    }

    /// 404 for an unknown receipt id.
    pub fn receipt_not_found() -> Self {
        ApiError::new(StatusCode::NOT_FOUND, RECEIPT_NOT_FOUND_MESSAGE)
    }

    /// 405 naming the one accepted method of a route.
    pub fn method_not_allowed(route: &str, accepted: &str) -> Self {
        ApiError::new(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("method not allowed, {route} only accepts {accepted} requests"),
        )
    }

    /// 500 with a generic message.
    pub fn internal() -> Self {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Converts service errors to API errors.
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(_) => ApiError::invalid_receipt(),
            ServiceError::NotFound(_) => ApiError::receipt_not_found(),
            ServiceError::Storage(e) => {
                // Log the actual error but return a generic message
                tracing::error!(error = %e, "Receipt storage failed");
                ApiError::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.status_code, self.message)
    }
}

impl std::error::Error for ApiError {}
