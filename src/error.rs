//! Service error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type surfaced by handlers. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//! Policy denials (cooldown, cut-off, unknown user) are *not* errors; they are
//! ordinary [`crate::service::ValidationOutcome`] values.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid weight_kg: must be greater than zero",
///     "details": "weight_kg"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`ApiError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details (the offending field for validation errors).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Malformed or out-of-range input, rejected before any computation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    /// Name of the offending input field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error for `field`.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Connectivity or persistence failure reported by a store adapter.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing database rejected or failed the operation.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored record could not be mapped back into a domain value.
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000–1999 | Input      | 400 Bad Request           |
/// | 3000–3999 | Server     | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body could not be decoded into the expected shape.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// Request validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Store layer failure. Fatal for the request, never retried.
    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::MalformedBody(_) => 1000,
            Self::Validation(_) => 1001,
            Self::Internal(_) => 3000,
            Self::Store(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedBody(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::Validation(err) => Some(err.field.to_string()),
            Self::MalformedBody(_) | Self::Store(_) | Self::Internal(_) => None,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request_with_field() {
        let err = ApiError::from(ValidationError::new("weight_kg", "must be greater than zero"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1001);
        assert_eq!(err.details().as_deref(), Some("weight_kg"));
        assert_eq!(
            err.to_string(),
            "invalid weight_kg: must be greater than zero"
        );
    }

    #[test]
    fn malformed_body_is_bad_request_without_field() {
        let err = ApiError::MalformedBody("missing field `weight_kg`".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1000);
        assert!(err.details().is_none());
    }

    #[test]
    fn store_failure_is_internal() {
        let err = ApiError::from(StoreError::CorruptRecord("bad sex".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), 3001);
        assert!(err.details().is_none());
    }
}
