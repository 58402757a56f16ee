//! REST API error types
//!
//! Every failure becomes `{"error":{"code","message","field?"}}` with a
//! matching HTTP status.

use sse_hub::HubError;

use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// Inner error body with code, message, and optional field
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code (e.g., "NOT_FOUND", "SLOW_CLIENT")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Field name if this is a validation error for a specific field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// API errors with associated HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    /// Subscriber not registered (404)
    #[error("Resource not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    /// Subscriber outbox full or its reader gone (409)
    #[error("Subscriber not ready: {message} {location}")]
    NotReady {
        message: String,
        location: ErrorLocation,
    },

    /// Validation error (400)
    #[error("Validation failed: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    /// Registry shut down (503)
    #[error("Service unavailable: {message} {location}")]
    Unavailable {
        message: String,
        location: ErrorLocation,
    },

    /// Internal server error (500)
    #[error("Internal error: {code}: {message} {location}")]
    Internal {
        code: &'static str,
        message: String,
        location: ErrorLocation,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::error!("{}", self);

        let (status, body) = match self {
            ApiError::NotFound { message, .. } => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".into(),
                    message,
                    field: None,
                },
            ),
            ApiError::NotReady { message, .. } => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    code: "SLOW_CLIENT".into(),
                    message,
                    field: None,
                },
            ),
            ApiError::Validation { message, field, .. } => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "VALIDATION_ERROR".into(),
                    message,
                    field,
                },
            ),
            ApiError::Unavailable { message, .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiErrorBody {
                    code: "REGISTRY_CLOSED".into(),
                    message,
                    field: None,
                },
            ),
            ApiError::Internal { code, message, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: code.into(),
                    message,
                    field: None,
                },
            ),
        };

        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Convert registry errors to API errors
impl From<HubError> for ApiError {
    #[track_caller]
    fn from(e: HubError) -> Self {
        let location = ErrorLocation::from(Location::caller());

        match e {
            HubError::NotFound { subscriber_id, .. } => ApiError::NotFound {
                message: format!("client {} not found", subscriber_id),
                location,
            },
            HubError::NotReady { subscriber_id, .. } => ApiError::NotReady {
                message: format!("client {} not ready to receive messages", subscriber_id),
                location,
            },
            HubError::Closed { .. } => ApiError::Unavailable {
                message: "Registry is shut down".to_string(),
                location,
            },
            HubError::ValidationError { message, field, .. } => ApiError::Validation {
                message,
                field,
                location,
            },
            HubError::InvalidCapacity { requested, max, .. } => ApiError::Validation {
                message: format!("buffer must be 1-{}, got {}", max, requested),
                field: Some("buffer".to_string()),
                location,
            },
            other => ApiError::Internal {
                code: other.error_code(),
                message: other.to_string(),
                location,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
