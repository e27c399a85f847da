//! Application error type mapping to HTTP status codes and body format.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use waggle_types::error::CoordinationError;

/// Application-level error that maps to HTTP responses.
///
/// Error bodies are always `{"error": "<message>"}`.
#[derive(Debug)]
pub enum ApiError {
    /// Request body was not parseable as JSON.
    InvalidJson,
    /// Request body parsed, but a required field was absent.
    MissingFields,
    /// Request was well-formed but semantically invalid.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(_: JsonRejection) -> Self {
        ApiError::InvalidJson
    }
}

impl From<CoordinationError> for ApiError {
    fn from(e: CoordinationError) -> Self {
        match e {
            CoordinationError::InvalidWeight(_) | CoordinationError::EmptyBotId => {
                ApiError::Validation(e.to_string())
            }
            CoordinationError::Storage(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidJson => (StatusCode::BAD_REQUEST, "Invalid JSON".to_string()),
            ApiError::MissingFields => (
                StatusCode::BAD_REQUEST,
                "Missing required fields".to_string(),
            ),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
