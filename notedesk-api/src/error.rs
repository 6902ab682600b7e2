/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// Handlers return `Result<T, ApiError>` and convert account errors with `?`.
///
/// # Response Format
///
/// ```json
/// {
///   "error": "conflict",
///   "message": "Username already exists"
/// }
/// ```
///
/// Validation failures add a `details` array naming the offending fields.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use notedesk_shared::{
    accounts::{AccountError, MSG_CREATE_FAILED, MSG_DUPLICATE_USERNAME, MSG_USER_HAS_NOTES},
    store::StoreError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Bad request (400) with per-field details
    ValidationError {
        message: String,
        details: Vec<ValidationErrorDetail>,
    },

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - duplicate username, user still owns notes
    Conflict(String),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "conflict")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::ValidationError { message, details } => {
                write!(f, "Validation failed: {} ({} fields)", message, details.len())
            }
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::ValidationError { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                Some(details),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert account errors to API errors
impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation { message, fields } => ApiError::ValidationError {
                details: fields
                    .into_iter()
                    .map(|field| ValidationErrorDetail {
                        message: format!("{} is missing or invalid", field),
                        field,
                    })
                    .collect(),
                message,
            },
            AccountError::Conflict(msg) => ApiError::Conflict(msg),
            AccountError::NotFound(msg) => ApiError::NotFound(msg),
            AccountError::CreateFailed(source) => {
                tracing::warn!(error = %source, "User creation failed");
                ApiError::BadRequest(MSG_CREATE_FAILED.to_string())
            }
            AccountError::Store(err) => err.into(),
            AccountError::Password(err) => {
                ApiError::InternalError(format!("Password operation failed: {}", err))
            }
        }
    }
}

/// Convert store errors to API errors
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => ApiError::Conflict(MSG_DUPLICATE_USERNAME.to_string()),
            StoreError::Referenced(_) => ApiError::Conflict(MSG_USER_HAS_NOTES.to_string()),
            StoreError::Backend(msg) => ApiError::InternalError(format!("Database error: {}", msg)),
        }
    }
}

/// Malformed JSON bodies are client errors
///
/// Covers wrong field types such as a non-array `roles` or a non-boolean
/// `active`, which axum would otherwise answer with 422.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
