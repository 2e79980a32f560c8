//! Structured error types for API responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::fmt;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    MissingRequiredField,
    InvalidFieldValue,

    // Not found errors
    TaskNotFound,
    ProjectNotFound,

    // Conflict errors
    TaskAlreadyExists,
    ProjectAlreadyExists,

    // Internal errors
    StorageError,
    InternalError,
}

/// Broad error category; determines the HTTP status code.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Storage,
}

impl ErrorKind {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structured error surfaced to API clients.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
    pub code: ErrorCode,
}

impl ApiError {
    pub fn new(kind: ErrorKind, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
        }
    }

    // Convenience constructors

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorKind::Validation,
            ErrorCode::MissingRequiredField,
            format!("{} is required", field),
        )
    }

    pub fn invalid_value(field: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::Validation,
            ErrorCode::InvalidFieldValue,
            format!("Invalid {}: {}", field, reason),
        )
    }

    pub fn task_not_found(task_id: &str) -> Self {
        Self::new(
            ErrorKind::NotFound,
            ErrorCode::TaskNotFound,
            format!("Task not found: {}", task_id),
        )
    }

    pub fn project_not_found(name: &str) -> Self {
        Self::new(
            ErrorKind::NotFound,
            ErrorCode::ProjectNotFound,
            format!("Project not found: {}", name),
        )
    }

    pub fn task_exists(task_id: &str) -> Self {
        Self::new(
            ErrorKind::Conflict,
            ErrorCode::TaskAlreadyExists,
            format!("Task {} already exists", task_id),
        )
    }

    pub fn project_exists(name: &str) -> Self {
        Self::new(
            ErrorKind::Conflict,
            ErrorCode::ProjectAlreadyExists,
            format!("Project '{}' already exists", name),
        )
    }

    pub fn storage(err: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::Storage,
            ErrorCode::StorageError,
            format!("Storage error: {}", err),
        )
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Storage, ErrorCode::InternalError, err.to_string())
    }

    /// Error body shape sent over the wire: `{"error": {...}}`.
    pub fn to_body(&self) -> serde_json::Value {
        json!({ "error": self })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

// Allow using ? with anyhow errors by converting them
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ApiError>() {
            Ok(api_err) => api_err,
            Err(err) => ApiError::internal(err),
        }
    }
}

impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        ApiError::storage(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status();
        if status.is_server_error() {
            tracing::error!(code = ?self.code, message = %self.message, "Request failed");
        }
        (status, Json(self.to_body())).into_response()
    }
}

/// Result type for API and service operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_to_expected_status() {
        assert_eq!(ErrorKind::Validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::Conflict.status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorKind::Storage.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn body_has_error_envelope_with_type_message_code() {
        let body = ApiError::task_not_found("abc").to_body();
        assert_eq!(body["error"]["type"], "not_found");
        assert_eq!(body["error"]["code"], "TASK_NOT_FOUND");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("abc"));
    }

    #[test]
    fn anyhow_round_trip_preserves_api_error() {
        let original = ApiError::project_exists("Work");
        let err: anyhow::Error = original.into();
        let recovered: ApiError = err.into();
        assert_eq!(recovered.code, ErrorCode::ProjectAlreadyExists);
        assert_eq!(recovered.kind, ErrorKind::Conflict);
    }
}
