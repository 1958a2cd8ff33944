//! Error Types for the Dealsheet API
//!
//! - `ErrorCode` names each failure category and fixes its HTTP status
//! - `ApiError` is what every handler returns on failure
//! - `IntoResponse` renders `{"status": false, "code": ..., "message": ...}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dealsheet_core::{DealsheetError, NotFound, StoreError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Request validation failed
    ValidationFailed,

    /// Request body could not be parsed
    InvalidInput,

    /// Required field is missing from request
    MissingField,

    /// Deal stage is not one of the known stages
    UnknownStage,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// No row carries the requested key
    RecordNotFound,

    /// No handler for the requested path
    RouteNotFound,

    // ========================================================================
    // Server Errors (5xx)
    // ========================================================================
    /// The sheet does not have the columns the service expects
    SchemaMismatch,

    /// The store is missing required settings
    ConfigurationError,

    /// The remote spreadsheet could not be reached or refused the call
    UpstreamError,

    InternalError,
}

impl ErrorCode {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationFailed
            | ErrorCode::InvalidInput
            | ErrorCode::MissingField
            | ErrorCode::UnknownStage => StatusCode::BAD_REQUEST,

            ErrorCode::RecordNotFound | ErrorCode::RouteNotFound => StatusCode::NOT_FOUND,

            ErrorCode::UpstreamError => StatusCode::BAD_GATEWAY,

            ErrorCode::SchemaMismatch
            | ErrorCode::ConfigurationError
            | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Request validation failed",
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::MissingField => "Required field is missing",
            ErrorCode::UnknownStage => "Unknown deal stage",
            ErrorCode::RecordNotFound => "Record not found",
            ErrorCode::RouteNotFound => "No such route",
            ErrorCode::SchemaMismatch => "Sheet layout does not match",
            ErrorCode::ConfigurationError => "Store is not configured",
            ErrorCode::UpstreamError => "Spreadsheet request failed",
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Required field '{}' is missing", field),
        )
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Wire shape of an error response.
#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    status: bool,
    #[serde(flatten)]
    error: &'a ApiError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorEnvelope {
            status: false,
            error: &self,
        });
        (status, body).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// CONVERSIONS FROM DOMAIN ERRORS
// ============================================================================

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(NotFound::Row { .. }) => {
                ApiError::new(ErrorCode::RecordNotFound, err.to_string())
            }
            StoreError::NotFound(NotFound::Column { .. } | NotFound::Header { .. }) => {
                tracing::error!(error = %err, "Sheet layout mismatch");
                ApiError::new(ErrorCode::SchemaMismatch, err.to_string())
            }
            StoreError::Configuration { .. } => {
                tracing::error!(error = %err, "Store misconfigured");
                ApiError::new(ErrorCode::ConfigurationError, err.to_string())
            }
            StoreError::Transport { .. } => {
                tracing::error!(error = %err, "Spreadsheet request failed");
                ApiError::new(ErrorCode::UpstreamError, err.to_string())
            }
            StoreError::LockPoisoned => {
                tracing::error!(error = %err, "Store lock poisoned");
                ApiError::from_code(ErrorCode::InternalError)
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let code = match &err {
            ValidationError::RequiredFieldMissing { .. } => ErrorCode::MissingField,
            ValidationError::UnknownStage { .. } => ErrorCode::UnknownStage,
            ValidationError::InvalidFieldValue { .. } => ErrorCode::ValidationFailed,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<DealsheetError> for ApiError {
    fn from(err: DealsheetError) -> Self {
        match err {
            DealsheetError::Store(e) => e.into(),
            DealsheetError::Validation(e) => e.into(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::UnknownStage.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::RecordNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::SchemaMismatch.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ErrorCode::UpstreamError.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_store_errors_map_by_kind() {
        let row = ApiError::from(StoreError::from(NotFound::Row {
            table: "Deals".to_string(),
            column: "id".to_string(),
            value: "D-1".to_string(),
        }));
        assert_eq!(row.code, ErrorCode::RecordNotFound);

        let column = ApiError::from(StoreError::from(NotFound::Column {
            table: "Deals".to_string(),
            column: "id".to_string(),
        }));
        assert_eq!(column.code, ErrorCode::SchemaMismatch);

        let transport = ApiError::from(StoreError::transport("read_rows", "HTTP 503"));
        assert_eq!(transport.code, ErrorCode::UpstreamError);
        assert!(transport.message.contains("HTTP 503"));

        let config = ApiError::from(StoreError::configuration("GOOGLE_SHEETS_SPREADSHEET_ID", "not set"));
        assert_eq!(config.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_errors_are_bad_requests() {
        let err = ApiError::from(ValidationError::UnknownStage {
            value: "maybe".to_string(),
        });
        assert_eq!(err.code, ErrorCode::UnknownStage);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.message.contains("maybe"));
    }

    #[test]
    fn test_error_envelope_shape() {
        let err = ApiError::missing_field("title");
        let json = serde_json::to_value(ErrorEnvelope {
            status: false,
            error: &err,
        })
        .unwrap();
        assert_eq!(json["status"], false);
        assert_eq!(json["code"], "MISSING_FIELD");
        assert!(json["message"].as_str().unwrap().contains("title"));
    }
}
