//! Error handling module
//!
//! Provides unified error types and handling for the entire application.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Source file not found: {}", .0.display())]
    MissingSourceFile(PathBuf),

    #[error("Invalid record at index {index} in {}: {reason}", .file.display())]
    InvalidRecord {
        file: PathBuf,
        index: usize,
        reason: String,
    },

    #[error("Invalid proposal key '{key}' in {}: {reason}", .file.display())]
    InvalidProposalKey {
        file: PathBuf,
        key: String,
        reason: String,
    },

    #[error("Malformed JSON in {}: {source}", .file.display())]
    Json {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {}: {source}", .file.display())]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Question index {index} is out of range (0..{total})")]
    IndexOutOfRange { index: usize, total: usize },

    #[error("No pending proposal for question index {0}")]
    ProposalNotFound(usize),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl AppError {
    pub fn io(file: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            file: file.into(),
            source,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match &self {
            AppError::MissingSourceFile(_) => {
                error!("{}", self);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "MISSING_SOURCE_FILE",
                    self.to_string(),
                    None,
                )
            }
            AppError::InvalidRecord { .. }
            | AppError::InvalidProposalKey { .. }
            | AppError::Json { .. } => {
                error!("Store corruption: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INVALID_STORE",
                    "A data file could not be read".to_string(),
                    Some(self.to_string()),
                )
            }
            AppError::Io { .. } => {
                error!("Storage error: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                    Some(self.to_string()),
                )
            }
            AppError::IndexOutOfRange { .. } => (
                StatusCode::NOT_FOUND,
                "INDEX_OUT_OF_RANGE",
                self.to_string(),
                None,
            ),
            AppError::ProposalNotFound(_) => (
                StatusCode::NOT_FOUND,
                "PROPOSAL_NOT_FOUND",
                self.to_string(),
                None,
            ),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                msg.clone(),
                None,
            ),
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            error: details,
            code: Some(error_code.to_string()),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_record_names_index_and_file() {
        let err = AppError::InvalidRecord {
            file: PathBuf::from("data/input_data.json"),
            index: 7,
            reason: "missing field `correct`".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("index 7"));
        assert!(text.contains("data/input_data.json"));
        assert!(text.contains("missing field `correct`"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::ProposalNotFound(3).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::IndexOutOfRange { index: 9, total: 3 }.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Unauthorized("no".into()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::MissingSourceFile(PathBuf::from("x.json")).into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
