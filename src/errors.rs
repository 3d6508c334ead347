use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::importer::ImportError;

/// JSON error envelope returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Bad Request")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Service-layer error taxonomy
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<ImportError> for ServiceError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::UnreadableFile(_) | ImportError::UnsupportedFormat(_) => {
                ServiceError::InvalidInput(err.to_string())
            }
            ImportError::IncompleteMapping { .. } => ServiceError::ValidationError(err.to_string()),
        }
    }
}

impl ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::DatabaseError(_) | ServiceError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn category(&self) -> &'static str {
        match self {
            ServiceError::DatabaseError(_) | ServiceError::InternalError(_) => {
                "Internal Server Error"
            }
            ServiceError::NotFound(_) => "Not Found",
            ServiceError::ValidationError(_) => "Unprocessable Entity",
            ServiceError::InvalidInput(_) => "Bad Request",
            ServiceError::Unauthorized(_) => "Unauthorized",
            ServiceError::Forbidden(_) => "Forbidden",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Do not leak datastore internals to the caller
        let message = match &self {
            ServiceError::DatabaseError(e) => {
                tracing::error!("Database error: {}", e);
                "A database error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: self.category().to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ServiceError::ValidationError("bad mapping".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServiceError::InvalidInput("garbage file".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Forbidden("no import permission".into()).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn import_error_conversion() {
        let err: ServiceError = ImportError::UnreadableFile("not a workbook".into()).into();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let err: ServiceError = ImportError::IncompleteMapping {
            missing: vec![crate::importer::ProductField::Price],
            conflicting: vec![],
        }
        .into();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }
}
