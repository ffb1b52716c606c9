//! Error types for the patients API.
//!
//! This module defines all error types used throughout the REST API layer,
//! with automatic conversion to JSON problem responses.
//!
//! # Error Mapping
//!
//! Storage errors from the persistence layer are mapped to HTTP status codes:
//!
//! | Storage Error | HTTP Status | Code |
//! |--------------|-------------|------|
//! | NotFound | 404 | not-found |
//! | DuplicateDocument | 409 | duplicate-document |
//! | VersionConflict | 409 | concurrency-conflict |
//! | anything else | 500 | internal-error |
//!
//! # Response Body
//!
//! ```json
//! {
//!   "status": 400,
//!   "code": "validation-failed",
//!   "message": "One or more fields are invalid",
//!   "errors": [{ "field": "email", "message": "email must be a valid address" }]
//! }
//! ```

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use patients_persistence::error::{ConcurrencyError, ResourceError, StorageError};
use patients_persistence::types::PatientId;
use serde::Serialize;

use crate::validation::{FieldError, ValidationErrors};

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// One or more payload fields failed validation (HTTP 400).
    ValidationFailed {
        /// Every failing field with its message.
        errors: Vec<FieldError>,
    },

    /// Malformed request outside field validation (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Patient not found (HTTP 404).
    NotFound {
        /// The requested id.
        id: PatientId,
    },

    /// Another patient already holds the document pair (HTTP 409).
    DuplicateDocument {
        /// Document type.
        document_type: String,
        /// Document number.
        document_number: String,
    },

    /// The row version supplied by the client is stale (HTTP 409).
    ConcurrencyConflict {
        /// Message describing the conflict.
        message: String,
    },

    /// Unsupported media type (HTTP 415).
    UnsupportedMediaType {
        /// The unsupported content type.
        content_type: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message. Logged, never sent to the client.
        message: String,
    },
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::ValidationFailed { errors } => {
                write!(f, "Validation failed: ")?;
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", error)?;
                }
                Ok(())
            }
            RestError::BadRequest { message } => {
                write!(f, "Bad request: {}", message)
            }
            RestError::NotFound { id } => {
                write!(f, "Patient not found: {}", id)
            }
            RestError::DuplicateDocument {
                document_type,
                document_number,
            } => {
                write!(
                    f,
                    "Duplicate document: {} {}",
                    document_type, document_number
                )
            }
            RestError::ConcurrencyConflict { message } => {
                write!(f, "Concurrency conflict: {}", message)
            }
            RestError::UnsupportedMediaType { content_type } => {
                write!(f, "Unsupported media type: {}", content_type)
            }
            RestError::InternalError { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for RestError {}

impl RestError {
    /// Returns the HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::ValidationFailed { .. } | RestError::BadRequest { .. } => {
                StatusCode::BAD_REQUEST
            }
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::DuplicateDocument { .. } | RestError::ConcurrencyConflict { .. } => {
                StatusCode::CONFLICT
            }
            RestError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            RestError::ValidationFailed { .. } => "validation-failed",
            RestError::BadRequest { .. } => "bad-request",
            RestError::NotFound { .. } => "not-found",
            RestError::DuplicateDocument { .. } => "duplicate-document",
            RestError::ConcurrencyConflict { .. } => "concurrency-conflict",
            RestError::UnsupportedMediaType { .. } => "unsupported-media-type",
            RestError::InternalError { .. } => "internal-error",
        }
    }
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// HTTP status code.
    pub status: u16,
    /// Machine-readable error code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Field-level details for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let (message, errors) = match self {
            RestError::ValidationFailed { errors } => (
                "One or more fields are invalid".to_string(),
                Some(errors),
            ),
            RestError::BadRequest { message } => (message, None),
            RestError::NotFound { id } => (format!("Patient {} not found", id), None),
            RestError::DuplicateDocument {
                document_type,
                document_number,
            } => (
                format!(
                    "A patient with document {} {} already exists",
                    document_type, document_number
                ),
                None,
            ),
            RestError::ConcurrencyConflict { message } => (message, None),
            RestError::UnsupportedMediaType { content_type } => (
                format!("Content type '{}' is not supported", content_type),
                None,
            ),
            RestError::InternalError { message } => {
                tracing::error!(error = %message, "Request failed with internal error");
                ("An internal error occurred".to_string(), None)
            }
        };

        let body = ErrorBody {
            status: status.as_u16(),
            code,
            message,
            errors,
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for RestError {
    fn from(errors: ValidationErrors) -> Self {
        RestError::ValidationFailed {
            errors: errors.into_inner(),
        }
    }
}

// Implement conversions from storage errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Resource(e) => e.into(),
            StorageError::Concurrency(e) => e.into(),
            StorageError::Backend(e) => RestError::InternalError {
                message: e.to_string(),
            },
        }
    }
}

impl From<ResourceError> for RestError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { id } => RestError::NotFound { id },
            ResourceError::DuplicateDocument {
                document_type,
                document_number,
            } => RestError::DuplicateDocument {
                document_type,
                document_number,
            },
        }
    }
}

impl From<ConcurrencyError> for RestError {
    fn from(err: ConcurrencyError) -> Self {
        match err {
            ConcurrencyError::VersionConflict { id, .. } => RestError::ConcurrencyConflict {
                message: format!(
                    "Patient {} was modified by another request; re-read it and retry",
                    id
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patients_persistence::error::BackendError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            RestError::NotFound { id: 1 }.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RestError::ValidationFailed { errors: vec![] }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RestError::UnsupportedMediaType {
                content_type: "text/plain".to_string()
            }
            .status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }

    #[test]
    fn test_from_storage_not_found() {
        let err: RestError = StorageError::Resource(ResourceError::NotFound { id: 9 }).into();
        assert!(matches!(err, RestError::NotFound { id: 9 }));
    }

    #[test]
    fn test_from_storage_conflicts() {
        let dup: RestError = StorageError::Resource(ResourceError::DuplicateDocument {
            document_type: "CC".to_string(),
            document_number: "1".to_string(),
        })
        .into();
        assert_eq!(dup.status(), StatusCode::CONFLICT);
        assert_eq!(dup.code(), "duplicate-document");

        let stale: RestError = StorageError::Concurrency(ConcurrencyError::VersionConflict {
            id: 3,
            expected_version: "a".to_string(),
            actual_version: "b".to_string(),
        })
        .into();
        assert_eq!(stale.status(), StatusCode::CONFLICT);
        assert_eq!(stale.code(), "concurrency-conflict");
    }

    #[test]
    fn test_backend_errors_are_internal() {
        let err: RestError = StorageError::Backend(BackendError::QueryError {
            message: "disk I/O error".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_display() {
        let err = RestError::ValidationFailed {
            errors: vec![
                FieldError::new("firstName", "firstName is required"),
                FieldError::new("email", "email must be a valid address"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Validation failed: firstName: firstName is required; email: email must be a valid address"
        );
    }
}
