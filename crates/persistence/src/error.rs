//! Error types for the persistence layer.
//!
//! Errors are grouped by category: record state, concurrency control and
//! backend failures. The REST layer maps the first two onto client-facing
//! outcomes and treats everything else as a server fault.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

use crate::types::PatientId;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Record state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Concurrency and versioning errors
    #[error(transparent)]
    Concurrency(#[from] ConcurrencyError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors related to record state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The requested record was not found.
    #[error("patient not found: {id}")]
    NotFound { id: PatientId },

    /// Another record already holds the same document pair.
    #[error("duplicate document: {document_type} {document_number}")]
    DuplicateDocument {
        document_type: String,
        document_number: String,
    },
}

/// Errors related to concurrency control.
#[derive(Error, Debug)]
pub enum ConcurrencyError {
    /// The row version supplied by the caller no longer matches the stored row.
    #[error("version conflict on patient {id}: expected {expected_version}, found {actual_version}")]
    VersionConflict {
        id: PatientId,
        expected_version: String,
        actual_version: String,
    },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Connection pool exhausted.
    #[error("connection pool exhausted for {backend_name}")]
    PoolExhausted { backend_name: String },

    /// Schema migration error.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Query execution error.
    #[error("query execution failed: {message}")]
    QueryError { message: String },

    /// Stored data could not be decoded.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Returns true for the two conflict kinds the API reports as 409.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StorageError::Resource(ResourceError::DuplicateDocument { .. })
                | StorageError::Concurrency(_)
        )
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "sqlite".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<r2d2::Error> for StorageError {
    fn from(_err: r2d2::Error) -> Self {
        StorageError::Backend(BackendError::PoolExhausted {
            backend_name: "sqlite".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StorageError::Resource(ResourceError::NotFound { id: 42 });
        assert_eq!(err.to_string(), "patient not found: 42");
    }

    #[test]
    fn test_version_conflict_display() {
        let err = ConcurrencyError::VersionConflict {
            id: 7,
            expected_version: "AAAAAAAAB9E=".to_string(),
            actual_version: "AAAAAAAAB9I=".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "version conflict on patient 7: expected AAAAAAAAB9E=, found AAAAAAAAB9I="
        );
    }

    #[test]
    fn test_duplicate_document_display() {
        let err = ResourceError::DuplicateDocument {
            document_type: "CC".to_string(),
            document_number: "123".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate document: CC 123");
    }

    #[test]
    fn test_is_conflict() {
        let duplicate: StorageError = ResourceError::DuplicateDocument {
            document_type: "CC".to_string(),
            document_number: "1".to_string(),
        }
        .into();
        assert!(duplicate.is_conflict());

        let missing: StorageError = ResourceError::NotFound { id: 1 }.into();
        assert!(!missing.is_conflict());

        let backend: StorageError = BackendError::QueryError {
            message: "boom".to_string(),
        }
        .into();
        assert!(!backend.is_conflict());
    }
}
