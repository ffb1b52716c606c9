//! Application state for the patients API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the storage backend and the server configuration.

use std::sync::Arc;

use patients_persistence::core::{AuditStorage, PatientStorage};
use patients_persistence::types::{PageRequest, PatientId};

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`PatientStorage`] and [`AuditStorage`])
///
/// # Example
///
/// ```rust,ignore
/// use patients_rest::{AppState, ServerConfig};
/// use patients_persistence::backends::sqlite::SqliteBackend;
/// use std::sync::Arc;
///
/// let backend = SqliteBackend::in_memory()?;
/// let config = ServerConfig::default();
/// let state = AppState::new(Arc::new(backend), config);
/// ```
pub struct AppState<S> {
    /// The storage backend.
    storage: Arc<S>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: PatientStorage + AuditStorage> AppState<S> {
    /// Creates a new AppState with the given storage and configuration.
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        Self {
            storage,
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a clone of the storage Arc.
    pub fn storage_arc(&self) -> Arc<S> {
        Arc::clone(&self.storage)
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the principal used when a request names none.
    pub fn default_principal(&self) -> &str {
        &self.config.default_principal
    }

    /// Returns the base URL for the server.
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Returns the absolute URL of a patient.
    pub fn patient_location(&self, id: PatientId) -> String {
        format!("{}/patients/{}", self.base_url(), id)
    }

    /// Clamps raw paging parameters with the configured limits.
    pub fn page_request(&self, page: Option<i64>, page_size: Option<i64>) -> PageRequest {
        PageRequest::clamped_with(
            page.unwrap_or(1),
            page_size.unwrap_or(0),
            self.config.default_page_size,
            self.config.max_page_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use patients_persistence::error::StorageResult;
    use patients_persistence::types::{
        AuditEntry, NewAuditEntry, Page, PatientDraft, PatientFilter, PatientRecord, RowVersion,
        SortSpec,
    };

    // Mock storage for testing
    struct MockStorage;

    #[async_trait]
    impl PatientStorage for MockStorage {
        fn backend_name(&self) -> &'static str {
            "mock"
        }

        async fn insert(&self, _draft: &PatientDraft) -> StorageResult<PatientRecord> {
            unimplemented!()
        }

        async fn find_by_id(&self, _id: PatientId) -> StorageResult<Option<PatientRecord>> {
            unimplemented!()
        }

        async fn find_matching(
            &self,
            _filter: &PatientFilter,
            _sort: SortSpec,
            _offset: i64,
            _limit: Option<i64>,
        ) -> StorageResult<Page<PatientRecord>> {
            unimplemented!()
        }

        async fn update_if_version_matches(
            &self,
            _id: PatientId,
            _expected: &RowVersion,
            _draft: &PatientDraft,
        ) -> StorageResult<PatientRecord> {
            unimplemented!()
        }

        async fn delete_by_id(&self, _id: PatientId) -> StorageResult<PatientRecord> {
            unimplemented!()
        }

        async fn document_exists(
            &self,
            _document_type: &str,
            _document_number: &str,
            _exclude_id: Option<PatientId>,
        ) -> StorageResult<bool> {
            unimplemented!()
        }

        async fn health_check(&self) -> StorageResult<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl AuditStorage for MockStorage {
        async fn append(&self, _entry: &NewAuditEntry) -> StorageResult<AuditEntry> {
            unimplemented!()
        }

        async fn entries_for(&self, _entity: &str, _id: i64) -> StorageResult<Vec<AuditEntry>> {
            unimplemented!()
        }
    }

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new(Arc::new(MockStorage), ServerConfig::default());
        assert_eq!(state.storage().backend_name(), "mock");
        assert_eq!(state.default_principal(), "System");
    }

    #[test]
    fn test_patient_location() {
        let config = ServerConfig {
            base_url: "https://api.example.com/".to_string(),
            ..Default::default()
        };
        let state = AppState::new(Arc::new(MockStorage), config);
        assert_eq!(
            state.patient_location(17),
            "https://api.example.com/patients/17"
        );
    }

    #[test]
    fn test_page_request_uses_config_limits() {
        let config = ServerConfig {
            default_page_size: 5,
            max_page_size: 20,
            ..Default::default()
        };
        let state = AppState::new(Arc::new(MockStorage), config);

        let page = state.page_request(None, None);
        assert_eq!((page.page(), page.page_size()), (1, 5));

        let page = state.page_request(Some(0), Some(10_000));
        assert_eq!((page.page(), page.page_size()), (1, 20));
    }

    #[test]
    fn test_app_state_clone() {
        let state = AppState::new(Arc::new(MockStorage), ServerConfig::default());
        let cloned = state.clone();
        assert_eq!(state.default_principal(), cloned.default_principal());
    }
}
