//! Patient record storage trait.
//!
//! This module defines the [`PatientStorage`] trait, the record store the REST
//! layer drives. Every successful write assigns a fresh [`RowVersion`], and
//! [`PatientStorage::update_if_version_matches`] refuses to overwrite a row
//! whose version moved on since the caller read it.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{Page, PatientDraft, PatientFilter, PatientId, PatientRecord, RowVersion, SortSpec};

/// Record store for patients.
///
/// # Example
///
/// ```ignore
/// use patients_persistence::core::PatientStorage;
/// use patients_persistence::types::{PatientDraft, PatientFilter, SortSpec};
///
/// async fn example<S: PatientStorage>(storage: &S, draft: PatientDraft) -> StorageResult<()> {
///     let created = storage.insert(&draft).await?;
///
///     let mut changed = created.to_draft();
///     changed.first_name = "Maria".to_string();
///     let updated = storage
///         .update_if_version_matches(created.patient_id(), created.row_version(), &changed)
///         .await?;
///     assert_ne!(updated.row_version(), created.row_version());
///
///     let page = storage
///         .find_matching(&PatientFilter::default(), SortSpec::default(), 0, Some(10))
///         .await?;
///     assert_eq!(page.total, 1);
///
///     storage.delete_by_id(created.patient_id()).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait PatientStorage: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Inserts a new record.
    ///
    /// The store assigns the id, the creation timestamp and the first row
    /// version.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(DuplicateDocument)` - If another record holds the document pair
    async fn insert(&self, draft: &PatientDraft) -> StorageResult<PatientRecord>;

    /// Reads a record by id.
    async fn find_by_id(&self, id: PatientId) -> StorageResult<Option<PatientRecord>>;

    /// Returns the records matching `filter`, ordered by `sort`.
    ///
    /// `total` counts every matching record regardless of `offset` and
    /// `limit`. A `limit` of `None` returns all rows from `offset` on.
    async fn find_matching(
        &self,
        filter: &PatientFilter,
        sort: SortSpec,
        offset: i64,
        limit: Option<i64>,
    ) -> StorageResult<Page<PatientRecord>>;

    /// Overwrites every writable field if the stored version equals `expected`.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(NotFound)` - If the record doesn't exist
    /// * `StorageError::Concurrency(VersionConflict)` - If the record was modified since `expected` was read
    /// * `StorageError::Resource(DuplicateDocument)` - If the new document pair belongs to another record
    async fn update_if_version_matches(
        &self,
        id: PatientId,
        expected: &RowVersion,
        draft: &PatientDraft,
    ) -> StorageResult<PatientRecord>;

    /// Deletes a record permanently and returns the removed row.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(NotFound)` - If the record doesn't exist
    async fn delete_by_id(&self, id: PatientId) -> StorageResult<PatientRecord>;

    /// Checks whether a record other than `exclude_id` holds the document pair.
    async fn document_exists(
        &self,
        document_type: &str,
        document_number: &str,
        exclude_id: Option<PatientId>,
    ) -> StorageResult<bool>;

    /// Verifies that the backend can serve queries.
    async fn health_check(&self) -> StorageResult<()>;
}
