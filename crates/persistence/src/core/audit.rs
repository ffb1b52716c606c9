//! Audit log storage trait.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{AuditEntry, NewAuditEntry};

/// Append-only sink for audit entries.
///
/// Entries reference their subject by entity name and id only, so they
/// remain readable after the subject record is deleted.
#[async_trait]
pub trait AuditStorage: Send + Sync {
    /// Appends an entry and returns it with its assigned id.
    async fn append(&self, entry: &NewAuditEntry) -> StorageResult<AuditEntry>;

    /// Returns every entry for an entity, oldest first.
    async fn entries_for(&self, entity: &str, entity_id: i64) -> StorageResult<Vec<AuditEntry>>;
}
