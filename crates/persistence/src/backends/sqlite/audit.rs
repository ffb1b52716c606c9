//! AuditStorage implementation for SQLite.

use async_trait::async_trait;
use rusqlite::params;

use crate::core::AuditStorage;
use crate::error::{BackendError, StorageError, StorageResult};
use crate::types::{AuditAction, AuditEntry, NewAuditEntry, format_timestamp};

use super::SqliteBackend;
use super::schema::parse_timestamp;

fn internal_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message,
        source: None,
    })
}

#[async_trait]
impl AuditStorage for SqliteBackend {
    async fn append(&self, entry: &NewAuditEntry) -> StorageResult<AuditEntry> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO audit_logs (entity, entity_id, action, principal, timestamp, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.entity,
                entry.entity_id,
                entry.action.as_str(),
                entry.principal,
                format_timestamp(&entry.timestamp),
                entry.description,
            ],
        )
        .map_err(|e| internal_error(format!("Failed to append audit entry: {}", e)))?;

        Ok(AuditEntry {
            audit_log_id: conn.last_insert_rowid(),
            entry: entry.clone(),
        })
    }

    async fn entries_for(&self, entity: &str, entity_id: i64) -> StorageResult<Vec<AuditEntry>> {
        let conn = self.get_connection()?;
        let mut stmt = conn
            .prepare(
                "SELECT audit_log_id, entity, entity_id, action, principal, timestamp, description
                 FROM audit_logs
                 WHERE entity = ?1 AND entity_id = ?2
                 ORDER BY audit_log_id ASC",
            )
            .map_err(|e| internal_error(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(params![entity, entity_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })
            .map_err(|e| internal_error(format!("Failed to query audit log: {}", e)))?;

        let mut entries = Vec::new();
        for row in rows {
            let (audit_log_id, entity, entity_id, action, principal, timestamp, description) =
                row.map_err(|e| internal_error(format!("Failed to read row: {}", e)))?;
            let action = action.parse::<AuditAction>().map_err(|message| {
                StorageError::Backend(BackendError::SerializationError { message })
            })?;
            entries.push(AuditEntry {
                audit_log_id,
                entry: NewAuditEntry {
                    entity,
                    entity_id,
                    action,
                    principal,
                    timestamp: parse_timestamp(&timestamp)?,
                    description,
                },
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PATIENT_ENTITY;

    #[tokio::test]
    async fn test_append_and_read_in_order() {
        let backend = SqliteBackend::in_memory().unwrap();
        backend.init_schema().unwrap();

        let first = backend
            .append(&NewAuditEntry::patient(1, AuditAction::Create, "alice", "Patient created: A B"))
            .await
            .unwrap();
        backend
            .append(&NewAuditEntry::patient(2, AuditAction::Create, "alice", "Patient created: C D"))
            .await
            .unwrap();
        let third = backend
            .append(&NewAuditEntry::patient(1, AuditAction::Delete, "bob", "Patient deleted: A B"))
            .await
            .unwrap();
        assert!(third.audit_log_id > first.audit_log_id);

        let entries = backend.entries_for(PATIENT_ENTITY, 1).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entry.action, AuditAction::Create);
        assert_eq!(entries[1].entry.action, AuditAction::Delete);
        assert_eq!(entries[1].entry.principal, "bob");
    }

    #[tokio::test]
    async fn test_other_entity_is_separate() {
        let backend = SqliteBackend::in_memory().unwrap();
        backend.init_schema().unwrap();
        backend
            .append(&NewAuditEntry::patient(1, AuditAction::Create, "alice", "x"))
            .await
            .unwrap();
        assert!(backend.entries_for("Visit", 1).await.unwrap().is_empty());
    }
}
