//! PatientStorage implementation for SQLite.

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};

use crate::core::PatientStorage;
use crate::error::{BackendError, ConcurrencyError, ResourceError, StorageError, StorageResult};
use crate::types::{
    Page, PatientDraft, PatientFilter, PatientId, PatientRecord, RowVersion, SortSpec,
    format_timestamp,
};

use super::SqliteBackend;
use super::query_builder::{build_limit, build_order_by, build_where};
use super::schema::{format_date, parse_date, parse_timestamp};

const PATIENT_COLUMNS: &str = "patient_id, document_type, document_number, first_name, last_name, \
     birth_date, phone_number, email, created_at, row_version";

fn internal_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message,
        source: None,
    })
}

/// Maps a write failure, turning a violation of the document index into a
/// duplicate-document error.
fn write_error(err: rusqlite::Error, draft: &PatientDraft, context: &str) -> StorageError {
    if let rusqlite::Error::SqliteFailure(ref failure, _) = err {
        if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            return StorageError::Resource(ResourceError::DuplicateDocument {
                document_type: draft.document_type.clone(),
                document_number: draft.document_number.clone(),
            });
        }
    }
    internal_error(format!("{}: {}", context, err))
}

/// Column values as read, before decoding.
struct RawPatientRow {
    patient_id: PatientId,
    document_type: String,
    document_number: String,
    first_name: String,
    last_name: String,
    birth_date: String,
    phone_number: Option<String>,
    email: Option<String>,
    created_at: String,
    row_version: Vec<u8>,
}

impl RawPatientRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            patient_id: row.get(0)?,
            document_type: row.get(1)?,
            document_number: row.get(2)?,
            first_name: row.get(3)?,
            last_name: row.get(4)?,
            birth_date: row.get(5)?,
            phone_number: row.get(6)?,
            email: row.get(7)?,
            created_at: row.get(8)?,
            row_version: row.get(9)?,
        })
    }

    fn into_record(self) -> StorageResult<PatientRecord> {
        let fields = PatientDraft {
            document_type: self.document_type,
            document_number: self.document_number,
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date: parse_date(&self.birth_date)?,
            phone_number: self.phone_number,
            email: self.email,
        };
        Ok(PatientRecord::from_storage(
            self.patient_id,
            fields,
            parse_timestamp(&self.created_at)?,
            RowVersion::from_bytes(self.row_version),
        ))
    }
}

/// Reads one record on an open connection or transaction.
fn load_record(conn: &Connection, id: PatientId) -> StorageResult<Option<PatientRecord>> {
    let raw = conn
        .query_row(
            &format!("SELECT {} FROM patients WHERE patient_id = ?1", PATIENT_COLUMNS),
            params![id],
            RawPatientRow::from_row,
        )
        .optional()
        .map_err(|e| internal_error(format!("Failed to read patient: {}", e)))?;
    raw.map(RawPatientRow::into_record).transpose()
}

/// Advances the database-wide version counter and returns the new token.
///
/// Must run inside the transaction of the write it versions.
fn next_row_version(conn: &Connection) -> StorageResult<RowVersion> {
    let value: i64 = conn
        .query_row(
            "UPDATE row_version_counter SET value = value + 1 WHERE id = 1 RETURNING value",
            [],
            |row| row.get(0),
        )
        .map_err(|e| internal_error(format!("Failed to advance row version: {}", e)))?;
    Ok(RowVersion::from_counter(value))
}

#[async_trait]
impl PatientStorage for SqliteBackend {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn insert(&self, draft: &PatientDraft) -> StorageResult<PatientRecord> {
        let mut conn = self.get_connection()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| internal_error(format!("Failed to begin transaction: {}", e)))?;

        let version = next_row_version(&tx)?;
        // Stored precision is microseconds; truncate so the returned record
        // matches what a later read yields.
        let created_at = Utc::now().trunc_subsecs(6);

        tx.execute(
            "INSERT INTO patients (document_type, document_number, first_name, last_name,
                 birth_date, phone_number, email, created_at, row_version)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                draft.document_type,
                draft.document_number,
                draft.first_name,
                draft.last_name,
                format_date(&draft.birth_date),
                draft.phone_number,
                draft.email,
                format_timestamp(&created_at),
                version.as_bytes(),
            ],
        )
        .map_err(|e| write_error(e, draft, "Failed to insert patient"))?;
        let patient_id = tx.last_insert_rowid();

        tx.commit()
            .map_err(|e| internal_error(format!("Failed to commit transaction: {}", e)))?;

        tracing::debug!(patient_id, "Inserted patient");
        Ok(PatientRecord::from_storage(
            patient_id,
            draft.clone(),
            created_at,
            version,
        ))
    }

    async fn find_by_id(&self, id: PatientId) -> StorageResult<Option<PatientRecord>> {
        let conn = self.get_connection()?;
        load_record(&conn, id)
    }

    async fn find_matching(
        &self,
        filter: &PatientFilter,
        sort: SortSpec,
        offset: i64,
        limit: Option<i64>,
    ) -> StorageResult<Page<PatientRecord>> {
        let conn = self.get_connection()?;
        let where_clause = build_where(filter);

        let total: i64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM patients {}", where_clause.sql),
                where_clause.bind().as_slice(),
                |row| row.get(0),
            )
            .map_err(|e| internal_error(format!("Failed to count patients: {}", e)))?;

        let mut fragment = where_clause;
        let limit_clause = build_limit(&mut fragment, offset, limit);
        let sql = format!(
            "SELECT {} FROM patients {} {} {}",
            PATIENT_COLUMNS,
            fragment.sql,
            build_order_by(sort),
            limit_clause
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| internal_error(format!("Failed to prepare query: {}", e)))?;
        let rows = stmt
            .query_map(fragment.bind().as_slice(), RawPatientRow::from_row)
            .map_err(|e| internal_error(format!("Failed to query patients: {}", e)))?;

        let mut items = Vec::new();
        for row in rows {
            let raw = row.map_err(|e| internal_error(format!("Failed to read row: {}", e)))?;
            items.push(raw.into_record()?);
        }

        Ok(Page { items, total })
    }

    async fn update_if_version_matches(
        &self,
        id: PatientId,
        expected: &RowVersion,
        draft: &PatientDraft,
    ) -> StorageResult<PatientRecord> {
        let mut conn = self.get_connection()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| internal_error(format!("Failed to begin transaction: {}", e)))?;

        let current: Option<Vec<u8>> = tx
            .query_row(
                "SELECT row_version FROM patients WHERE patient_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| internal_error(format!("Failed to read row version: {}", e)))?;

        let current = match current {
            Some(bytes) => RowVersion::from_bytes(bytes),
            None => return Err(StorageError::Resource(ResourceError::NotFound { id })),
        };

        if &current != expected {
            return Err(StorageError::Concurrency(ConcurrencyError::VersionConflict {
                id,
                expected_version: expected.to_base64(),
                actual_version: current.to_base64(),
            }));
        }

        let version = next_row_version(&tx)?;
        let changed = tx
            .execute(
                "UPDATE patients SET document_type = ?1, document_number = ?2, first_name = ?3,
                     last_name = ?4, birth_date = ?5, phone_number = ?6, email = ?7,
                     row_version = ?8
                 WHERE patient_id = ?9 AND row_version = ?10",
                params![
                    draft.document_type,
                    draft.document_number,
                    draft.first_name,
                    draft.last_name,
                    format_date(&draft.birth_date),
                    draft.phone_number,
                    draft.email,
                    version.as_bytes(),
                    id,
                    expected.as_bytes(),
                ],
            )
            .map_err(|e| write_error(e, draft, "Failed to update patient"))?;

        if changed == 0 {
            return Err(internal_error(format!(
                "Update of patient {} matched no rows",
                id
            )));
        }

        let updated = load_record(&tx, id)?
            .ok_or(StorageError::Resource(ResourceError::NotFound { id }))?;

        tx.commit()
            .map_err(|e| internal_error(format!("Failed to commit transaction: {}", e)))?;

        tracing::debug!(patient_id = id, "Updated patient");
        Ok(updated)
    }

    async fn delete_by_id(&self, id: PatientId) -> StorageResult<PatientRecord> {
        let mut conn = self.get_connection()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| internal_error(format!("Failed to begin transaction: {}", e)))?;

        let existing = load_record(&tx, id)?
            .ok_or(StorageError::Resource(ResourceError::NotFound { id }))?;

        tx.execute("DELETE FROM patients WHERE patient_id = ?1", params![id])
            .map_err(|e| internal_error(format!("Failed to delete patient: {}", e)))?;

        tx.commit()
            .map_err(|e| internal_error(format!("Failed to commit transaction: {}", e)))?;

        tracing::debug!(patient_id = id, "Deleted patient");
        Ok(existing)
    }

    async fn document_exists(
        &self,
        document_type: &str,
        document_number: &str,
        exclude_id: Option<PatientId>,
    ) -> StorageResult<bool> {
        let conn = self.get_connection()?;
        conn.query_row(
            "SELECT EXISTS(
                 SELECT 1 FROM patients
                 WHERE document_type = ?1 AND document_number = ?2
                   AND (?3 IS NULL OR patient_id <> ?3)
             )",
            params![document_type, document_number, exclude_id],
            |row| row.get(0),
        )
        .map_err(|e| internal_error(format!("Failed to check document: {}", e)))
    }

    async fn health_check(&self) -> StorageResult<()> {
        let conn = self.get_connection().map_err(|_| {
            StorageError::Backend(BackendError::Unavailable {
                backend_name: "sqlite".to_string(),
                message: "Failed to get connection".to_string(),
            })
        })?;
        conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get::<_, i64>(0))
            .map_err(|e| {
                StorageError::Backend(BackendError::Unavailable {
                    backend_name: "sqlite".to_string(),
                    message: format!("Health check failed: {}", e),
                })
            })?;
        Ok(())
    }
}
