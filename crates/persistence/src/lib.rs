//! Patients API Persistence Layer
//!
//! This crate provides the record store and the audit sink for the patients API.
//! Storage is expressed as two async traits so the REST layer never depends on a
//! particular database; the SQLite backend is enabled by default.
//!
//! # Features
//!
//! - **Record store**: insert, lookup, filtered/sorted/paginated scans, hard delete
//! - **Optimistic concurrency**: every successful write assigns a fresh [`RowVersion`](types::RowVersion)
//!   and stale writers are rejected with a version conflict
//! - **Document uniqueness**: `(document type, document number)` is unique across records
//! - **Audit log**: an append-only table of mutation events, weakly linked to records
//!
//! # Backend Features
//!
//! - `sqlite` (default) - SQLite with in-memory and file modes
//!
//! # Architecture
//!
//! - [`types`] - Patient records, drafts, version tokens, audit entries and query types
//! - [`error`] - Error types for all operations
//! - [`core`] - Storage traits ([`PatientStorage`](core::PatientStorage), [`AuditStorage`](core::AuditStorage))
//! - [`backends`] - Backend implementations
//!
//! # Quick Start
//!
//! ```no_run
//! # #[cfg(feature = "sqlite")]
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use chrono::NaiveDate;
//! use patients_persistence::backends::sqlite::SqliteBackend;
//! use patients_persistence::core::PatientStorage;
//! use patients_persistence::types::PatientDraft;
//!
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//!
//! let draft = PatientDraft {
//!     document_type: "CC".to_string(),
//!     document_number: "1020304050".to_string(),
//!     first_name: "Ana".to_string(),
//!     last_name: "Rojas".to_string(),
//!     birth_date: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
//!     phone_number: None,
//!     email: Some("ana@example.com".to_string()),
//! };
//!
//! let stored = backend.insert(&draft).await?;
//! assert_eq!(stored.full_name(), "Ana Rojas");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod types;

pub use error::{StorageError, StorageResult};
