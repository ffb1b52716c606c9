//! SQLite backend implementation.
//!
//! This module provides a SQLite implementation of [`PatientStorage`](crate::core::PatientStorage)
//! and [`AuditStorage`](crate::core::AuditStorage). It supports both in-memory
//! databases (great for testing) and file-based databases.
//!
//! # Example
//!
//! ```no_run
//! use patients_persistence::backends::sqlite::SqliteBackend;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::open("patients.db")?;
//! backend.init_schema()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE patients (
//!     patient_id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     document_type TEXT NOT NULL,
//!     document_number TEXT NOT NULL,
//!     first_name TEXT NOT NULL,
//!     last_name TEXT NOT NULL,
//!     birth_date TEXT NOT NULL,      -- YYYY-MM-DD
//!     phone_number TEXT,
//!     email TEXT,
//!     created_at TEXT NOT NULL,      -- RFC 3339 UTC, microseconds
//!     row_version BLOB NOT NULL
//! );
//! CREATE UNIQUE INDEX idx_patients_document ON patients(document_type, document_number);
//!
//! -- No foreign key: entries outlive deleted patients.
//! CREATE TABLE audit_logs (
//!     audit_log_id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     entity TEXT NOT NULL,
//!     entity_id INTEGER NOT NULL,
//!     action TEXT NOT NULL,
//!     principal TEXT NOT NULL,
//!     timestamp TEXT NOT NULL,
//!     description TEXT NOT NULL
//! );
//!
//! -- Single row; source of every row_version.
//! CREATE TABLE row_version_counter (id INTEGER PRIMARY KEY, value INTEGER NOT NULL);
//! ```

mod audit;
mod backend;
mod query_builder;
mod schema;
mod storage;

pub use backend::{MEMORY_PATH, SqliteBackend, SqliteBackendConfig};
