//! Core types for the persistence layer.
//!
//! - [`PatientRecord`], [`PatientDraft`] - A persisted patient row and its mutable field set
//! - [`RowVersion`] - Opaque optimistic-concurrency token
//! - [`AuditEntry`], [`NewAuditEntry`], [`AuditAction`] - Audit log rows
//! - [`PatientFilter`], [`SortSpec`], [`PageRequest`], [`Page`] - Query types
//!
//! # Examples
//!
//! ```
//! use patients_persistence::types::{PageRequest, SortSpec, SortField, SortDirection};
//!
//! let page = PageRequest::clamped(0, 10_000);
//! assert_eq!(page.page(), 1);
//! assert_eq!(page.page_size(), 100);
//!
//! let sort = SortSpec::parse(Some("FirstName"), Some("ASC"));
//! assert_eq!(sort.field, SortField::FirstName);
//! assert_eq!(sort.direction, SortDirection::Ascending);
//! ```

mod audit;
mod patient;
mod query;

pub use audit::{AuditAction, AuditEntry, NewAuditEntry, PATIENT_ENTITY};
pub use patient::{
    PatientDraft, PatientId, PatientRecord, RowVersion, RowVersionError, format_timestamp,
};
pub use query::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageRequest, PatientFilter, SortDirection, SortField,
    SortSpec,
};
