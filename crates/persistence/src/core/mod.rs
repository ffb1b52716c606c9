//! Core storage traits.
//!
//! - [`PatientStorage`] - The record store: CRUD, filtered scans and the
//!   version-guarded update
//! - [`AuditStorage`] - The append-only audit sink
//!
//! The two traits are separate because audit writes are not transactional
//! with record writes. A backend usually implements both.

mod audit;
mod storage;

pub use audit::AuditStorage;
pub use storage::PatientStorage;
