//! HTTP request handlers for the patients API.
//!
//! - [`create`] - Create a patient
//! - [`list`] - Filtered, sorted, paged listing
//! - [`read`] - Read a patient by id
//! - [`update`] - Replace every mutable field
//! - [`patch`] - Apply field-level operations
//! - [`delete`] - Delete a patient
//! - [`export`] - CSV export of matching patients
//! - [`audit`] - Audit trail of a patient
//! - [`health`] - Health check endpoint

pub mod audit;
pub mod create;
pub mod delete;
pub mod export;
pub mod health;
pub mod list;
pub mod patch;
pub mod read;
pub mod update;

// Re-export handlers for convenience
pub use audit::audit_handler;
pub use create::create_handler;
pub use delete::delete_handler;
pub use export::export_handler;
pub use health::{health_handler, liveness_handler};
pub use list::list_handler;
pub use patch::patch_handler;
pub use read::read_handler;
pub use update::update_handler;
