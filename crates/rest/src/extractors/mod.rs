//! Axum extractors for the patients API.
//!
//! - [`JsonBody`] - JSON request body with a Content-Type check
//! - [`Principal`] - Acting principal from `X-Principal`
//! - [`PatientQuery`] - List and export query parameters

mod json_body;
mod patient_query;
mod principal;

pub use json_body::{JsonBody, JsonBodyRejection, is_json_content_type};
pub use patient_query::{PatientQuery, parse_query_timestamp};
pub use principal::{Principal, X_PRINCIPAL};
