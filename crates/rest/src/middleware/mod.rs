//! HTTP middleware for the patients API.
//!
//! - [`conditional`] - Conditional request headers (If-Match, If-None-Match)

pub mod conditional;

pub use conditional::ConditionalHeaders;
