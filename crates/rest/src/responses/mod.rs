//! Response building for the patients API.
//!
//! - [`headers`] - Response header generation (ETag, Location, Content-Disposition)

pub mod headers;

pub use headers::{ResourceHeaders, etag_for};
