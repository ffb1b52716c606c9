//! Acting principal extractor.
//!
//! The principal is the name recorded in the audit log for a mutation. It
//! comes from the `X-Principal` request header; when that is absent or blank
//! the configured default is used.

use std::convert::Infallible;
use std::fmt;

use axum::extract::FromRequestParts;
use http::{HeaderMap, HeaderName, request::Parts};
use patients_persistence::core::{AuditStorage, PatientStorage};

use crate::state::AppState;

/// The `X-Principal` header.
pub static X_PRINCIPAL: HeaderName = HeaderName::from_static("x-principal");

/// Axum extractor for the acting principal.
///
/// # Example
///
/// ```rust,ignore
/// use patients_rest::extractors::Principal;
///
/// async fn handler(principal: Principal) {
///     println!("acting as {}", principal.name());
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(String);

impl Principal {
    /// Creates a principal with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the principal name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reads the principal from headers, falling back to `default`.
fn principal_from_headers(headers: &HeaderMap, default: &str) -> String {
    headers
        .get(&X_PRINCIPAL)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

impl<S> FromRequestParts<AppState<S>> for Principal
where
    S: PatientStorage + AuditStorage + Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Principal(principal_from_headers(
            &parts.headers,
            state.default_principal(),
        )))
    }
}
