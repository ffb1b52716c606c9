//! Conditional request header handling.
//!
//! - If-Match: the row version a write expects to replace
//! - If-None-Match: conditional read
//!
//! Entity tags are the base64 row version, normally sent quoted
//! (`"AAAAAAAAB9E="`). Bare tokens and a `W/` prefix are accepted too.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
};
use patients_persistence::types::RowVersion;

use crate::error::RestError;

/// Extracted conditional headers from a request.
#[derive(Debug, Default)]
pub struct ConditionalHeaders {
    /// If-Match header value.
    if_match: Option<String>,

    /// If-None-Match header value.
    if_none_match: Option<String>,
}

/// Strips `W/` and surrounding quotes from an entity tag.
fn unquote(tag: &str) -> &str {
    let tag = tag.trim();
    let tag = tag.strip_prefix("W/").unwrap_or(tag);
    tag.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(tag)
}

/// Parses an entity tag into a row version.
pub fn parse_etag(tag: &str) -> Result<RowVersion, RestError> {
    RowVersion::from_base64(unquote(tag)).map_err(|e| RestError::BadRequest {
        message: format!("Malformed entity tag '{}': {}", tag.trim(), e),
    })
}

impl ConditionalHeaders {
    /// Creates a new ConditionalHeaders from a HeaderMap.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let if_match = headers
            .get(header::IF_MATCH)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let if_none_match = headers
            .get(header::IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Self {
            if_match,
            if_none_match,
        }
    }

    /// Returns the If-Match header value.
    pub fn if_match(&self) -> Option<&str> {
        self.if_match.as_deref()
    }

    /// Returns the If-None-Match header value.
    pub fn if_none_match(&self) -> Option<&str> {
        self.if_none_match.as_deref()
    }

    /// Returns the version named by If-Match, if any.
    ///
    /// A malformed tag is a client error rather than a silent mismatch.
    pub fn expected_version(&self) -> Result<Option<RowVersion>, RestError> {
        self.if_match().map(parse_etag).transpose()
    }

    /// Returns true if If-None-Match names `current` (or is `*`).
    ///
    /// Unparseable tags in the list never match.
    pub fn none_match_hits(&self, current: &RowVersion) -> bool {
        let Some(value) = self.if_none_match() else {
            return false;
        };
        if value.trim() == "*" {
            return true;
        }
        value
            .split(',')
            .filter_map(|tag| RowVersion::from_base64(unquote(tag)).ok())
            .any(|v| &v == current)
    }
}

/// Axum extractor for conditional headers.
impl<S> FromRequestParts<S> for ConditionalHeaders
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ConditionalHeaders::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with(name: header::HeaderName, value: &'static str) -> ConditionalHeaders {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        ConditionalHeaders::from_headers(&headers)
    }

    #[test]
    fn test_from_headers_if_match() {
        let conditional = with(header::IF_MATCH, "\"AAAAAAAAB9E=\"");
        assert_eq!(conditional.if_match(), Some("\"AAAAAAAAB9E=\""));
        assert_eq!(
            conditional.expected_version().unwrap(),
            Some(RowVersion::from_counter(2001))
        );
    }

    #[test]
    fn test_etag_forms() {
        let expected = RowVersion::from_counter(2001);
        assert_eq!(parse_etag("AAAAAAAAB9E=").unwrap(), expected);
        assert_eq!(parse_etag("W/\"AAAAAAAAB9E=\"").unwrap(), expected);
        assert_eq!(parse_etag(" \"AAAAAAAAB9E=\" ").unwrap(), expected);
        assert!(parse_etag("\"not base64!\"").is_err());
        assert!(parse_etag("\"\"").is_err());
    }

    #[test]
    fn test_no_if_match() {
        let conditional = ConditionalHeaders::default();
        assert_eq!(conditional.expected_version().unwrap(), None);
    }

    #[test]
    fn test_none_match() {
        let current = RowVersion::from_counter(2001);

        let conditional = with(header::IF_NONE_MATCH, "\"AAAAAAAAB9E=\"");
        assert!(conditional.none_match_hits(&current));

        let conditional = with(header::IF_NONE_MATCH, "\"AAAAAAAAB9A=\", W/\"AAAAAAAAB9E=\"");
        assert!(conditional.none_match_hits(&current));

        let conditional = with(header::IF_NONE_MATCH, "*");
        assert!(conditional.none_match_hits(&current));

        let conditional = with(header::IF_NONE_MATCH, "\"AAAAAAAAB9A=\"");
        assert!(!conditional.none_match_hits(&current));

        assert!(!ConditionalHeaders::default().none_match_hits(&current));
    }
}
