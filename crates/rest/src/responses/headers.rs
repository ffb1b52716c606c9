//! Response header generation.

use axum::http::{HeaderMap, HeaderValue, header};
use patients_persistence::types::{PatientRecord, RowVersion};

/// Formats a row version as a strong entity tag.
pub fn etag_for(version: &RowVersion) -> String {
    format!("\"{}\"", version.to_base64())
}

/// Builder for patient response headers.
///
/// Generates:
/// - ETag (row version)
/// - Location (for created records)
/// - Content-Type
/// - Content-Disposition (for downloads)
#[derive(Debug, Default)]
pub struct ResourceHeaders {
    /// ETag value.
    etag: Option<String>,
    /// Location URL (for created records).
    location: Option<String>,
    /// Content-Type.
    content_type: Option<String>,
    /// Content-Disposition.
    content_disposition: Option<String>,
}

impl ResourceHeaders {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates headers carrying the record's ETag.
    pub fn from_record(record: &PatientRecord) -> Self {
        Self::new().with_version(record.row_version())
    }

    /// Sets the ETag from a row version.
    pub fn with_version(mut self, version: &RowVersion) -> Self {
        self.etag = Some(etag_for(version));
        self
    }

    /// Sets the Location URL.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the Content-Type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Marks the response as a download named `filename`.
    pub fn with_attachment(mut self, filename: &str) -> Self {
        self.content_disposition = Some(format!("attachment; filename=\"{}\"", filename));
        self
    }

    /// Converts to an Axum HeaderMap.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        let pairs = [
            (header::CONTENT_TYPE, &self.content_type),
            (header::ETAG, &self.etag),
            (header::LOCATION, &self.location),
            (header::CONTENT_DISPOSITION, &self.content_disposition),
        ];
        for (name, value) in pairs {
            if let Some(value) = value {
                if let Ok(value) = HeaderValue::from_str(value) {
                    headers.insert(name, value);
                }
            }
        }

        headers
    }

    /// Returns the ETag value.
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// Returns the Location value.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let headers = ResourceHeaders::new();
        assert!(headers.etag().is_none());
        assert!(headers.to_header_map().is_empty());
    }

    #[test]
    fn test_with_version() {
        let headers = ResourceHeaders::new().with_version(&RowVersion::from_counter(2001));
        assert_eq!(headers.etag(), Some("\"AAAAAAAAB9E=\""));
    }

    #[test]
    fn test_to_header_map() {
        let headers = ResourceHeaders::new()
            .with_version(&RowVersion::from_counter(1))
            .with_location("http://example.com/patients/1");

        let map = headers.to_header_map();

        assert!(map.contains_key(header::ETAG));
        assert_eq!(map[header::LOCATION], "http://example.com/patients/1");
        assert!(!map.contains_key(header::CONTENT_TYPE));
    }

    #[test]
    fn test_attachment() {
        let map = ResourceHeaders::new()
            .with_content_type("text/csv; charset=utf-8")
            .with_attachment("patients_20240102030405.csv")
            .to_header_map();
        assert_eq!(
            map[header::CONTENT_DISPOSITION],
            "attachment; filename=\"patients_20240102030405.csv\""
        );
        assert_eq!(map[header::CONTENT_TYPE], "text/csv; charset=utf-8");
    }
}
