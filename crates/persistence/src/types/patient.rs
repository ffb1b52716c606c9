//! Patient record types.
//!
//! [`PatientDraft`] is the set of fields a caller may write. [`PatientRecord`]
//! wraps a draft with the metadata the store owns: the id, the creation
//! timestamp and the current [`RowVersion`].

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store-assigned patient identifier.
pub type PatientId = i64;

/// Formats a timestamp as fixed-width RFC 3339 UTC with microseconds.
///
/// This is both the stored form and the wire form. Fixed width keeps
/// lexical and chronological order identical.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Opaque optimistic-concurrency token.
///
/// The store assigns a new token on every successful write. Callers never
/// construct one except by decoding a token they previously received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowVersion(Vec<u8>);

/// Error returned when a textual row version cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid row version: {0}")]
pub struct RowVersionError(String);

impl RowVersion {
    /// Wraps raw token bytes as read from the store.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Builds a token from a counter value (big-endian, 8 bytes).
    pub fn from_counter(value: i64) -> Self {
        Self(value.to_be_bytes().to_vec())
    }

    /// Returns the raw token bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Encodes the token as standard base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    /// Decodes a token previously produced by [`RowVersion::to_base64`].
    pub fn from_base64(text: &str) -> Result<Self, RowVersionError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RowVersionError("empty token".to_string()));
        }
        STANDARD
            .decode(trimmed)
            .map(Self)
            .map_err(|e| RowVersionError(e.to_string()))
    }
}

impl fmt::Display for RowVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

/// The caller-writable fields of a patient.
///
/// Drafts are produced by validation (create, full update) or by applying
/// patch operations to an existing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDraft {
    /// Document type, e.g. `CC`, `TI`, `PA`.
    pub document_type: String,
    /// Document number, unique together with the type.
    pub document_number: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Optional phone number.
    pub phone_number: Option<String>,
    /// Optional email address.
    pub email: Option<String>,
}

impl PatientDraft {
    /// Returns the display name (`first last`).
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns true when both drafts carry the same document pair.
    pub fn same_document(&self, other: &PatientDraft) -> bool {
        self.document_type == other.document_type && self.document_number == other.document_number
    }
}

/// A patient row as persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    patient_id: PatientId,
    fields: PatientDraft,
    created_at: DateTime<Utc>,
    row_version: RowVersion,
}

impl PatientRecord {
    /// Creates a record from stored data.
    pub fn from_storage(
        patient_id: PatientId,
        fields: PatientDraft,
        created_at: DateTime<Utc>,
        row_version: RowVersion,
    ) -> Self {
        Self {
            patient_id,
            fields,
            created_at,
            row_version,
        }
    }

    /// Returns the store-assigned id.
    pub fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    /// Returns the writable fields.
    pub fn fields(&self) -> &PatientDraft {
        &self.fields
    }

    /// Returns a copy of the writable fields, e.g. as the base for a patch.
    pub fn to_draft(&self) -> PatientDraft {
        self.fields.clone()
    }

    /// Returns the document type.
    pub fn document_type(&self) -> &str {
        &self.fields.document_type
    }

    /// Returns the document number.
    pub fn document_number(&self) -> &str {
        &self.fields.document_number
    }

    /// Returns the first name.
    pub fn first_name(&self) -> &str {
        &self.fields.first_name
    }

    /// Returns the last name.
    pub fn last_name(&self) -> &str {
        &self.fields.last_name
    }

    /// Returns the display name (`first last`).
    pub fn full_name(&self) -> String {
        self.fields.full_name()
    }

    /// Returns the date of birth.
    pub fn birth_date(&self) -> NaiveDate {
        self.fields.birth_date
    }

    /// Returns the phone number, if any.
    pub fn phone_number(&self) -> Option<&str> {
        self.fields.phone_number.as_deref()
    }

    /// Returns the email address, if any.
    pub fn email(&self) -> Option<&str> {
        self.fields.email.as_deref()
    }

    /// Returns when the record was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the current row version.
    pub fn row_version(&self) -> &RowVersion {
        &self.row_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PatientDraft {
        PatientDraft {
            document_type: "CC".to_string(),
            document_number: "1001".to_string(),
            first_name: "Laura".to_string(),
            last_name: "Gómez".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1985, 3, 9).unwrap(),
            phone_number: None,
            email: None,
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(draft().full_name(), "Laura Gómez");
    }

    #[test]
    fn test_row_version_base64() {
        let version = RowVersion::from_counter(2001);
        assert_eq!(version.as_bytes().len(), 8);
        assert_eq!(version.to_base64(), "AAAAAAAAB9E=");
        assert_eq!(RowVersion::from_base64("AAAAAAAAB9E=").unwrap(), version);
    }

    #[test]
    fn test_row_version_rejects_garbage() {
        assert!(RowVersion::from_base64("not base64!").is_err());
        assert!(RowVersion::from_base64("  ").is_err());

        let err = RowVersion::from_base64("  ").unwrap_err();
        assert_eq!(err.to_string(), "invalid row version: empty token");
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_format_timestamp_is_fixed_width() {
        use chrono::TimeZone;

        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-05-01T08:00:00.000000Z");
    }

    #[test]
    fn test_counter_tokens_are_distinct() {
        assert_ne!(RowVersion::from_counter(1), RowVersion::from_counter(2));
    }

    #[test]
    fn test_same_document() {
        let a = draft();
        let mut b = draft();
        b.first_name = "Other".to_string();
        assert!(a.same_document(&b));
        b.document_number = "1002".to_string();
        assert!(!a.same_document(&b));
    }

    #[test]
    fn test_record_accessors() {
        let now = Utc::now();
        let record = PatientRecord::from_storage(5, draft(), now, RowVersion::from_counter(3));
        assert_eq!(record.patient_id(), 5);
        assert_eq!(record.document_type(), "CC");
        assert_eq!(record.created_at(), now);
        assert_eq!(record.to_draft(), draft());
        assert!(record.email().is_none());
    }
}
