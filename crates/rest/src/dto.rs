//! Wire representations.
//!
//! All field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Body of a create or full-update request.
///
/// Every field is optional at the serde level so that a missing field is
/// reported by validation alongside every other problem, rather than as a
/// JSON parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayload {
    /// Document type, e.g. `CC`.
    pub document_type: Option<String>,
    /// Document number.
    pub document_number: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// `YYYY-MM-DD`, or an ISO date-time whose time part is ignored.
    pub birth_date: Option<String>,
    /// Optional phone number.
    pub phone_number: Option<String>,
    /// Optional email address.
    pub email: Option<String>,
    /// Version token read by the client. Only honoured on full update.
    pub row_version: Option<String>,
}

/// Outward representation of a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDto {
    /// Store-assigned id.
    pub patient_id: i64,
    /// Document type.
    pub document_type: String,
    /// Document number.
    pub document_number: String,
    /// `first last`.
    pub full_name: String,
    /// `YYYY-MM-DD`.
    pub birth_date: String,
    /// Phone number, if any.
    pub phone_number: Option<String>,
    /// Email address, if any.
    pub email: Option<String>,
    /// RFC 3339 UTC creation timestamp.
    pub created_at: String,
    /// Base64 version token.
    pub row_version: String,
}

/// Outward representation of an audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntryDto {
    /// Sequential id.
    pub audit_log_id: i64,
    /// Entity type name.
    pub entity: String,
    /// Entity id.
    pub entity_id: i64,
    /// `CREATE`, `UPDATE`, `PATCH` or `DELETE`.
    pub action: String,
    /// Acting principal.
    pub principal: String,
    /// RFC 3339 UTC timestamp.
    pub timestamp: String,
    /// Free-text description.
    pub description: String,
}

/// One page of list results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    /// Rows in this page.
    pub items: Vec<T>,
    /// Rows matching the filter across all pages.
    pub total: i64,
    /// Effective (clamped) page number.
    pub page: i64,
    /// Effective (clamped) page size.
    pub page_size: i64,
}
