//! Conversions between stored records and wire representations.

use patients_persistence::types::{
    AuditEntry, Page, PageRequest, PatientDraft, PatientRecord, format_timestamp,
};

use crate::dto::{AuditEntryDto, PagedResult, PatientDto, PatientPayload};

impl From<&PatientRecord> for PatientDto {
    fn from(record: &PatientRecord) -> Self {
        Self {
            patient_id: record.patient_id(),
            document_type: record.document_type().to_string(),
            document_number: record.document_number().to_string(),
            full_name: record.full_name(),
            birth_date: record.birth_date().format("%Y-%m-%d").to_string(),
            phone_number: record.phone_number().map(str::to_string),
            email: record.email().map(str::to_string),
            created_at: format_timestamp(&record.created_at()),
            row_version: record.row_version().to_base64(),
        }
    }
}

impl From<&AuditEntry> for AuditEntryDto {
    fn from(entry: &AuditEntry) -> Self {
        Self {
            audit_log_id: entry.audit_log_id,
            entity: entry.entry.entity.clone(),
            entity_id: entry.entry.entity_id,
            action: entry.entry.action.as_str().to_string(),
            principal: entry.entry.principal.clone(),
            timestamp: format_timestamp(&entry.entry.timestamp),
            description: entry.entry.description.clone(),
        }
    }
}

/// The inverse of validation: a draft rendered back into payload form.
///
/// Patch operations are applied to this payload so the result goes through
/// the same rules as a full update.
impl From<&PatientDraft> for PatientPayload {
    fn from(draft: &PatientDraft) -> Self {
        Self {
            document_type: Some(draft.document_type.clone()),
            document_number: Some(draft.document_number.clone()),
            first_name: Some(draft.first_name.clone()),
            last_name: Some(draft.last_name.clone()),
            birth_date: Some(draft.birth_date.format("%Y-%m-%d").to_string()),
            phone_number: draft.phone_number.clone(),
            email: draft.email.clone(),
            row_version: None,
        }
    }
}

/// Builds the list response from a storage page and the effective paging.
pub fn paged_result(page: Page<PatientRecord>, request: PageRequest) -> PagedResult<PatientDto> {
    PagedResult {
        items: page.items.iter().map(PatientDto::from).collect(),
        total: page.total,
        page: request.page(),
        page_size: request.page_size(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use patients_persistence::types::{AuditAction, NewAuditEntry, RowVersion};

    use super::*;

    fn record() -> PatientRecord {
        PatientRecord::from_storage(
            7,
            PatientDraft {
                document_type: "CC".to_string(),
                document_number: "1020304050".to_string(),
                first_name: "Ana".to_string(),
                last_name: "Rojas".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
                phone_number: None,
                email: Some("ana@example.com".to_string()),
            },
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            RowVersion::from_counter(2001),
        )
    }

    #[test]
    fn test_patient_dto() {
        let dto = PatientDto::from(&record());
        assert_eq!(dto.patient_id, 7);
        assert_eq!(dto.full_name, "Ana Rojas");
        assert_eq!(dto.birth_date, "1990-04-12");
        assert_eq!(dto.created_at, "2024-01-02T03:04:05.000000Z");
        assert_eq!(dto.row_version, "AAAAAAAAB9E=");
        assert!(dto.phone_number.is_none());
    }

    #[test]
    fn test_patient_dto_json_shape() {
        let json = serde_json::to_value(PatientDto::from(&record())).unwrap();
        assert_eq!(json["patientId"], 7);
        assert_eq!(json["fullName"], "Ana Rojas");
        assert_eq!(json["rowVersion"], "AAAAAAAAB9E=");
        assert!(json["phoneNumber"].is_null());
        assert!(json.get("firstName").is_none());
    }

    #[test]
    fn test_audit_dto() {
        let entry = AuditEntry {
            audit_log_id: 3,
            entry: NewAuditEntry::patient(7, AuditAction::Delete, "nurse", "Patient deleted: Ana Rojas"),
        };
        let dto = AuditEntryDto::from(&entry);
        assert_eq!(dto.action, "DELETE");
        assert_eq!(dto.entity, "Patient");
        assert_eq!(dto.principal, "nurse");
    }

    #[test]
    fn test_payload_from_draft_revalidates() {
        let draft = record().to_draft();
        let payload = PatientPayload::from(&draft);
        assert_eq!(payload.birth_date.as_deref(), Some("1990-04-12"));
        assert!(payload.row_version.is_none());

        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(crate::validation::validate_payload(&payload, now).unwrap(), draft);
    }

    #[test]
    fn test_paged_result() {
        let page = Page {
            items: vec![record()],
            total: 31,
        };
        let result = paged_result(page, PageRequest::clamped(4, 10));
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.total, 31);
        assert_eq!((result.page, result.page_size), (4, 10));
    }
}
