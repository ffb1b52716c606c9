//! CSV export of patient records.

use chrono::{DateTime, Utc};
use patients_persistence::types::{PatientRecord, format_timestamp};

/// Column header, in output order.
pub const EXPORT_HEADER: [&str; 9] = [
    "PatientId",
    "DocumentType",
    "DocumentNumber",
    "FirstName",
    "LastName",
    "BirthDate",
    "PhoneNumber",
    "Email",
    "CreatedAt",
];

/// Content type of the export response.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Suggested download name, e.g. `patients_20240102030405.csv`.
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("patients_{}.csv", now.format("%Y%m%d%H%M%S"))
}

/// Serializes records as CSV with CRLF line endings.
///
/// Fields are quoted only when they contain the delimiter, a quote or a line
/// break; embedded quotes are doubled.
pub fn write_csv(records: &[PatientRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER)?;
    for record in records {
        writer.write_record([
            record.patient_id().to_string(),
            record.document_type().to_string(),
            record.document_number().to_string(),
            record.first_name().to_string(),
            record.last_name().to_string(),
            record.birth_date().format("%Y-%m-%d").to_string(),
            record.phone_number().unwrap_or_default().to_string(),
            record.email().unwrap_or_default().to_string(),
            format_timestamp(&record.created_at()),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use patients_persistence::types::{PatientDraft, RowVersion};

    use super::*;

    fn record(id: i64, first: &str, email: Option<&str>) -> PatientRecord {
        PatientRecord::from_storage(
            id,
            PatientDraft {
                document_type: "CC".to_string(),
                document_number: format!("{:04}", id),
                first_name: first.to_string(),
                last_name: "Rojas".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
                phone_number: None,
                email: email.map(str::to_string),
            },
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            RowVersion::from_counter(id),
        )
    }

    #[test]
    fn test_header_and_rows() {
        let bytes = write_csv(&[record(1, "Ana", Some("ana@example.com"))]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "PatientId,DocumentType,DocumentNumber,FirstName,LastName,BirthDate,PhoneNumber,Email,CreatedAt\r\n\
             1,CC,0001,Ana,Rojas,1990-04-12,,ana@example.com,2024-01-02T03:04:05.000000Z\r\n"
        );
    }

    #[test]
    fn test_quoting() {
        let bytes = write_csv(&[record(2, "Ana \"Nena\", María", None)]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains(",\"Ana \"\"Nena\"\", María\",Rojas,"));
    }

    #[test]
    fn test_empty_export_has_header() {
        let text = String::from_utf8(write_csv(&[]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.ends_with("CreatedAt\r\n"));
    }

    #[test]
    fn test_filename() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(export_filename(now), "patients_20240102030405.csv");
    }
}
