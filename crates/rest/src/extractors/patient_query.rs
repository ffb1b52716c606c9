//! List and export query parameters.
//!
//! | Parameter | Meaning |
//! |-----------|---------|
//! | `page` | 1-based page number, clamped |
//! | `pageSize` | rows per page, clamped |
//! | `name` | case-insensitive substring of first or last name |
//! | `documentNumber` | exact document number |
//! | `createdFrom` / `createdTo` | inclusive creation-time bounds |
//! | `sortBy` | `firstName`, `createdAt` or `id` |
//! | `sortDir` | `asc` or `desc` |
//!
//! Every value is taken as a string and parsed here so that a malformed
//! number or date produces the same JSON error body as any other bad request.

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use patients_persistence::types::{PatientFilter, SortSpec};
use serde::Deserialize;

use crate::error::RestError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPatientQuery {
    page: Option<String>,
    page_size: Option<String>,
    name: Option<String>,
    document_number: Option<String>,
    created_from: Option<String>,
    created_to: Option<String>,
    sort_by: Option<String>,
    sort_dir: Option<String>,
}

/// Axum extractor for patient list and export parameters.
#[derive(Debug, Clone, Default)]
pub struct PatientQuery {
    /// Requested page, before clamping.
    pub page: Option<i64>,
    /// Requested page size, before clamping.
    pub page_size: Option<i64>,
    /// Row filter.
    pub filter: PatientFilter,
    /// Requested ordering. Ignored by export.
    pub sort: SortSpec,
}

impl PatientQuery {
    fn from_raw(raw: RawPatientQuery) -> Result<Self, RestError> {
        Ok(Self {
            page: parse_integer("page", raw.page.as_deref())?,
            page_size: parse_integer("pageSize", raw.page_size.as_deref())?,
            filter: PatientFilter {
                name: raw.name,
                document_number: raw.document_number,
                created_from: parse_bound("createdFrom", raw.created_from.as_deref())?,
                created_to: parse_bound("createdTo", raw.created_to.as_deref())?,
            },
            sort: SortSpec::parse(raw.sort_by.as_deref(), raw.sort_dir.as_deref()),
        })
    }
}

fn parse_integer(name: &str, value: Option<&str>) -> Result<Option<i64>, RestError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse().map(Some).map_err(|_| RestError::BadRequest {
            message: format!("{} must be an integer, got '{}'", name, v),
        }),
    }
}

fn parse_bound(name: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>, RestError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_query_timestamp(v).map(Some).ok_or_else(|| RestError::BadRequest {
            message: format!("{} must be a date or date-time, got '{}'", name, v),
        }),
    }
}

/// Parses an RFC 3339 timestamp, a naive date-time (UTC) or a date (UTC midnight).
pub fn parse_query_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

impl<S> FromRequestParts<S> for PatientQuery
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawPatientQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| RestError::BadRequest {
                message: format!("Invalid query parameters: {}", e),
            })?;

        PatientQuery::from_raw(raw)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use patients_persistence::types::{SortDirection, SortField};

    use super::*;

    #[test]
    fn test_parse_full_query() {
        let query = PatientQuery::from_raw(RawPatientQuery {
            page: Some("2".to_string()),
            page_size: Some("-5".to_string()),
            name: Some("ana".to_string()),
            document_number: Some(" 123 ".to_string()),
            created_from: Some("2024-01-01".to_string()),
            created_to: Some("2024-01-31T23:59:59Z".to_string()),
            sort_by: Some("firstName".to_string()),
            sort_dir: Some("ASC".to_string()),
        })
        .unwrap();

        assert_eq!(query.page, Some(2));
        assert_eq!(query.page_size, Some(-5));
        assert_eq!(query.filter.document_number_term(), Some("123"));
        assert_eq!(
            query.filter.created_from,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            query.filter.created_to,
            Some(Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap())
        );
        assert_eq!(query.sort.field, SortField::FirstName);
        assert_eq!(query.sort.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_empty_query_defaults() {
        let query = PatientQuery::from_raw(RawPatientQuery::default()).unwrap();
        assert!(query.page.is_none());
        assert!(query.filter.is_empty());
        assert_eq!(query.sort, SortSpec::default());
    }

    #[test]
    fn test_bad_values_rejected() {
        let err = PatientQuery::from_raw(RawPatientQuery {
            page: Some("two".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, RestError::BadRequest { .. }));

        let err = PatientQuery::from_raw(RawPatientQuery {
            created_from: Some("yesterday".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("createdFrom"));
    }

    #[test]
    fn test_timestamp_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(parse_query_timestamp("2024-03-04T05:06:07"), Some(expected));
        assert_eq!(parse_query_timestamp("2024-03-04T05:06:07Z"), Some(expected));
        assert_eq!(
            parse_query_timestamp("2024-03-04T07:06:07+02:00"),
            Some(expected)
        );
        assert!(parse_query_timestamp("04/03/2024").is_none());
    }
}
