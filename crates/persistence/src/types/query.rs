//! Filter, sort and pagination types for patient scans.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page size used when the caller asks for a non-positive size.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Optional filters applied to a patient scan.
///
/// Blank text filters are ignored. The document number is matched exactly
/// after trimming; the name is a case-insensitive substring of the first or
/// last name. Both creation bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientFilter {
    /// Name substring.
    pub name: Option<String>,
    /// Exact document number.
    pub document_number: Option<String>,
    /// Inclusive lower bound on creation time.
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on creation time.
    pub created_to: Option<DateTime<Utc>>,
}

impl PatientFilter {
    /// Returns the trimmed name filter, or `None` when blank.
    pub fn name_term(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    /// Returns the trimmed document number filter, or `None` when blank.
    pub fn document_number_term(&self) -> Option<&str> {
        non_blank(self.document_number.as_deref())
    }

    /// Returns true when no filter is active.
    pub fn is_empty(&self) -> bool {
        self.name_term().is_none()
            && self.document_number_term().is_none()
            && self.created_from.is_none()
            && self.created_to.is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Sortable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    /// First name.
    FirstName,
    /// Creation timestamp.
    CreatedAt,
    /// Patient id.
    Id,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// A sort field with its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column to sort on.
    pub field: SortField,
    /// Direction.
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::Id,
            direction: SortDirection::Descending,
        }
    }
}

impl SortSpec {
    /// Parses loose query-string values.
    ///
    /// Unknown fields fall back to id and anything other than `asc` sorts
    /// descending, so parsing never fails.
    pub fn parse(field: Option<&str>, direction: Option<&str>) -> Self {
        let field = match field.map(|f| f.trim().to_ascii_lowercase()).as_deref() {
            Some("firstname") => SortField::FirstName,
            Some("createdat") => SortField::CreatedAt,
            _ => SortField::Id,
        };
        let direction = match direction {
            Some(d) if d.trim().eq_ignore_ascii_case("asc") => SortDirection::Ascending,
            _ => SortDirection::Descending,
        };
        Self { field, direction }
    }

    /// Ordering used by the export: id ascending.
    pub fn export() -> Self {
        Self {
            field: SortField::Id,
            direction: SortDirection::Ascending,
        }
    }
}

/// A clamped page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
}

impl PageRequest {
    /// Clamps raw values with the standard limits.
    pub fn clamped(page: i64, page_size: i64) -> Self {
        Self::clamped_with(page, page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }

    /// Clamps raw values with caller-supplied limits.
    pub fn clamped_with(page: i64, page_size: i64, default_size: i64, max_size: i64) -> Self {
        let page_size = if page_size <= 0 {
            default_size
        } else {
            page_size.min(max_size)
        };
        let page = if page <= 0 { 1 } else { page };
        Self { page, page_size }
    }

    /// 1-based page number.
    pub fn page(&self) -> i64 {
        self.page
    }

    /// Number of rows per page.
    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Rows to skip.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Rows to return.
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::clamped(1, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows in this page.
    pub items: Vec<T>,
    /// Rows matching the filter, ignoring pagination.
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_clamping() {
        let p = PageRequest::clamped(0, 10_000);
        assert_eq!(p.page(), 1);
        assert_eq!(p.page_size(), 100);

        let p = PageRequest::clamped(-3, 0);
        assert_eq!(p.page(), 1);
        assert_eq!(p.page_size(), 10);

        let p = PageRequest::clamped(3, 25);
        assert_eq!(p.offset(), 50);
        assert_eq!(p.limit(), 25);
    }

    #[test]
    fn test_page_offset_does_not_overflow() {
        let p = PageRequest::clamped(i64::MAX, 100);
        assert_eq!(p.offset(), i64::MAX);
    }

    #[test]
    fn test_sort_parse() {
        let s = SortSpec::parse(Some("firstName"), Some("Asc"));
        assert_eq!(s.field, SortField::FirstName);
        assert_eq!(s.direction, SortDirection::Ascending);

        let s = SortSpec::parse(Some("CREATEDAT"), None);
        assert_eq!(s.field, SortField::CreatedAt);
        assert_eq!(s.direction, SortDirection::Descending);

        assert_eq!(SortSpec::parse(Some("lastName"), Some("up")), SortSpec::default());
        assert_eq!(SortSpec::parse(None, None), SortSpec::default());
    }

    #[test]
    fn test_filter_terms() {
        let filter = PatientFilter {
            name: Some("  ".to_string()),
            document_number: Some(" 123 ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.name_term(), None);
        assert_eq!(filter.document_number_term(), Some("123"));
        assert!(!filter.is_empty());
        assert!(PatientFilter::default().is_empty());
    }
}
