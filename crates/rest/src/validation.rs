//! Payload validation.
//!
//! [`validate_payload`] turns a [`PatientPayload`] into a [`PatientDraft`] or
//! reports every failing field at once. Validation never touches storage;
//! the duplicate-document check belongs to the handlers.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use patients_persistence::types::PatientDraft;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dto::PatientPayload;

/// Maximum length of the document type.
pub const DOCUMENT_TYPE_MAX: usize = 10;
/// Maximum length of the document number.
pub const DOCUMENT_NUMBER_MAX: usize = 20;
/// Maximum length of either name.
pub const NAME_MAX: usize = 80;
/// Maximum length of the phone number.
pub const PHONE_MAX: usize = 20;
/// Maximum length of the email address.
pub const EMAIL_MAX: usize = 120;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

/// A single failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Wire name of the field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field error found in one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Records a failure.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Returns true if nothing failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the failures.
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Consumes the collection.
    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }

    /// Returns true if `field` failed.
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

/// Validates a payload against the field rules and builds a draft.
///
/// `now` is the evaluation instant; a birth date later than its UTC calendar
/// date is rejected.
pub fn validate_payload(
    payload: &PatientPayload,
    now: DateTime<Utc>,
) -> Result<PatientDraft, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let document_type = required(
        &mut errors,
        "documentType",
        payload.document_type.as_deref(),
        DOCUMENT_TYPE_MAX,
    );
    let document_number = required(
        &mut errors,
        "documentNumber",
        payload.document_number.as_deref(),
        DOCUMENT_NUMBER_MAX,
    );
    let first_name = required(
        &mut errors,
        "firstName",
        payload.first_name.as_deref(),
        NAME_MAX,
    );
    let last_name = required(
        &mut errors,
        "lastName",
        payload.last_name.as_deref(),
        NAME_MAX,
    );
    let birth_date = birth_date(&mut errors, payload.birth_date.as_deref(), now);
    let phone_number = optional(
        &mut errors,
        "phoneNumber",
        payload.phone_number.as_deref(),
        PHONE_MAX,
    );
    let email = optional(&mut errors, "email", payload.email.as_deref(), EMAIL_MAX);
    if let Some(address) = email.as_deref() {
        if !EMAIL_PATTERN.is_match(address) {
            errors.push("email", "email must be a valid address");
        }
    }

    match (document_type, document_number, first_name, last_name, birth_date) {
        (Some(document_type), Some(document_number), Some(first_name), Some(last_name), Some(birth_date))
            if errors.is_empty() =>
        {
            Ok(PatientDraft {
                document_type,
                document_number,
                first_name,
                last_name,
                birth_date,
                phone_number,
                email,
            })
        }
        _ => Err(errors),
    }
}

fn required(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    match value.map(str::trim) {
        None | Some("") => {
            errors.push(field, format!("{} is required", field));
            None
        }
        Some(v) => check_length(errors, field, v, max),
    }
}

/// Blank optional values normalise to absent.
fn optional(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    match value.map(str::trim) {
        None | Some("") => None,
        Some(v) => check_length(errors, field, v, max),
    }
}

fn check_length(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    max: usize,
) -> Option<String> {
    if value.chars().count() > max {
        errors.push(field, format!("{} must be at most {} characters", field, max));
        None
    } else {
        Some(value.to_string())
    }
}

fn birth_date(
    errors: &mut ValidationErrors,
    value: Option<&str>,
    now: DateTime<Utc>,
) -> Option<NaiveDate> {
    let raw = match value.map(str::trim) {
        None | Some("") => {
            errors.push("birthDate", "birthDate is required");
            return None;
        }
        Some(v) => v,
    };

    let Some(date) = parse_birth_date(raw) else {
        errors.push("birthDate", "birthDate must be a date in YYYY-MM-DD format");
        return None;
    };

    if date > now.date_naive() {
        errors.push("birthDate", "birthDate cannot be in the future");
        return None;
    }
    Some(date)
}

/// Parses a calendar date, dropping any time part.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}
