//! Partial updates.
//!
//! A patch body is a JSON array of `{"op", "path", "value"}` documents. Each
//! one is parsed into a [`PatchOperation`] over a fixed set of modifiable
//! fields, so nothing outside that set can ever be touched:
//!
//! ```json
//! [
//!   { "op": "replace", "path": "/firstName", "value": "Ana María" },
//!   { "op": "remove", "path": "/email" }
//! ]
//! ```
//!
//! Operations are applied in order to the record's current payload form and
//! the result is then validated with the full-update rules.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::dto::PatientPayload;
use crate::validation::ValidationErrors;

/// A modifiable patient field.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchField {
    DocumentType,
    DocumentNumber,
    FirstName,
    LastName,
    BirthDate,
    PhoneNumber,
    Email,
}

impl PatchField {
    /// Resolves a JSON pointer such as `/firstName`.
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/documentType" => Some(Self::DocumentType),
            "/documentNumber" => Some(Self::DocumentNumber),
            "/firstName" => Some(Self::FirstName),
            "/lastName" => Some(Self::LastName),
            "/birthDate" => Some(Self::BirthDate),
            "/phoneNumber" => Some(Self::PhoneNumber),
            "/email" => Some(Self::Email),
            _ => None,
        }
    }

    /// Returns the JSON pointer for this field.
    pub fn path(&self) -> &'static str {
        match self {
            Self::DocumentType => "/documentType",
            Self::DocumentNumber => "/documentNumber",
            Self::FirstName => "/firstName",
            Self::LastName => "/lastName",
            Self::BirthDate => "/birthDate",
            Self::PhoneNumber => "/phoneNumber",
            Self::Email => "/email",
        }
    }

    /// Only optional fields may be removed.
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::PhoneNumber | Self::Email)
    }

    /// Returns true if the field is part of the document pair.
    pub fn is_document(&self) -> bool {
        matches!(self, Self::DocumentType | Self::DocumentNumber)
    }

    fn slot<'a>(&self, payload: &'a mut PatientPayload) -> &'a mut Option<String> {
        match self {
            Self::DocumentType => &mut payload.document_type,
            Self::DocumentNumber => &mut payload.document_number,
            Self::FirstName => &mut payload.first_name,
            Self::LastName => &mut payload.last_name,
            Self::BirthDate => &mut payload.birth_date,
            Self::PhoneNumber => &mut payload.phone_number,
            Self::Email => &mut payload.email,
        }
    }
}

impl fmt::Display for PatchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A single field-level change.
///
/// `Add` and `Replace` both set the field, since every field already exists
/// on a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOperation {
    /// `add`
    Add { field: PatchField, value: String },
    /// `replace`
    Replace { field: PatchField, value: String },
    /// `remove`, optional fields only.
    Remove { field: PatchField },
}

impl PatchOperation {
    /// Returns the targeted field.
    pub fn field(&self) -> PatchField {
        match self {
            Self::Add { field, .. } | Self::Replace { field, .. } | Self::Remove { field } => {
                *field
            }
        }
    }

    fn apply(&self, payload: &mut PatientPayload) {
        match self {
            Self::Add { field, value } | Self::Replace { field, value } => {
                *field.slot(payload) = Some(value.clone());
            }
            Self::Remove { field } => {
                *field.slot(payload) = None;
            }
        }
    }
}

/// Why one patch document was rejected.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("patch body must be a JSON array of operations")]
    NotAnArray,

    #[error("patch must contain at least one operation")]
    Empty,

    #[error("operation must be an object with string 'op' and 'path' members")]
    Malformed,

    #[error("unsupported operation '{0}'")]
    UnknownOp(String),

    #[error("'{0}' cannot be modified")]
    Immutable(String),

    #[error("unknown path '{0}'")]
    UnknownPath(String),

    #[error("'{0}' requires a string value")]
    InvalidValue(String),

    #[error("'{0}' is required and cannot be removed")]
    NotRemovable(String),
}

const IMMUTABLE_PATHS: &[&str] = &["/patientId", "/createdAt", "/rowVersion", "/fullName"];

/// Parses a patch body, reporting every bad operation.
///
/// Errors are keyed `patch[i]` by operation index, or `patch` for problems
/// with the body as a whole.
pub fn parse_operations(body: &Value) -> Result<Vec<PatchOperation>, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let Some(items) = body.as_array() else {
        errors.push("patch", PatchError::NotAnArray.to_string());
        return Err(errors);
    };
    if items.is_empty() {
        errors.push("patch", PatchError::Empty.to_string());
        return Err(errors);
    }

    let mut operations = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match parse_operation(item) {
            Ok(op) => operations.push(op),
            Err(e) => errors.push(&format!("patch[{}]", index), e.to_string()),
        }
    }

    if errors.is_empty() {
        Ok(operations)
    } else {
        Err(errors)
    }
}

fn parse_operation(item: &Value) -> Result<PatchOperation, PatchError> {
    let op = item.get("op").and_then(Value::as_str).ok_or(PatchError::Malformed)?;
    let path = item
        .get("path")
        .and_then(Value::as_str)
        .ok_or(PatchError::Malformed)?;

    let field = match PatchField::from_path(path) {
        Some(field) => field,
        None if IMMUTABLE_PATHS.contains(&path) => {
            return Err(PatchError::Immutable(path.to_string()));
        }
        None => return Err(PatchError::UnknownPath(path.to_string())),
    };

    let value = || {
        item.get("value")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| PatchError::InvalidValue(path.to_string()))
    };

    match op {
        "add" => Ok(PatchOperation::Add {
            field,
            value: value()?,
        }),
        "replace" => Ok(PatchOperation::Replace {
            field,
            value: value()?,
        }),
        "remove" if field.is_optional() => Ok(PatchOperation::Remove { field }),
        "remove" => Err(PatchError::NotRemovable(path.to_string())),
        other => Err(PatchError::UnknownOp(other.to_string())),
    }
}

/// Applies operations in order.
pub fn apply_operations(operations: &[PatchOperation], payload: &mut PatientPayload) {
    for op in operations {
        op.apply(payload);
    }
}

/// Returns true if any operation targets the document pair.
pub fn touches_document(operations: &[PatchOperation]) -> bool {
    operations.iter().any(|op| op.field().is_document())
}

/// Audit description listing the touched paths in order.
pub fn describe(operations: &[PatchOperation]) -> String {
    let paths: Vec<&str> = operations.iter().map(|op| op.field().path()).collect();
    format!("Partial update applied: {}", paths.join(", "))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload() -> PatientPayload {
        PatientPayload {
            document_type: Some("CC".to_string()),
            document_number: Some("1020304050".to_string()),
            first_name: Some("Ana".to_string()),
            last_name: Some("Rojas".to_string()),
            birth_date: Some("1990-04-12".to_string()),
            phone_number: Some("3001234567".to_string()),
            email: Some("ana@example.com".to_string()),
            row_version: None,
        }
    }

    #[test]
    fn test_parse_and_apply() {
        let ops = parse_operations(&json!([
            { "op": "replace", "path": "/firstName", "value": "Lucía" },
            { "op": "remove", "path": "/email" },
            { "op": "add", "path": "/phoneNumber", "value": "555" }
        ]))
        .unwrap();
        assert_eq!(ops.len(), 3);

        let mut p = payload();
        apply_operations(&ops, &mut p);
        assert_eq!(p.first_name.as_deref(), Some("Lucía"));
        assert!(p.email.is_none());
        assert_eq!(p.phone_number.as_deref(), Some("555"));
        assert_eq!(p.last_name.as_deref(), Some("Rojas"));
    }

    #[test]
    fn test_operations_apply_in_order() {
        let ops = parse_operations(&json!([
            { "op": "replace", "path": "/lastName", "value": "Uno" },
            { "op": "replace", "path": "/lastName", "value": "Dos" }
        ]))
        .unwrap();
        let mut p = payload();
        apply_operations(&ops, &mut p);
        assert_eq!(p.last_name.as_deref(), Some("Dos"));
    }

    #[test]
    fn test_rejects_bad_documents() {
        let errors = parse_operations(&json!([
            { "op": "move", "path": "/firstName", "from": "/lastName" },
            { "op": "replace", "path": "/rowVersion", "value": "AAAA" },
            { "op": "replace", "path": "/nickname", "value": "x" },
            { "op": "replace", "path": "/firstName" },
            { "op": "replace", "path": "/firstName", "value": 42 },
            { "op": "remove", "path": "/lastName" },
            { "path": "/email" }
        ]))
        .unwrap_err();

        let messages: Vec<_> = errors.errors().iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "patch[0]: unsupported operation 'move'",
                "patch[1]: '/rowVersion' cannot be modified",
                "patch[2]: unknown path '/nickname'",
                "patch[3]: '/firstName' requires a string value",
                "patch[4]: '/firstName' requires a string value",
                "patch[5]: '/lastName' is required and cannot be removed",
                "patch[6]: operation must be an object with string 'op' and 'path' members",
            ]
        );
    }

    #[test]
    fn test_rejects_non_array_and_empty() {
        let errors = parse_operations(&json!({ "firstName": "Ana" })).unwrap_err();
        assert!(errors.has("patch"));

        let errors = parse_operations(&json!([])).unwrap_err();
        assert_eq!(
            errors.errors()[0].message,
            "patch must contain at least one operation"
        );
    }

    #[test]
    fn test_touches_document_and_describe() {
        let ops = parse_operations(&json!([
            { "op": "replace", "path": "/email", "value": "a@b.co" },
            { "op": "replace", "path": "/documentNumber", "value": "99" }
        ]))
        .unwrap();
        assert!(touches_document(&ops));
        assert_eq!(
            describe(&ops),
            "Partial update applied: /email, /documentNumber"
        );

        let ops = parse_operations(&json!([
            { "op": "replace", "path": "/firstName", "value": "Ana" }
        ]))
        .unwrap();
        assert!(!touches_document(&ops));
    }
}
