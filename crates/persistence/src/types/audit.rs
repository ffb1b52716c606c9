//! Audit log entry types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entity name recorded for patient mutations.
pub const PATIENT_ENTITY: &str = "Patient";

/// The kind of mutation an audit entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    /// A record was created.
    Create,
    /// A record was fully replaced.
    Update,
    /// A record was partially modified.
    Patch,
    /// A record was deleted.
    Delete,
}

impl AuditAction {
    /// Returns the stored form of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Patch => "PATCH",
            AuditAction::Delete => "DELETE",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(AuditAction::Create),
            "UPDATE" => Ok(AuditAction::Update),
            "PATCH" => Ok(AuditAction::Patch),
            "DELETE" => Ok(AuditAction::Delete),
            other => Err(format!("unknown audit action: {}", other)),
        }
    }
}

/// An audit entry that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuditEntry {
    /// Entity type name, e.g. [`PATIENT_ENTITY`].
    pub entity: String,
    /// Id of the affected entity.
    pub entity_id: i64,
    /// Mutation kind.
    pub action: AuditAction,
    /// Name of the acting principal.
    pub principal: String,
    /// When the mutation happened.
    pub timestamp: DateTime<Utc>,
    /// Free-text description.
    pub description: String,
}

impl NewAuditEntry {
    /// Builds an entry for a patient mutation stamped with the current time.
    pub fn patient(
        entity_id: i64,
        action: AuditAction,
        principal: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            entity: PATIENT_ENTITY.to_string(),
            entity_id,
            action,
            principal: principal.into(),
            timestamp: Utc::now(),
            description: description.into(),
        }
    }
}

/// A persisted audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Store-assigned sequential id.
    pub audit_log_id: i64,
    /// The entry contents.
    #[serde(flatten)]
    pub entry: NewAuditEntry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_round_trip_text() {
        for action in [
            AuditAction::Create,
            AuditAction::Update,
            AuditAction::Patch,
            AuditAction::Delete,
        ] {
            assert_eq!(action.as_str().parse::<AuditAction>().unwrap(), action);
        }
        assert!("create".parse::<AuditAction>().is_err());
    }

    #[test]
    fn test_patient_entry() {
        let entry = NewAuditEntry::patient(3, AuditAction::Delete, "alice", "Patient deleted: A B");
        assert_eq!(entry.entity, "Patient");
        assert_eq!(entry.entity_id, 3);
        assert_eq!(entry.action.to_string(), "DELETE");
        assert_eq!(entry.principal, "alice");
    }
}
