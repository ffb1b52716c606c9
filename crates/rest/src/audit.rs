//! Best-effort audit recording.
//!
//! An audit entry is written after the patient mutation has committed. A
//! failure here never reaches the client and never undoes the mutation; it
//! surfaces as [`AuditOutcome::Dropped`] and a warning in the log.

use patients_persistence::core::AuditStorage;
use patients_persistence::types::{AuditAction, AuditEntry, NewAuditEntry, PatientId};
use tracing::{debug, warn};

/// What happened to an audit entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    /// The entry was persisted.
    Recorded(AuditEntry),
    /// The entry was lost.
    Dropped {
        /// Why the store rejected it.
        reason: String,
    },
}

impl AuditOutcome {
    /// Returns true if the entry was persisted.
    pub fn is_recorded(&self) -> bool {
        matches!(self, AuditOutcome::Recorded(_))
    }
}

/// Appends `entry`, converting any failure into [`AuditOutcome::Dropped`].
pub async fn record<S>(storage: &S, entry: NewAuditEntry) -> AuditOutcome
where
    S: AuditStorage + ?Sized,
{
    match storage.append(&entry).await {
        Ok(stored) => {
            debug!(
                audit_log_id = stored.audit_log_id,
                entity_id = stored.entry.entity_id,
                action = %stored.entry.action,
                "Audit entry recorded"
            );
            AuditOutcome::Recorded(stored)
        }
        Err(e) => {
            warn!(
                entity = %entry.entity,
                entity_id = entry.entity_id,
                action = %entry.action,
                principal = %entry.principal,
                error = %e,
                "Audit entry dropped"
            );
            AuditOutcome::Dropped {
                reason: e.to_string(),
            }
        }
    }
}

/// Shorthand for a patient mutation by `principal`.
pub async fn record_patient<S>(
    storage: &S,
    id: PatientId,
    action: AuditAction,
    principal: &str,
    description: String,
) -> AuditOutcome
where
    S: AuditStorage + ?Sized,
{
    record(storage, NewAuditEntry::patient(id, action, principal, description)).await
}
