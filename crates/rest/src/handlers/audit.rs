//! Audit trail handler.
//!
//! `GET [base]/patients/{id}/audit`

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use patients_persistence::core::{AuditStorage, PatientStorage};
use patients_persistence::types::{PATIENT_ENTITY, PatientId};
use tracing::debug;

use crate::dto::AuditEntryDto;
use crate::error::RestResult;
use crate::state::AppState;

/// Handler for listing the audit entries of a patient, oldest first.
///
/// Entries outlive the record, so this works after a delete. An id that
/// never existed yields an empty list.
pub async fn audit_handler<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<PatientId>,
) -> RestResult<Response>
where
    S: PatientStorage + AuditStorage + Send + Sync,
{
    debug!(id, "Processing audit trail request");

    let entries = state.storage().entries_for(PATIENT_ENTITY, id).await?;
    let body: Vec<AuditEntryDto> = entries.iter().map(AuditEntryDto::from).collect();

    Ok(Json(body).into_response())
}
