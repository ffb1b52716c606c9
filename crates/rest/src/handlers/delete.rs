//! Delete handler.
//!
//! `DELETE [base]/patients/{id}`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use patients_persistence::core::{AuditStorage, PatientStorage};
use patients_persistence::types::{AuditAction, PatientId};
use tracing::{debug, info};

use crate::audit;
use crate::error::RestResult;
use crate::extractors::Principal;
use crate::state::AppState;

/// Handler for deleting a patient.
///
/// The row is removed outright. Audit entries that reference it stay.
///
/// # HTTP Request
///
/// `DELETE [base]/patients/{id}`
///
/// # Response
///
/// - `204 No Content` - Record deleted
/// - `404 Not Found` - No such record
pub async fn delete_handler<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<PatientId>,
    principal: Principal,
) -> RestResult<Response>
where
    S: PatientStorage + AuditStorage + Send + Sync,
{
    debug!(id, principal = %principal, "Processing delete request");

    let removed = state.storage().delete_by_id(id).await?;

    info!(patient_id = id, principal = %principal, "Patient deleted");

    audit::record_patient(
        state.storage(),
        id,
        AuditAction::Delete,
        principal.name(),
        format!("Patient deleted: {}", removed.full_name()),
    )
    .await;

    Ok(StatusCode::NO_CONTENT.into_response())
}
