//! Create handler.
//!
//! `POST [base]/patients`

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use patients_persistence::core::{AuditStorage, PatientStorage};
use patients_persistence::types::{AuditAction, PatientDraft, PatientId};
use tracing::{debug, info};

use crate::audit;
use crate::dto::{PatientDto, PatientPayload};
use crate::error::{RestError, RestResult};
use crate::extractors::{JsonBody, Principal};
use crate::responses::headers::ResourceHeaders;
use crate::state::AppState;
use crate::validation::validate_payload;

/// Handler for creating a patient.
///
/// # HTTP Request
///
/// `POST [base]/patients`
///
/// # Headers
///
/// - `Content-Type` - Must be JSON
/// - `X-Principal` - Acting principal for the audit log
///
/// # Response
///
/// - `201 Created` - Record created, with `Location` and `ETag`
/// - `400 Bad Request` - Validation failed
/// - `409 Conflict` - Another patient holds the document pair
///
/// # Example
///
/// ```http
/// POST /patients HTTP/1.1
/// Content-Type: application/json
/// X-Principal: dr.ramirez
///
/// {"documentType": "CC", "documentNumber": "1020304050",
///  "firstName": "Ana", "lastName": "Rojas", "birthDate": "1990-04-12"}
/// ```
pub async fn create_handler<S>(
    State(state): State<AppState<S>>,
    principal: Principal,
    JsonBody(payload): JsonBody<PatientPayload>,
) -> RestResult<Response>
where
    S: PatientStorage + AuditStorage + Send + Sync,
{
    debug!(principal = %principal, "Processing create request");

    let draft = validate_payload(&payload, Utc::now())?;
    ensure_document_available(state.storage(), &draft, None).await?;

    let record = state.storage().insert(&draft).await?;
    let id = record.patient_id();

    info!(patient_id = id, principal = %principal, "Patient created");

    audit::record_patient(
        state.storage(),
        id,
        AuditAction::Create,
        principal.name(),
        format!("Patient created: {}", record.full_name()),
    )
    .await;

    let headers = ResourceHeaders::from_record(&record).with_location(state.patient_location(id));

    Ok((
        StatusCode::CREATED,
        headers.to_header_map(),
        Json(PatientDto::from(&record)),
    )
        .into_response())
}

/// Rejects `draft` if another patient already holds its document pair.
///
/// The unique index still catches a concurrent insert that slips past this
/// check; that surfaces as the same duplicate error.
pub(crate) async fn ensure_document_available<S>(
    storage: &S,
    draft: &PatientDraft,
    exclude_id: Option<PatientId>,
) -> RestResult<()>
where
    S: PatientStorage + ?Sized,
{
    if storage
        .document_exists(&draft.document_type, &draft.document_number, exclude_id)
        .await?
    {
        debug!(
            document_type = %draft.document_type,
            document_number = %draft.document_number,
            "Document pair already in use"
        );
        return Err(RestError::DuplicateDocument {
            document_type: draft.document_type.clone(),
            document_number: draft.document_number.clone(),
        });
    }
    Ok(())
}
