//! Full update handler.
//!
//! `PUT [base]/patients/{id}`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use patients_persistence::core::{AuditStorage, PatientStorage};
use patients_persistence::types::{AuditAction, PatientId, RowVersion};
use tracing::{debug, info};

use crate::audit;
use crate::dto::PatientPayload;
use crate::error::{RestError, RestResult};
use crate::extractors::{JsonBody, Principal};
use crate::handlers::create::ensure_document_available;
use crate::middleware::conditional::{ConditionalHeaders, parse_etag};
use crate::responses::headers::ResourceHeaders;
use crate::state::AppState;
use crate::validation::validate_payload;

/// Handler for replacing every mutable field of a patient.
///
/// # HTTP Request
///
/// `PUT [base]/patients/{id}`
///
/// # Headers
///
/// - `Content-Type` - Must be JSON
/// - `If-Match` - Expected row version (takes precedence over `rowVersion` in the body)
/// - `X-Principal` - Acting principal for the audit log
///
/// # Response
///
/// - `204 No Content` - Record updated, new `ETag` returned
/// - `400 Bad Request` - Validation failed or malformed version token
/// - `404 Not Found` - No such record
/// - `409 Conflict` - Duplicate document pair, or the row version is stale
///
/// # Example
///
/// ```http
/// PUT /patients/7 HTTP/1.1
/// Content-Type: application/json
/// If-Match: "AAAAAAAAB9E="
///
/// {"documentType": "CC", "documentNumber": "1020304050",
///  "firstName": "Ana", "lastName": "Rojas", "birthDate": "1990-04-12"}
/// ```
pub async fn update_handler<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<PatientId>,
    principal: Principal,
    conditional: ConditionalHeaders,
    JsonBody(payload): JsonBody<PatientPayload>,
) -> RestResult<Response>
where
    S: PatientStorage + AuditStorage + Send + Sync,
{
    debug!(
        id,
        principal = %principal,
        if_match = ?conditional.if_match(),
        "Processing update request"
    );

    let draft = validate_payload(&payload, Utc::now())?;
    let requested = requested_version(&conditional, &payload)?;

    let Some(current) = state.storage().find_by_id(id).await? else {
        return Err(RestError::NotFound { id });
    };

    ensure_document_available(state.storage(), &draft, Some(id)).await?;

    let expected = requested.unwrap_or_else(|| current.row_version().clone());
    let record = state
        .storage()
        .update_if_version_matches(id, &expected, &draft)
        .await?;

    info!(patient_id = id, principal = %principal, "Patient updated");

    audit::record_patient(
        state.storage(),
        id,
        AuditAction::Update,
        principal.name(),
        format!("Patient updated: {}", record.full_name()),
    )
    .await;

    Ok((
        StatusCode::NO_CONTENT,
        ResourceHeaders::from_record(&record).to_header_map(),
    )
        .into_response())
}

/// If-Match wins over the body's `rowVersion`. `None` means the caller
/// supplied neither and the version read at the start of the request applies.
fn requested_version(
    conditional: &ConditionalHeaders,
    payload: &PatientPayload,
) -> RestResult<Option<RowVersion>> {
    if let Some(version) = conditional.expected_version()? {
        return Ok(Some(version));
    }
    match payload.row_version.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(token) => parse_etag(token).map(Some),
    }
}
