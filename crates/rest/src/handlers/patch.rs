//! Partial update handler.
//!
//! `PATCH [base]/patients/{id}`
//!
//! The body is a list of field-level operations; see [`crate::patch`].

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use patients_persistence::core::{AuditStorage, PatientStorage};
use patients_persistence::types::{AuditAction, PatientId};
use serde_json::Value;
use tracing::{debug, info};

use crate::audit;
use crate::dto::{PatientDto, PatientPayload};
use crate::error::{RestError, RestResult};
use crate::extractors::{JsonBody, Principal};
use crate::handlers::create::ensure_document_available;
use crate::middleware::conditional::ConditionalHeaders;
use crate::patch::{apply_operations, describe, parse_operations};
use crate::responses::headers::ResourceHeaders;
use crate::state::AppState;
use crate::validation::validate_payload;

/// Handler for applying a partial update.
///
/// # HTTP Request
///
/// `PATCH [base]/patients/{id}`
///
/// # Headers
///
/// - `Content-Type` - `application/json` or `application/json-patch+json`
/// - `If-Match` - Expected row version (optional)
/// - `X-Principal` - Acting principal for the audit log
///
/// # Response
///
/// - `200 OK` - Patch applied, returns the updated record with `ETag`
/// - `400 Bad Request` - Invalid operation, or the patched record is invalid
/// - `404 Not Found` - No such record
/// - `409 Conflict` - Duplicate document pair, or the row version is stale
///
/// # Example
///
/// ```http
/// PATCH /patients/7 HTTP/1.1
/// Content-Type: application/json-patch+json
///
/// [{"op": "replace", "path": "/phoneNumber", "value": "3009876543"}]
/// ```
pub async fn patch_handler<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<PatientId>,
    principal: Principal,
    conditional: ConditionalHeaders,
    JsonBody(body): JsonBody<Value>,
) -> RestResult<Response>
where
    S: PatientStorage + AuditStorage + Send + Sync,
{
    debug!(id, principal = %principal, "Processing patch request");

    let Some(current) = state.storage().find_by_id(id).await? else {
        return Err(RestError::NotFound { id });
    };

    let requested = conditional.expected_version()?;

    let operations = parse_operations(&body)?;

    let mut payload = PatientPayload::from(current.fields());
    apply_operations(&operations, &mut payload);
    let draft = validate_payload(&payload, Utc::now())?;

    if !draft.same_document(current.fields()) {
        ensure_document_available(state.storage(), &draft, Some(id)).await?;
    }

    let expected = requested.unwrap_or_else(|| current.row_version().clone());
    let record = state
        .storage()
        .update_if_version_matches(id, &expected, &draft)
        .await?;

    info!(
        patient_id = id,
        principal = %principal,
        operations = operations.len(),
        "Patient patched"
    );

    audit::record_patient(
        state.storage(),
        id,
        AuditAction::Patch,
        principal.name(),
        describe(&operations),
    )
    .await;

    Ok((
        StatusCode::OK,
        ResourceHeaders::from_record(&record).to_header_map(),
        Json(PatientDto::from(&record)),
    )
        .into_response())
}
