//! Read handler.
//!
//! `GET [base]/patients/{id}`

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use patients_persistence::core::{AuditStorage, PatientStorage};
use patients_persistence::types::PatientId;
use tracing::debug;

use crate::dto::PatientDto;
use crate::error::{RestError, RestResult};
use crate::middleware::conditional::ConditionalHeaders;
use crate::responses::headers::ResourceHeaders;
use crate::state::AppState;

/// Handler for reading a patient by id.
///
/// # HTTP Request
///
/// `GET [base]/patients/{id}`
///
/// # Headers
///
/// - `If-None-Match` - Return 304 Not Modified if the ETag matches
///
/// # Response
///
/// - `200 OK` - Record found, with `ETag`
/// - `304 Not Modified` - Record unchanged (conditional read)
/// - `404 Not Found` - No such record
pub async fn read_handler<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<PatientId>,
    conditional: ConditionalHeaders,
) -> RestResult<Response>
where
    S: PatientStorage + AuditStorage + Send + Sync,
{
    debug!(id, "Processing read request");

    let Some(record) = state.storage().find_by_id(id).await? else {
        debug!(id, "Patient not found");
        return Err(RestError::NotFound { id });
    };

    let headers = ResourceHeaders::from_record(&record);

    if conditional.none_match_hits(record.row_version()) {
        debug!(id, "Returning 304 Not Modified");
        return Ok((StatusCode::NOT_MODIFIED, headers.to_header_map()).into_response());
    }

    Ok((
        StatusCode::OK,
        headers.to_header_map(),
        Json(PatientDto::from(&record)),
    )
        .into_response())
}
