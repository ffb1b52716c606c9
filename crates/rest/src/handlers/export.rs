//! Export handler.
//!
//! `GET [base]/patients/export?createdFrom&createdTo&name&documentNumber`

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use patients_persistence::core::{AuditStorage, PatientStorage};
use patients_persistence::types::SortSpec;
use tracing::{debug, info};

use crate::error::{RestError, RestResult};
use crate::export::{CSV_CONTENT_TYPE, export_filename, write_csv};
use crate::extractors::PatientQuery;
use crate::responses::headers::ResourceHeaders;
use crate::state::AppState;

/// Handler for exporting matching patients as CSV.
///
/// Uses the list filters. Paging and sort parameters are ignored; every
/// matching row is written in ascending id order.
///
/// # Response
///
/// - `200 OK` - `text/csv` attachment named `patients_YYYYMMDDHHMMSS.csv`
/// - `400 Bad Request` - Unparseable filter value
pub async fn export_handler<S>(
    State(state): State<AppState<S>>,
    query: PatientQuery,
) -> RestResult<Response>
where
    S: PatientStorage + AuditStorage + Send + Sync,
{
    debug!(filter = ?query.filter, "Processing export request");

    let page = state
        .storage()
        .find_matching(&query.filter, SortSpec::export(), 0, None)
        .await?;

    let body = write_csv(&page.items).map_err(|e| RestError::InternalError {
        message: format!("Failed to write CSV: {}", e),
    })?;

    info!(rows = page.items.len(), "Patients exported");

    let headers = ResourceHeaders::new()
        .with_content_type(CSV_CONTENT_TYPE)
        .with_attachment(&export_filename(Utc::now()));

    Ok((StatusCode::OK, headers.to_header_map(), body).into_response())
}
