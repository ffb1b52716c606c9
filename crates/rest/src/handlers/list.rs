//! List handler.
//!
//! `GET [base]/patients?page&pageSize&name&documentNumber&createdFrom&createdTo&sortBy&sortDir`

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use patients_persistence::core::{AuditStorage, PatientStorage};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::PatientQuery;
use crate::mapping::paged_result;
use crate::state::AppState;

/// Handler for listing patients.
///
/// Paging is clamped rather than rejected: a non-positive `page` becomes 1,
/// a non-positive `pageSize` becomes the default and an oversized one the
/// maximum. `total` counts every row matching the filter.
///
/// # Response
///
/// - `200 OK` - `{items, total, page, pageSize}`
/// - `400 Bad Request` - Non-integer paging or unparseable date bound
pub async fn list_handler<S>(
    State(state): State<AppState<S>>,
    query: PatientQuery,
) -> RestResult<Response>
where
    S: PatientStorage + AuditStorage + Send + Sync,
{
    let request = state.page_request(query.page, query.page_size);

    debug!(
        page = request.page(),
        page_size = request.page_size(),
        filter = ?query.filter,
        sort = ?query.sort,
        "Processing list request"
    );

    let page = state
        .storage()
        .find_matching(
            &query.filter,
            query.sort,
            request.offset(),
            Some(request.limit()),
        )
        .await?;

    debug!(returned = page.items.len(), total = page.total, "List complete");

    Ok(Json(paged_result(page, request)).into_response())
}
