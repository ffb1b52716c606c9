//! Health check endpoint handler.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use patients_persistence::core::{AuditStorage, PatientStorage};
use tracing::{debug, warn};

use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// Runs a trivial query against the store.
///
/// # HTTP Request
///
/// `GET [base]/health`
///
/// # Response
///
/// - `200 OK` - Storage reachable
/// - `503 Service Unavailable` - Storage check failed
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: PatientStorage + AuditStorage + Send + Sync,
{
    debug!("Processing health check request");

    let backend_name = state.storage().backend_name();
    let timestamp = chrono::Utc::now().to_rfc3339();

    match state.storage().health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "healthy",
                "backend": backend_name,
                "timestamp": timestamp
            })),
        )
            .into_response(),
        Err(e) => {
            warn!(backend = backend_name, error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "unhealthy",
                    "backend": backend_name,
                    "timestamp": timestamp
                })),
            )
                .into_response()
        }
    }
}

/// Liveness probe. Does not touch storage.
///
/// `GET [base]/_liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}
