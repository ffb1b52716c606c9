//! Patient route configuration.
//!
//! Defines all routes for the patients API.

use axum::{
    Router,
    routing::{get, post},
};
use patients_persistence::core::{AuditStorage, PatientStorage};

use crate::handlers;
use crate::state::AppState;

/// Creates all patients API routes.
///
/// # Routes
///
/// ## System-level
/// - `GET /health` - Storage health check
/// - `GET /_liveness` - Liveness probe
///
/// ## Collection
/// - `POST /patients` - Create
/// - `GET /patients` - List
/// - `GET /patients/export` - CSV export
///
/// ## Instance
/// - `GET /patients/{id}` - Read
/// - `PUT /patients/{id}` - Full update
/// - `PATCH /patients/{id}` - Partial update
/// - `DELETE /patients/{id}` - Delete
/// - `GET /patients/{id}/audit` - Audit trail
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: PatientStorage + AuditStorage + Send + Sync + 'static,
{
    Router::new()
        // System-level routes
        .route("/health", get(handlers::health_handler::<S>))
        .route("/_liveness", get(handlers::liveness_handler))
        // Collection routes
        .route(
            "/patients",
            post(handlers::create_handler::<S>).get(handlers::list_handler::<S>),
        )
        .route("/patients/export", get(handlers::export_handler::<S>))
        // Instance routes
        .route(
            "/patients/{id}",
            get(handlers::read_handler::<S>)
                .put(handlers::update_handler::<S>)
                .patch(handlers::patch_handler::<S>)
                .delete(handlers::delete_handler::<S>),
        )
        .route("/patients/{id}/audit", get(handlers::audit_handler::<S>))
        // State
        .with_state(state)
}
