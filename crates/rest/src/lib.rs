//! # patients-rest - Patient records HTTP API
//!
//! This crate exposes CRUD, filtered listing and CSV export over patient
//! records, writing an audit entry for every mutation.
//!
//! ## Features
//!
//! - **CRUD**: Create, read, full update, partial update and delete
//! - **Optimistic concurrency**: Every write checks the row version (`ETag` / `If-Match`)
//! - **Listing**: Name, document and creation-date filters with sorting and clamped paging
//! - **Export**: The filtered set as CSV
//! - **Audit**: Best-effort audit trail per patient, attributed to an explicit principal
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use patients_rest::{create_app, ServerConfig};
//! use patients_persistence::backends::sqlite::SqliteBackend;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Create a storage backend
//!     let backend = SqliteBackend::open("patients.db")?;
//!     backend.init_schema()?;
//!
//!     // Create the Axum application
//!     let app = create_app(backend);
//!
//!     // Start the server
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Operation | HTTP Method | URL Pattern | Success |
//! |-----------|-------------|-------------|---------|
//! | create | POST | `/patients` | 201 |
//! | list | GET | `/patients` | 200 |
//! | export | GET | `/patients/export` | 200 |
//! | read | GET | `/patients/{id}` | 200 / 304 |
//! | update | PUT | `/patients/{id}` | 204 |
//! | patch | PATCH | `/patients/{id}` | 200 |
//! | delete | DELETE | `/patients/{id}` | 204 |
//! | audit trail | GET | `/patients/{id}/audit` | 200 |
//! | health | GET | `/health` | 200 / 503 |
//!
//! ## HTTP Headers
//!
//! - `ETag` / `If-Match` - Row version for optimistic concurrency
//! - `If-None-Match` - Conditional read
//! - `X-Principal` - Acting principal recorded in the audit log
//! - `X-Request-Id` - Set when absent and echoed back
//!
//! ## Error Handling
//!
//! Errors are JSON bodies `{"status", "code", "message", "errors"?}`:
//!
//! | HTTP Status | Code | Description |
//! |-------------|------|-------------|
//! | 400 | validation-failed | One or more fields invalid (see `errors`) |
//! | 400 | bad-request | Malformed JSON, query value or version token |
//! | 404 | not-found | No such patient |
//! | 409 | duplicate-document | Document pair already in use |
//! | 409 | concurrency-conflict | Row version is stale |
//! | 415 | unsupported-media-type | Body is not JSON |
//! | 500 | internal-error | Storage failure |
//!
//! ## Architecture
//!
//! - [`config`] - Server configuration
//! - [`state`] - Application state (storage, configuration)
//! - [`validation`] - Payload rules
//! - [`mapping`] / [`dto`] - Wire representations
//! - [`patch`] - Partial-update operations
//! - [`audit`] - Best-effort audit recording
//! - [`export`] - CSV serialization
//! - [`handlers`] - HTTP request handlers
//! - [`extractors`] / [`middleware`] / [`responses`] - Request and response plumbing
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod audit;
pub mod config;
pub mod dto;
pub mod error;
pub mod export;
pub mod extractors;
pub mod handlers;
pub mod mapping;
pub mod middleware;
pub mod patch;
pub mod responses;
pub mod routing;
pub mod state;
pub mod validation;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{StatusCode, header},
};
use patients_persistence::core::{AuditStorage, PatientStorage};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(storage: S) -> Router
where
    S: PatientStorage + AuditStorage + Send + Sync + 'static,
{
    create_app_with_config(storage, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use patients_rest::{create_app_with_config, ServerConfig};
/// use patients_persistence::backends::sqlite::SqliteBackend;
///
/// let backend = SqliteBackend::in_memory()?;
/// let config = ServerConfig {
///     default_principal: "intake-desk".to_string(),
///     ..Default::default()
/// };
/// let app = create_app_with_config(backend, config);
/// ```
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: PatientStorage + AuditStorage + Send + Sync + 'static,
{
    info!(
        "Creating REST API server with backend: {}",
        storage.backend_name()
    );

    // Create application state
    let state = AppState::new(Arc::new(storage), config.clone());

    // Build the router with all patient routes
    let router = routing::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ))
        .map_response(axum::response::IntoResponse::into_response)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_size));

    // Add CORS if enabled
    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    let router = router.layer(service_builder);

    // Request id is outermost so the trace span and every response carry it
    if config.enable_request_id {
        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    } else {
        router
    }
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new().expose_headers([
        header::ETAG,
        header::LOCATION,
        header::CONTENT_DISPOSITION,
    ]);

    // Configure origins
    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    // Configure methods
    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    // Configure headers
    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG`, when set,
/// overrides `level`.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "patients_rest={level},patients_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
