//! Test harness for REST API testing.
//!
//! Each [`TestApp`] owns a fresh in-memory SQLite store, so tests never
//! share rows.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum_test::{TestResponse, TestServer};
use patients_persistence::backends::sqlite::SqliteBackend;
use patients_persistence::core::{AuditStorage, PatientStorage};
use patients_rest::{AppState, ServerConfig, routing};
use serde_json::Value;

use super::fixtures::PatientFixture;

/// A test server plus a handle on its backend.
pub struct TestApp {
    pub server: TestServer,
    pub backend: Arc<SqliteBackend>,
}

impl TestApp {
    /// Creates an app with the testing configuration.
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing())
    }

    /// Creates an app with a custom configuration.
    pub fn with_config(config: ServerConfig) -> Self {
        let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
        backend.init_schema().expect("Failed to initialize schema");
        let backend = Arc::new(backend);

        let state = AppState::new(Arc::clone(&backend), config);
        let app = routing::create_routes(state);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self { server, backend }
    }

    /// POSTs a fixture and returns the raw response.
    pub async fn create(&self, patient: &PatientFixture) -> TestResponse {
        self.server.post("/patients").json(&patient.to_json()).await
    }

    /// POSTs a fixture, asserts 201 and returns `(id, etag, body)`.
    pub async fn create_ok(&self, patient: &PatientFixture) -> (i64, String, Value) {
        let response = self.create(patient).await;
        assert_eq!(
            response.status_code().as_u16(),
            201,
            "create failed: {}",
            response.text()
        );
        let etag = super::assertions::etag(&response);
        let body: Value = response.json();
        let id = body["patientId"].as_i64().expect("patientId");
        (id, etag, body)
    }

    /// Reads a patient body straight from storage.
    pub async fn stored(&self, id: i64) -> Option<patients_persistence::types::PatientRecord> {
        self.backend.find_by_id(id).await.expect("find_by_id")
    }

    /// Counts stored patients.
    pub async fn count(&self) -> i64 {
        self.backend
            .find_matching(&Default::default(), Default::default(), 0, Some(1))
            .await
            .expect("find_matching")
            .total
    }

    /// Returns the audit actions recorded for a patient, oldest first.
    pub async fn audit_actions(&self, id: i64) -> Vec<String> {
        self.backend
            .entries_for(patients_persistence::types::PATIENT_ENTITY, id)
            .await
            .expect("entries_for")
            .iter()
            .map(|e| e.entry.action.to_string())
            .collect()
    }
}

/// Builds a header value from a string.
pub fn header_value(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).expect("valid header value")
}
