//! Tests for the middleware stack assembled by `create_app_with_config`.

mod common;

use axum::http::{HeaderName, StatusCode, header};
use axum_test::TestServer;
use patients_persistence::backends::sqlite::SqliteBackend;
use patients_rest::{ServerConfig, create_app_with_config};
use serde_json::json;

use common::fixtures::ana;
use common::harness::header_value;

fn server(config: ServerConfig) -> TestServer {
    let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    backend.init_schema().expect("Failed to initialize schema");
    TestServer::new(create_app_with_config(backend, config)).expect("Failed to create test server")
}

const X_REQUEST_ID: &str = "x-request-id";

#[tokio::test]
async fn test_request_id_is_generated_and_propagated() {
    let server = server(ServerConfig {
        enable_request_id: true,
        ..ServerConfig::for_testing()
    });

    let response = server.get("/health").await;
    response.assert_status_ok();
    let generated = response.headers().get(X_REQUEST_ID).unwrap();
    assert!(!generated.is_empty());

    let response = server
        .get("/health")
        .add_header(HeaderName::from_static(X_REQUEST_ID), header_value("req-1234"))
        .await;
    assert_eq!(response.headers().get(X_REQUEST_ID).unwrap(), "req-1234");
}

#[tokio::test]
async fn test_request_id_disabled() {
    let server = server(ServerConfig::for_testing());

    let response = server.get("/health").await;
    assert!(response.headers().get(X_REQUEST_ID).is_none());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let server = server(ServerConfig {
        enable_cors: true,
        ..ServerConfig::for_testing()
    });

    let response = server
        .get("/patients")
        .add_header(header::ORIGIN, header_value("https://clinic.example.com"))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let server = server(ServerConfig {
        max_body_size: 64,
        ..ServerConfig::for_testing()
    });

    let mut payload = ana().to_json();
    payload["lastName"] = json!("x".repeat(200));
    let response = server.post("/patients").json(&payload).await;
    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_full_stack_serves_crud() {
    let server = server(ServerConfig::for_testing());

    let response = server.post("/patients").json(&ana().to_json()).await;
    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    let id = body["patientId"].as_i64().unwrap();

    server
        .get(&format!("/patients/{}", id))
        .await
        .assert_status_ok();
}
