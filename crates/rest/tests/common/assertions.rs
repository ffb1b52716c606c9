//! HTTP response assertions.

use axum_test::TestResponse;
use serde_json::Value;

/// Asserts that the response is an error with the given code.
pub fn assert_error_code(response: &TestResponse, status: u16, code: &str) {
    assert_eq!(
        response.status_code().as_u16(),
        status,
        "unexpected status, body: {}",
        response.text()
    );
    let body: Value = response.json();
    assert_eq!(body["status"], status);
    assert_eq!(body["code"], code, "body: {}", body);
}

/// Asserts that a validation failure names `field`.
pub fn assert_field_error(response: &TestResponse, field: &str) {
    assert_error_code(response, 400, "validation-failed");
    let body: Value = response.json();
    let errors = body["errors"].as_array().expect("errors array");
    assert!(
        errors.iter().any(|e| e["field"] == field),
        "no error for {} in {}",
        field,
        body
    );
}

/// Returns the ETag header, asserting it is present.
pub fn etag(response: &TestResponse) -> String {
    response
        .headers()
        .get("etag")
        .expect("response should carry an ETag")
        .to_str()
        .expect("ETag should be ASCII")
        .to_string()
}
