//! JSON request body extractor.
//!
//! Accepts `application/json` and any `application/*+json` type (such as
//! `application/json-patch+json`). A request without a Content-Type is read
//! as JSON.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request, rejection::BytesRejection},
    http::header,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::error::RestError;

/// Axum extractor for a JSON body deserialized into `T`.
///
/// # Example
///
/// ```rust,ignore
/// use patients_rest::extractors::JsonBody;
/// use patients_rest::dto::PatientPayload;
///
/// async fn create(JsonBody(payload): JsonBody<PatientPayload>) {
///     println!("{:?}", payload.first_name);
/// }
/// ```
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T> JsonBody<T> {
    /// Consumes the extractor and returns the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Error type for body extraction failures.
#[derive(Debug)]
pub enum JsonBodyRejection {
    /// The body could not be read (too large, aborted).
    Body(BytesRejection),
    /// The body is not valid JSON for the target type.
    InvalidJson(String),
    /// The Content-Type is not JSON.
    UnsupportedMediaType(String),
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        match self {
            JsonBodyRejection::Body(rejection) => rejection.into_response(),
            JsonBodyRejection::InvalidJson(msg) => RestError::BadRequest {
                message: format!("Invalid JSON: {}", msg),
            }
            .into_response(),
            JsonBodyRejection::UnsupportedMediaType(ct) => {
                RestError::UnsupportedMediaType { content_type: ct }.into_response()
            }
        }
    }
}

/// Returns true for `application/json` and `application/*+json`.
pub fn is_json_content_type(content_type: &str) -> bool {
    match content_type.parse::<mime::Mime>() {
        Ok(m) => {
            m.type_() == mime::APPLICATION
                && (m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON))
        }
        Err(_) => false,
    }
}

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/json")
            .to_string();

        if !is_json_content_type(&content_type) {
            return Err(JsonBodyRejection::UnsupportedMediaType(content_type));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(JsonBodyRejection::Body)?;

        let value = serde_json::from_slice(&bytes)
            .map_err(|e| JsonBodyRejection::InvalidJson(e.to_string()))?;

        Ok(JsonBody(value))
    }
}
