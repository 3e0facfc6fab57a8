//! HTTP helpers for Lambda functions.

use lambda_http::http::{HeaderValue, Method, StatusCode};
use lambda_http::{Body, Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, warn};
use validator::Validate;

use crate::{Error, Result};

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(status: u16, data: &T) -> Result<Response<Body>> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(data)?))
        .map_err(|e| Error::Internal(format!("Failed to build response: {}", e)))
}

/// Respond with JSON bytes exactly as given, e.g. to echo a request body.
pub fn raw_json_response(status: u16, body: &[u8]) -> Result<Response<Body>> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body.to_vec()))
        .map_err(|e| Error::Internal(format!("Failed to build response: {}", e)))
}

/// Render an error as a JSON string body with its mapped status code.
///
/// Server-side failures are logged at error level, caller mistakes at warn.
/// Only the public message is written to the body.
pub fn error_response(err: &Error) -> Response<Body> {
    let status = err.status_code();
    if status >= 500 {
        error!(status, "Request failed: {}", err);
    } else {
        warn!(status, "Request rejected: {}", err);
    }

    let body = serde_json::to_string(&err.public_message())
        .unwrap_or_else(|_| "\"Internal server error.\"".to_string());

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    response
        .headers_mut()
        .insert("content-type", HeaderValue::from_static("application/json"));
    response
}

/// Fail with `MethodNotAllowed` unless the request uses `expected`.
pub fn require_method(event: &Request, expected: Method) -> Result<()> {
    if *event.method() == expected {
        Ok(())
    } else {
        Err(Error::MethodNotAllowed(event.method().to_string()))
    }
}

/// Parse and validate a JSON request body.
pub fn parse_json_body<T: DeserializeOwned + Validate>(body: &Body) -> Result<T> {
    let parsed: T = serde_json::from_slice(body.as_ref())
        .map_err(|e| Error::Invalid(format!("Invalid request body: {}", e)))?;

    parsed
        .validate()
        .map_err(|e| Error::Invalid(format!("Invalid request body: {}", e)))?;

    Ok(parsed)
}
