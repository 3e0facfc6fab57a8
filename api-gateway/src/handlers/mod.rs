//! Request handlers, one per Lambda function.
//!
//! Each handler validates the method, runs the authorization gate where the
//! route is protected, and converts any `shared::Error` into a response
//! through the same adapter, so equivalent failures look the same everywhere.

pub mod events;
pub mod login;
pub mod register;

use lambda_http::{Body, Request, Response};
use shared::http::error_response;
use tracing::info;

fn log_request(event: &Request) {
    info!("Received request: method={}, path={}", event.method(), event.uri().path());
}

fn finish(event: &Request, result: shared::Result<Response<Body>>) -> Response<Body> {
    let response = result.unwrap_or_else(|e| error_response(&e));
    info!(
        "Response from {}: status={}",
        event.uri().path(),
        response.status().as_u16()
    );
    response
}
