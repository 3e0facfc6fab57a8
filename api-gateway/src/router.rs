//! Path router for running every endpoint from one Lambda function.
//!
//! Endpoints:
//! - POST /users - Register
//! - POST /login - Log in
//! - POST /events - Create an event
//! - GET /events - List events
//! - GET /events/{id} - Get event details

use lambda_http::http::Method;
use lambda_http::{Body, Error, Request, Response};
use shared::http::error_response;
use tracing::info;

use crate::handlers::{events, login, register};
use crate::AppState;

pub async fn route(state: &AppState, event: Request) -> Result<Response<Body>, Error> {
    let raw_path = event.uri().path().to_string();
    // Strip /api stage prefix if present (API Gateway REST API includes stage in path)
    let path = raw_path.strip_prefix("/api").unwrap_or(&raw_path);
    let path = path.trim_end_matches('/');

    match path {
        "/users" => register::handle(state, event).await,
        "/login" => login::handle(state, event).await,
        "/events" => {
            let method = event.method().clone();
            if method == Method::GET {
                events::list(state, event).await
            } else if method == Method::POST {
                events::add(state, event).await
            } else {
                Ok(error_response(&shared::Error::MethodNotAllowed(method.to_string())))
            }
        }
        _ if is_single_event_path(path) => events::get(state, event).await,
        _ => {
            info!("No route for {} {}", event.method(), raw_path);
            Ok(error_response(&shared::Error::NotFound("Not found.".to_string())))
        }
    }
}

/// `/events/{id}` with exactly one non-empty segment after `/events/`.
fn is_single_event_path(path: &str) -> bool {
    path.strip_prefix("/events/")
        .is_some_and(|id| !id.is_empty() && !id.contains('/'))
}
