//! Event record handlers, all behind the authorization gate.
//!
//! - POST /events - Create or replace an event
//! - GET /events - List events (first scan page)
//! - GET /events/{id} - Get event details

use lambda_http::http::Method;
use lambda_http::{Body, Error, Request, RequestExt, Response};
use shared::http::{json_response, parse_json_body, raw_json_response, require_method};
use shared::{Event, EventInput};
use tracing::info;

use super::{finish, log_request};
use crate::AppState;

pub async fn add(state: &AppState, event: Request) -> Result<Response<Body>, Error> {
    log_request(&event);
    let result = add_event(state, &event).await;
    Ok(finish(&event, result))
}

pub async fn get(state: &AppState, event: Request) -> Result<Response<Body>, Error> {
    log_request(&event);
    let result = get_event(state, &event).await;
    Ok(finish(&event, result))
}

pub async fn list(state: &AppState, event: Request) -> Result<Response<Body>, Error> {
    log_request(&event);
    let result = list_events(state, &event).await;
    Ok(finish(&event, result))
}

async fn add_event(state: &AppState, event: &Request) -> shared::Result<Response<Body>> {
    require_method(event, Method::POST)?;
    let owner = state.auth.authenticate(event.headers()).await?;

    let input: EventInput = parse_json_body(event.body())?;

    let record = Event::attributed(input, &owner);
    state.events.put_event(&record).await?;
    info!("Event {} stored by {}", record.id, owner.user_name);

    raw_json_response(200, event.body().as_ref())
}

async fn get_event(state: &AppState, event: &Request) -> shared::Result<Response<Body>> {
    require_method(event, Method::GET)?;
    state.auth.authenticate(event.headers()).await?;

    let id = event_id(event)
        .ok_or_else(|| shared::Error::Invalid("Event id is required.".to_string()))?;

    match state.events.get_event(&id).await? {
        Some(record) => json_response(200, &record),
        None => Err(shared::Error::NotFound("Event details not found.".to_string())),
    }
}

async fn list_events(state: &AppState, event: &Request) -> shared::Result<Response<Body>> {
    require_method(event, Method::GET)?;
    state.auth.authenticate(event.headers()).await?;

    let records = state.events.list_events().await?;
    info!("Listing {} events", records.len());

    json_response(200, &records)
}

/// Event id from the `{id}` path parameter, or the last segment of `/events/{id}`.
fn event_id(event: &Request) -> Option<String> {
    if let Some(id) = event.path_parameters_ref().and_then(|params| params.first("id")) {
        return Some(id.to_string());
    }

    event
        .uri()
        .path()
        .trim_end_matches('/')
        .rsplit_once("/events/")
        .map(|(_, id)| id)
        .filter(|id| !id.is_empty() && !id.contains('/'))
        .map(str::to_string)
}
