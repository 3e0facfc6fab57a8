//! List Events Lambda - Handles GET /events.

use std::sync::Arc;

use api_gateway::handlers::events;
use api_gateway::AppState;
use lambda_http::{run, service_fn, Error};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::from_env().await?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { events::list(&state, event).await }
    }))
    .await
}
