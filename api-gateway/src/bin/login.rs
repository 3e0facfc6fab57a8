//! Login Lambda - Handles POST /login.

use std::sync::Arc;

use api_gateway::handlers::login;
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
        async move { login::handle(&state, event).await }
    }))
    .await
}
