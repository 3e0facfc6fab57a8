//! Event API handlers for API Gateway Lambda functions.
//!
//! Every binary in `src/bin` wires an [`AppState`] once per process and
//! hands each request to one of the handlers below.

pub mod handlers;
pub mod router;
pub mod state;

pub use state::AppState;
