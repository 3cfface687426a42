//! Commands
//!
//! HTTP handlers exposed by the intake server.

pub mod health;
pub mod intake;
pub mod lookup;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub use health::get_health;
pub use intake::submit_intake;
pub use lookup::{lookup, lookup_result, LookupQuery, MISSING_KEY_ERROR};

/// Build the router: `/` for submission and lookup, `/health` for status
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(lookup).post(submit_intake))
        .route("/health", get(get_health))
        .with_state(state)
}
