//! Health Check Command
//!
//! Reports the health of the record store and whether the oracle is configured.

use axum::extract::State;
use axum::Json;

use crate::models::response::HealthResponse;
use crate::state::AppState;

/// Get the health status of the backend services
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(build_health(&state))
}

pub fn build_health(state: &AppState) -> HealthResponse {
    let mut health = HealthResponse::default();

    health.database = state.is_database_healthy();
    health.oracle_configured = state.is_oracle_configured();
    health.model = state.config().model.clone();

    health.status = if health.database && health.oracle_configured {
        "healthy".to_string()
    } else {
        "degraded".to_string()
    };

    health
}
