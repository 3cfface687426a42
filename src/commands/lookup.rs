//! Lookup Command
//!
//! `GET /`: with `action=getResult` returns the status (and result) of the
//! newest record for a phone/birthdate pair; without an action returns the
//! liveness payload.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use saju_intake_core::{
    JobState, LivenessPayload, LookupKey, LookupResponse, ACTION_GET_RESULT,
};

use crate::state::AppState;

/// Error returned when either half of the key is missing
pub const MISSING_KEY_ERROR: &str = "phone/birthdate 필요";

/// Query parameters of the read channel
#[derive(Debug, Default, Deserialize)]
pub struct LookupQuery {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub birthdate: String,
}

/// Handle a lookup or liveness request
pub async fn lookup(State(state): State<AppState>, Query(query): Query<LookupQuery>) -> Response {
    if query.action != ACTION_GET_RESULT {
        return Json(LivenessPayload::new(chrono::Utc::now().to_rfc3339())).into_response();
    }
    Json(lookup_result(&state, &query)).into_response()
}

/// Resolve a lookup query against the store.
///
/// An unknown key reads as PENDING: the submission may not have landed yet.
pub fn lookup_result(state: &AppState, query: &LookupQuery) -> LookupResponse {
    let phone = query.phone.trim();
    let birthdate = query.birthdate.trim();
    if phone.is_empty() || birthdate.is_empty() {
        return LookupResponse::failure(MISSING_KEY_ERROR);
    }

    let key = LookupKey::new(phone, birthdate);
    match state.database().find_latest_by_key(&key) {
        Ok(Some(record)) => {
            tracing::debug!(row = record.row_index, status = %record.status, "lookup hit");
            LookupResponse::from_state(&record.job_state())
        }
        Ok(None) => {
            tracing::debug!(phone = %key.phone, birthdate = %key.birthdate, "lookup miss");
            LookupResponse::from_state(&JobState::Pending)
        }
        Err(e) => {
            tracing::error!(error = %e, "lookup failed");
            LookupResponse::failure(e.to_string())
        }
    }
}
