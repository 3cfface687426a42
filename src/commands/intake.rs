//! Submission Command
//!
//! `POST /`: accepts intake fields as a urlencoded body and/or query string,
//! creates the record and processes it before responding.

use axum::extract::{Form, Query, State};
use axum::http::{header, HeaderMap};
use axum::Json;

use saju_intake_core::{IntakeForm, SubmitResponse};

use crate::state::AppState;

fn pick(primary: String, fallback: String) -> String {
    if primary.trim().is_empty() {
        fallback
    } else {
        primary
    }
}

/// Merge body fields over query fields, field by field
fn merge_forms(body: IntakeForm, query: IntakeForm) -> IntakeForm {
    IntakeForm {
        name: pick(body.name, query.name),
        phone: pick(body.phone, query.phone),
        birthdate: pick(body.birthdate, query.birthdate),
        birthtime: pick(body.birthtime, query.birthtime),
        calendar_type: pick(body.calendar_type, query.calendar_type),
        gender: pick(body.gender, query.gender),
        memo: pick(body.memo, query.memo),
        source: pick(body.source, query.source),
        user_agent: pick(body.user_agent, query.user_agent),
    }
}

/// Handle an intake submission.
///
/// Responds `{ok:true,row}` even when the oracle failed; the failure is
/// visible through the lookup channel as ERROR.
pub async fn submit_intake(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<IntakeForm>,
    body: Option<Form<IntakeForm>>,
) -> Json<SubmitResponse> {
    let mut form = match body {
        Some(Form(body)) => merge_forms(body, query),
        None => query,
    };

    if form.user_agent.trim().is_empty() {
        if let Some(agent) = headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()) {
            form.user_agent = agent.to_string();
        }
    }

    match state.coordinator().submit(&form).await {
        Ok(row) => Json(SubmitResponse::accepted(row)),
        Err(e) => {
            if e.is_validation() {
                tracing::info!(error = %e, "submission rejected");
            } else {
                tracing::error!(error = %e, "submission failed");
            }
            Json(SubmitResponse::rejected(e.to_string()))
        }
    }
}
