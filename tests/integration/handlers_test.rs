//! HTTP Handler Integration Tests
//!
//! Calls the axum handlers directly, then runs the real router on a loopback
//! listener and drives it with the reqwest-backed clients.

use std::sync::Arc;
use std::time::Duration;

use axum::body::to_bytes;
use axum::extract::{Form, Query, State};
use axum::http::HeaderMap;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use saju_intake::client::{
    HttpTransport, LookupChannel, PollOutcome, PollPolicy, PollingClient, SubmissionClient,
};
use saju_intake::commands::{self, LookupQuery, MISSING_KEY_ERROR};
use saju_intake::{router, AppState};
use saju_intake_core::{IntakeForm, JobStatus, LookupKey};
use saju_intake_llm::LlmError;

use super::support::{create_state, sample_form, FakeOracle, SlowOracle, FULL_REPLY};

fn get_result(phone: &str, birthdate: &str) -> LookupQuery {
    LookupQuery {
        action: "getResult".to_string(),
        phone: phone.to_string(),
        birthdate: birthdate.to_string(),
    }
}

// ============================================================================
// Submission
// ============================================================================

#[tokio::test]
async fn test_submit_returns_row() {
    let state = create_state(Arc::new(FakeOracle::replying(Ok(FULL_REPLY.to_string()))));

    let response = commands::submit_intake(
        State(state.clone()),
        HeaderMap::new(),
        Query(IntakeForm::default()),
        Some(Form(sample_form())),
    )
    .await;

    assert!(response.ok);
    let row = response.row.unwrap();
    assert_eq!(
        state.database().get_record(row).unwrap().unwrap().status,
        JobStatus::Done
    );
}

#[tokio::test]
async fn test_submit_accepts_query_fields() {
    let state = create_state(Arc::new(FakeOracle::replying(Ok(FULL_REPLY.to_string()))));

    let response = commands::submit_intake(
        State(state.clone()),
        HeaderMap::new(),
        Query(sample_form()),
        None,
    )
    .await;

    assert!(response.ok);
    assert_eq!(state.database().count_records().unwrap(), 1);
}

#[tokio::test]
async fn test_submit_missing_fields() {
    let state = create_state(Arc::new(FakeOracle::replying(Ok(FULL_REPLY.to_string()))));
    let form = IntakeForm {
        gender: String::new(),
        ..sample_form()
    };

    let response = commands::submit_intake(
        State(state.clone()),
        HeaderMap::new(),
        Query(IntakeForm::default()),
        Some(Form(form)),
    )
    .await;

    assert!(!response.ok);
    assert_eq!(response.error.as_deref(), Some("missing_required_fields"));
    assert_eq!(state.database().count_records().unwrap(), 0);
}

#[tokio::test]
async fn test_submit_acknowledged_when_oracle_fails() {
    let state = create_state(Arc::new(FakeOracle::replying(Err(LlmError::Other {
        message: "boom".to_string(),
    }))));

    let response = commands::submit_intake(
        State(state.clone()),
        HeaderMap::new(),
        Query(IntakeForm::default()),
        Some(Form(sample_form())),
    )
    .await;

    assert!(response.ok);
    let record = state.database().get_record(response.row.unwrap()).unwrap().unwrap();
    assert_eq!(record.status, JobStatus::Error);
    assert!(record.sections.summary.contains("boom"));
}

#[tokio::test]
async fn test_submit_uses_header_user_agent_when_missing() {
    let state = create_state(Arc::new(FakeOracle::replying(Ok(FULL_REPLY.to_string()))));
    let mut headers = HeaderMap::new();
    headers.insert("user-agent", "Mozilla/5.0 test".parse().unwrap());

    let response = commands::submit_intake(
        State(state.clone()),
        headers,
        Query(IntakeForm::default()),
        Some(Form(sample_form())),
    )
    .await;

    let record = state.database().get_record(response.row.unwrap()).unwrap().unwrap();
    assert_eq!(record.user_agent, "Mozilla/5.0 test");
}

// ============================================================================
// Lookup
// ============================================================================

#[tokio::test]
async fn test_lookup_unknown_key_is_pending() {
    let state = create_state(Arc::new(FakeOracle::replying(Ok(FULL_REPLY.to_string()))));

    let response = commands::lookup_result(&state, &get_result("01000000000", "2000-01-01"));

    assert!(response.ok);
    assert_eq!(response.status, Some(JobStatus::Pending));
    assert!(response.result.is_none());
}

#[tokio::test]
async fn test_lookup_requires_both_fields() {
    let state = create_state(Arc::new(FakeOracle::replying(Ok(FULL_REPLY.to_string()))));

    let response = commands::lookup_result(&state, &get_result("  ", "1990-05-01"));

    assert!(!response.ok);
    assert_eq!(response.error.as_deref(), Some(MISSING_KEY_ERROR));
}

#[tokio::test]
async fn test_lookup_done_with_unnormalized_key() {
    let state = create_state(Arc::new(FakeOracle::replying(Ok(FULL_REPLY.to_string()))));
    state.coordinator().submit(&sample_form()).await.unwrap();

    let response = commands::lookup_result(&state, &get_result(" 010-1234-5678 ", "19900501"));

    assert_eq!(response.status, Some(JobStatus::Done));
    let result = response.result.unwrap();
    assert_eq!(result.product_keywords, "견과류, 녹차");
}

#[tokio::test]
async fn test_lookup_error_carries_diagnostic() {
    let state = create_state(Arc::new(FakeOracle::replying(Err(LlmError::Other {
        message: "boom".to_string(),
    }))));
    state.coordinator().submit(&sample_form()).await.unwrap();

    let response = commands::lookup_result(&state, &get_result("01012345678", "1990-05-01"));

    assert!(response.ok);
    assert_eq!(response.status, Some(JobStatus::Error));
    assert_eq!(response.error.as_deref(), Some("AI 처리 중 오류: boom"));
}

#[tokio::test]
async fn test_lookup_wire_format() {
    let state = create_state(Arc::new(FakeOracle::replying(Ok(FULL_REPLY.to_string()))));
    state.coordinator().submit(&sample_form()).await.unwrap();

    let response = commands::lookup(
        State(state),
        Query(get_result("01012345678", "1990-05-01")),
    )
    .await;
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["ok"], true);
    assert_eq!(json["status"], "DONE");
    assert_eq!(json["result"]["productKeywords"], "견과류, 녹차");
}

#[tokio::test]
async fn test_liveness_without_action() {
    let state = create_state(Arc::new(FakeOracle::replying(Ok(FULL_REPLY.to_string()))));

    let response = commands::lookup(State(state), Query(LookupQuery::default())).await;
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["ok"], true);
    assert_eq!(json["service"], "saju-intake");
    assert!(json["time"].as_str().is_some());
}

#[tokio::test]
async fn test_health_reports_components() {
    let state = create_state(Arc::new(FakeOracle::replying(Ok(FULL_REPLY.to_string()))));

    let health = commands::health::build_health(&state);

    assert!(health.database);
    assert!(health.oracle_configured);
    assert_eq!(health.status, "healthy");
}

// ============================================================================
// Loopback server
// ============================================================================

async fn spawn_server(oracle: FakeOracle) -> String {
    spawn_server_with(create_state(Arc::new(oracle))).await
}

async fn spawn_server_with(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{}/", addr)
}

fn fast_policy() -> PollPolicy {
    PollPolicy {
        interval: Duration::from_millis(20),
        max_attempts: 10,
        failure_threshold: 3,
        backoff: Duration::from_millis(50),
    }
}

#[tokio::test]
async fn test_client_round_trip_over_http() {
    let url = spawn_server(FakeOracle::replying(Ok(FULL_REPLY.to_string()))).await;
    let transport = Arc::new(HttpTransport::new(url, Duration::from_secs(5)).unwrap());
    let submission = SubmissionClient::new(transport.clone(), Duration::from_millis(10));
    let polling = PollingClient::new(transport, fast_policy());
    let cancel = CancellationToken::new();

    let form = IntakeForm {
        phone: "010-1234-5678".to_string(),
        birthdate: "1990/05/01".to_string(),
        ..sample_form()
    };
    let key = submission.submit(&form, &cancel).await.unwrap();
    assert_eq!(key, LookupKey::new("01012345678", "1990-05-01"));

    match polling.poll_until_terminal(&key, &cancel).await.unwrap() {
        PollOutcome::Done(sections) => assert_eq!(sections.summary, "목(木) 기운이 강한 편입니다."),
        other => panic!("expected Done, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_sees_failure_over_http() {
    let url = spawn_server(FakeOracle::replying(Err(LlmError::Other {
        message: "boom".to_string(),
    })))
    .await;
    let transport = Arc::new(HttpTransport::new(url, Duration::from_secs(5)).unwrap());
    let submission = SubmissionClient::new(transport.clone(), Duration::ZERO);
    let polling = PollingClient::new(transport, fast_policy());
    let cancel = CancellationToken::new();

    let key = submission.submit(&sample_form(), &cancel).await.unwrap();
    let outcome = polling.poll_until_terminal(&key, &cancel).await.unwrap();

    assert_eq!(outcome, PollOutcome::Failed("AI 처리 중 오류: boom".to_string()));
}

#[tokio::test]
async fn test_http_lookup_of_unknown_key() {
    let url = spawn_server(FakeOracle::replying(Ok(FULL_REPLY.to_string()))).await;
    let transport = HttpTransport::new(url, Duration::from_secs(5)).unwrap();

    let response = transport
        .lookup(&LookupKey::new("01099998888", "1985-12-25"))
        .await
        .unwrap();

    assert!(response.ok);
    assert_eq!(response.status, Some(JobStatus::Pending));
}

#[tokio::test]
async fn test_processing_finishes_after_client_hangs_up() {
    let state = create_state(Arc::new(SlowOracle::new(
        Duration::from_millis(1500),
        FULL_REPLY,
    )));
    let url = spawn_server_with(state.clone()).await;
    let transport = Arc::new(HttpTransport::new(url, Duration::from_millis(300)).unwrap());
    let submission = SubmissionClient::new(transport, Duration::ZERO);

    let key = submission
        .submit(&sample_form(), &CancellationToken::new())
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_secs(3)).await;

    let record = state.database().find_latest_by_key(&key).unwrap().unwrap();
    assert_eq!(record.status, JobStatus::Done);
    assert_eq!(record.sections.summary, "목(木) 기운이 강한 편입니다.");
}
