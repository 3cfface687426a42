//! Test doubles shared by the integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::time::Instant;

use saju_intake::client::{ClientError, ClientResult, LookupChannel, SubmitChannel};
use saju_intake::storage::Database;
use saju_intake::{AppConfig, AppState};
use saju_intake_core::{
    IntakeForm, JobStatus, LookupKey, LookupResponse, ParsedSections, JobState,
};
use saju_intake_llm::{LlmProvider, LlmResult, ProviderConfig};

pub const FULL_REPLY: &str = "서론은 무시됩니다.
[사주요약]
목(木) 기운이 강한 편입니다.
[건강주의]
규칙적인 수면을 권합니다.
[추천음식]
- 미역국: 순환
[피해야할음식]
- 튀김: 부담
[상품추천키워드]
견과류, 녹차
[홍보문구]
가볍게 즐겨 보세요.";

pub fn sample_form() -> IntakeForm {
    IntakeForm {
        name: "김철수".to_string(),
        phone: "01012345678".to_string(),
        birthdate: "1990-05-01".to_string(),
        calendar_type: "solar".to_string(),
        gender: "male".to_string(),
        ..Default::default()
    }
}

pub fn create_test_db() -> Arc<Database> {
    Arc::new(Database::new_in_memory().expect("Failed to create in-memory test database"))
}

pub fn create_state(oracle: Arc<dyn LlmProvider>) -> AppState {
    AppState::new(AppConfig::default(), create_test_db(), oracle)
}

// ============================================================================
// Oracle
// ============================================================================

/// Oracle returning a fixed reply. When given a database it also records the
/// status of the newest matching record at the moment it is called.
pub struct FakeOracle {
    reply: LlmResult<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    observed: Mutex<Vec<Option<JobStatus>>>,
    watch: Option<(Arc<Database>, LookupKey)>,
    config: ProviderConfig,
}

impl FakeOracle {
    pub fn replying(reply: LlmResult<String>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            observed: Mutex::new(Vec::new()),
            watch: None,
            config: ProviderConfig {
                api_key: Some("sk-test".to_string()),
                ..Default::default()
            },
        }
    }

    pub fn watching(mut self, db: Arc<Database>, key: LookupKey) -> Self {
        self.watch = Some((db, key));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn observed(&self) -> Vec<Option<JobStatus>> {
        self.observed.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for FakeOracle {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    async fn generate(&self, prompt: &str) -> LlmResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some((db, key)) = &self.watch {
            let status = db.find_latest_by_key(key).unwrap().map(|r| r.status);
            self.observed.lock().unwrap().push(status);
        }
        self.reply.clone()
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

/// Oracle that takes `delay` to answer with a fixed reply
pub struct SlowOracle {
    delay: std::time::Duration,
    reply: String,
    config: ProviderConfig,
}

impl SlowOracle {
    pub fn new(delay: std::time::Duration, reply: &str) -> Self {
        Self {
            delay,
            reply: reply.to_string(),
            config: ProviderConfig::default(),
        }
    }
}

#[async_trait]
impl LlmProvider for SlowOracle {
    fn name(&self) -> &'static str {
        "slow"
    }

    fn model(&self) -> &str {
        "slow-model"
    }

    async fn generate(&self, _prompt: &str) -> LlmResult<String> {
        tokio::time::sleep(self.delay).await;
        Ok(self.reply.clone())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

// ============================================================================
// Client channels
// ============================================================================

pub fn pending() -> ClientResult<LookupResponse> {
    Ok(LookupResponse::from_state(&JobState::Pending))
}

pub fn done(summary: &str) -> ClientResult<LookupResponse> {
    Ok(LookupResponse::from_state(&JobState::Done {
        result: ParsedSections {
            summary: summary.to_string(),
            ..Default::default()
        },
    }))
}

pub fn unreachable() -> ClientResult<LookupResponse> {
    Err(ClientError::transport("connection refused"))
}

/// Lookup channel replaying a script; PENDING once the script runs out.
/// Records the (paused) instant of every call.
#[derive(Default)]
pub struct ScriptedLookup {
    script: Mutex<VecDeque<ClientResult<LookupResponse>>>,
    calls: Mutex<Vec<Instant>>,
}

impl ScriptedLookup {
    pub fn new(script: Vec<ClientResult<LookupResponse>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LookupChannel for ScriptedLookup {
    async fn lookup(&self, _key: &LookupKey) -> ClientResult<LookupResponse> {
        self.calls.lock().unwrap().push(Instant::now());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(pending)
    }
}

/// Submit channel that records what it was given and optionally fails
pub struct RecordingSubmit {
    fail: bool,
    sent: Mutex<Vec<IntakeForm>>,
}

impl RecordingSubmit {
    pub fn new(fail: bool) -> Self {
        Self {
            fail,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<IntakeForm> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmitChannel for RecordingSubmit {
    async fn send(&self, form: &IntakeForm) -> ClientResult<()> {
        self.sent.lock().unwrap().push(form.clone());
        if self.fail {
            Err(ClientError::transport("opaque response"))
        } else {
            Ok(())
        }
    }
}
