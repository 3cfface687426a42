//! Job Coordinator
//!
//! Creates intake records and drives each one from PENDING to a terminal
//! state: build the prompt, call the oracle once, parse the sections, store
//! the outcome. The submitting request waits for the outcome; there is no
//! queue and no retry.

use std::sync::Arc;

use saju_intake_core::{parse_sections, IntakeForm, JobStatus};
use saju_intake_llm::LlmProvider;

use crate::models::intake::NewIntake;
use crate::services::prompt::build_prompt;
use crate::storage::Database;
use crate::utils::error::{AppError, AppResult};

/// Prefix of the diagnostic stored in the summary column of an ERROR record
pub const ERROR_PREFIX: &str = "AI 처리 중 오류: ";

const PREVIEW_CHARS: usize = 200;

/// Orchestrates record creation, the oracle call and status transitions
#[derive(Clone)]
pub struct JobCoordinator {
    db: Arc<Database>,
    oracle: Arc<dyn LlmProvider>,
}

impl JobCoordinator {
    pub fn new(db: Arc<Database>, oracle: Arc<dyn LlmProvider>) -> Self {
        Self { db, oracle }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    pub fn oracle(&self) -> &Arc<dyn LlmProvider> {
        &self.oracle
    }

    /// Validate and store a submission, then process it before returning.
    ///
    /// Only validation and storage failures are returned; an oracle failure
    /// leaves the record in ERROR and still yields the row index. Processing
    /// runs on its own task, so it reaches a terminal state even if the
    /// caller is dropped mid-await.
    pub async fn submit(&self, form: &IntakeForm) -> AppResult<i64> {
        let intake = NewIntake::from_form(form)?;
        let row = self.db.insert_intake(&intake)?;
        tracing::info!(row, source = %intake.source, "intake record created");

        let worker = self.clone();
        let job = tokio::spawn(async move { worker.process_job(row).await });
        match job.await {
            Ok(status) => tracing::info!(row, status = %status, "intake processing finished"),
            Err(e) => tracing::error!(row, error = %e, "intake processing task failed"),
        }
        Ok(row)
    }

    /// Move a PENDING record to DONE or ERROR. Never fails; the returned
    /// status is what the record holds afterwards.
    pub async fn process_job(&self, row: i64) -> JobStatus {
        let record = match self.db.get_record(row) {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::warn!(row, "process_job called for unknown row");
                return JobStatus::Error;
            }
            Err(e) => return self.record_failure(row, &e),
        };

        if record.status.is_terminal() {
            tracing::debug!(row, status = %record.status, "record already terminal, skipping");
            return record.status;
        }

        let prompt = build_prompt(&record);
        tracing::debug!(row, model = self.oracle.model(), "calling generation oracle");

        let text = match self.oracle.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(row, provider = self.oracle.name(), error = %e, "oracle call failed");
                return self.record_failure(row, &AppError::from(e));
            }
        };
        tracing::info!(row, raw = %preview(&text), "oracle response received");

        let sections = parse_sections(&text);
        tracing::info!(row, found = sections.found_count(), "sections parsed");

        match self.db.complete_record(row, &sections) {
            Ok(true) => JobStatus::Done,
            Ok(false) => {
                tracing::warn!(row, "record left PENDING before results were written");
                self.current_status(row)
            }
            Err(e) => self.record_failure(row, &e),
        }
    }

    fn record_failure(&self, row: i64, err: &AppError) -> JobStatus {
        let message = format!("{}{}", ERROR_PREFIX, err);
        match self.db.fail_record(row, &message) {
            Ok(true) => JobStatus::Error,
            Ok(false) => self.current_status(row),
            Err(e) => {
                tracing::error!(row, error = %e, "failed to store error status");
                JobStatus::Pending
            }
        }
    }

    fn current_status(&self, row: i64) -> JobStatus {
        match self.db.get_record(row) {
            Ok(Some(record)) => record.status,
            _ => JobStatus::Pending,
        }
    }
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}
