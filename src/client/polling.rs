//! Polling Client
//!
//! Looks up a job at a fixed interval until it reaches a terminal state or
//! the attempt budget runs out. Consecutive lookup failures trigger a single
//! longer pause; a timed-out run can be resumed with a fresh budget.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use saju_intake_core::{JobState, LookupKey, ParsedSections};

use super::error::{ClientError, ClientResult};
use super::transport::LookupChannel;
use crate::models::settings::PollingSettings;

/// Timing and budget of one polling run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
    pub failure_threshold: u32,
    pub backoff: Duration,
}

impl PollPolicy {
    pub fn from_settings(settings: &PollingSettings) -> Self {
        Self {
            interval: Duration::from_millis(settings.interval_ms),
            max_attempts: settings.max_attempts,
            failure_threshold: settings.failure_threshold.max(1),
            backoff: Duration::from_millis(settings.backoff_ms),
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from_settings(&PollingSettings::default())
    }
}

/// How a polling run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Done(ParsedSections),
    /// The job ended in ERROR; carries the server's diagnostic, possibly empty
    Failed(String),
    /// Budget exhausted while still PENDING; the job may yet complete
    TimedOut,
}

pub struct PollingClient {
    channel: Arc<dyn LookupChannel>,
    policy: PollPolicy,
}

impl PollingClient {
    pub fn new(channel: Arc<dyn LookupChannel>, policy: PollPolicy) -> Self {
        Self { channel, policy }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Poll until DONE, ERROR or the attempt budget is spent.
    pub async fn poll_until_terminal(
        &self,
        key: &LookupKey,
        cancel: &CancellationToken,
    ) -> ClientResult<PollOutcome> {
        let mut failures = 0u32;

        for attempt in 1..=self.policy.max_attempts {
            if cancel.is_cancelled() {
                return Err(ClientError::Cancelled);
            }

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                response = self.channel.lookup(key) => response,
            };

            let mut pause = self.policy.interval;
            match response {
                Ok(payload) => {
                    failures = 0;
                    match payload.state() {
                        Some(JobState::Done { result }) => {
                            tracing::info!(attempt, "job done");
                            return Ok(PollOutcome::Done(result));
                        }
                        Some(JobState::Error { message }) => {
                            tracing::info!(attempt, error = %message, "job failed");
                            return Ok(PollOutcome::Failed(message));
                        }
                        Some(JobState::Pending) => {
                            tracing::debug!(attempt, "job pending");
                        }
                        None => {
                            tracing::debug!(attempt, error = ?payload.error, "unusable payload, still waiting");
                        }
                    }
                }
                Err(e) => {
                    failures += 1;
                    tracing::warn!(attempt, failures, error = %e, "lookup failed");
                    if failures >= self.policy.failure_threshold {
                        let backoff_ms = self.policy.backoff.as_millis() as u64;
                        tracing::warn!(backoff_ms, "backing off");
                        pause = self.policy.backoff;
                        failures = 0;
                    }
                }
            }

            if attempt == self.policy.max_attempts {
                break;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                _ = tokio::time::sleep(pause) => {}
            }
        }

        tracing::info!(attempts = self.policy.max_attempts, "polling budget exhausted");
        Ok(PollOutcome::TimedOut)
    }

    /// Manual retry after a timeout: a new run with a fresh budget.
    pub async fn resume(
        &self,
        key: &LookupKey,
        cancel: &CancellationToken,
    ) -> ClientResult<PollOutcome> {
        tracing::info!(phone = %key.phone, birthdate = %key.birthdate, "resuming lookup");
        self.poll_until_terminal(key, cancel).await
    }
}
