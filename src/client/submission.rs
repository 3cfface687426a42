//! Submission Client
//!
//! Normalizes and validates an intake form, sends it over the unacknowledged
//! channel, then waits the initial delay so the server can create the record
//! before polling starts.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use saju_intake_core::{IntakeForm, LookupKey};

use super::error::{ClientError, ClientResult};
use super::transport::SubmitChannel;

pub struct SubmissionClient {
    channel: Arc<dyn SubmitChannel>,
    initial_delay: Duration,
}

impl SubmissionClient {
    pub fn new(channel: Arc<dyn SubmitChannel>, initial_delay: Duration) -> Self {
        Self {
            channel,
            initial_delay,
        }
    }

    /// Submit a form and return the key to poll with.
    ///
    /// Missing fields abort before anything is sent. The send outcome is
    /// ignored: the write channel gives no reliable acknowledgement.
    pub async fn submit(
        &self,
        form: &IntakeForm,
        cancel: &CancellationToken,
    ) -> ClientResult<LookupKey> {
        let form = form.normalized();
        form.validate()?;
        let key = form.lookup_key();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            sent = self.channel.send(&form) => {
                if let Err(e) = sent {
                    tracing::debug!(error = %e, "submission send failed; polling anyway");
                }
            }
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            _ = tokio::time::sleep(self.initial_delay) => {}
        }

        tracing::info!(phone = %key.phone, birthdate = %key.birthdate, "submitted, ready to poll");
        Ok(key)
    }
}
