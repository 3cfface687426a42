//! Client Transports
//!
//! The write channel is fire-and-forget; the read channel returns a decoded
//! lookup payload. Both sit behind traits so the clients can be driven by
//! scripted fakes.

use std::time::Duration;

use async_trait::async_trait;

use saju_intake_core::{IntakeForm, LookupKey, LookupResponse, ACTION_GET_RESULT};

use super::error::{ClientError, ClientResult};

/// Unacknowledged submission channel
#[async_trait]
pub trait SubmitChannel: Send + Sync {
    /// Transmit a submission. Callers must not rely on the outcome.
    async fn send(&self, form: &IntakeForm) -> ClientResult<()>;
}

/// Acknowledged lookup channel
#[async_trait]
pub trait LookupChannel: Send + Sync {
    async fn lookup(&self, key: &LookupKey) -> ClientResult<LookupResponse>;
}

/// reqwest-backed transport for both channels
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SubmitChannel for HttpTransport {
    async fn send(&self, form: &IntakeForm) -> ClientResult<()> {
        self.client
            .post(&self.base_url)
            .form(form)
            .send()
            .await?;
        Ok(())
    }
}

#[async_trait]
impl LookupChannel for HttpTransport {
    async fn lookup(&self, key: &LookupKey) -> ClientResult<LookupResponse> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("action", ACTION_GET_RESULT),
                ("phone", key.phone.as_str()),
                ("birthdate", key.birthdate.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::transport(format!("HTTP {}", status.as_u16())));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::malformed(e.to_string()))
    }
}
