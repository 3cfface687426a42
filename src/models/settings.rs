//! Settings Models
//!
//! Service configuration data structures, stored as config.json.

use serde::{Deserialize, Serialize};

use saju_intake_llm::{ProviderConfig, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};

/// Service configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// SQLite file; defaults to ~/.saju-intake/intake.db when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<String>,
    /// Generation model
    pub model: String,
    /// Override for the chat completions endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Completion token budget
    pub max_tokens: u32,
    /// Whole-request timeout for the generation call, in seconds
    pub generation_timeout_secs: u64,
    /// Server URL the client submits to and polls
    #[serde(default = "default_service_url")]
    pub service_url: String,
    /// Client-side polling policy
    #[serde(default)]
    pub polling: PollingSettings,
}

fn default_service_url() -> String {
    "http://127.0.0.1:8080/".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            database_path: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            generation_timeout_secs: DEFAULT_TIMEOUT_SECS,
            service_url: default_service_url(),
            polling: PollingSettings::default(),
        }
    }
}

/// Polling policy knobs, all durations in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingSettings {
    /// Pause after submitting before the first lookup
    pub initial_delay_ms: u64,
    /// Pause between lookups
    pub interval_ms: u64,
    /// Lookups per polling run
    pub max_attempts: u32,
    /// Consecutive transport failures that trigger a backoff pause
    pub failure_threshold: u32,
    /// Length of the backoff pause
    pub backoff_ms: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            initial_delay_ms: 2_000,
            interval_ms: 3_000,
            max_attempts: 60,
            failure_threshold: 3,
            backoff_ms: 10_000,
        }
    }
}

impl AppConfig {
    /// Provider configuration for the generation oracle, with the given key
    pub fn provider_config(&self, api_key: Option<String>) -> ProviderConfig {
        ProviderConfig {
            api_key,
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            max_tokens: self.max_tokens,
            temperature: None,
            timeout_secs: self.generation_timeout_secs,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.bind_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(format!("Invalid bind_address: {}", self.bind_address));
        }

        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }

        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }

        if self.generation_timeout_secs == 0 {
            return Err("generation_timeout_secs must be greater than 0".to_string());
        }

        if !(self.service_url.starts_with("http://") || self.service_url.starts_with("https://")) {
            return Err(format!("Invalid service_url: {}", self.service_url));
        }

        self.polling.validate()
    }
}

impl PollingSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("polling.max_attempts must be at least 1".to_string());
        }
        if self.failure_threshold == 0 {
            return Err("polling.failure_threshold must be at least 1".to_string());
        }
        if self.backoff_ms < self.interval_ms {
            return Err("polling.backoff_ms must not be shorter than polling.interval_ms".to_string());
        }
        Ok(())
    }

    /// Total wall-clock budget of one polling run, excluding backoff pauses
    pub fn budget_ms(&self) -> u64 {
        self.interval_ms * u64::from(self.max_attempts)
    }
}
