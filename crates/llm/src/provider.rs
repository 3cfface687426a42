//! LLM Provider Trait
//!
//! Defines the interface of the generation oracle: prompt in, text out.

use async_trait::async_trait;

use super::types::{LlmError, LlmResult, ProviderConfig};

/// Trait that all generation providers must implement.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Returns the provider name for identification.
    fn name(&self) -> &'static str;

    /// Returns the current model being used.
    fn model(&self) -> &str;

    /// Generate text for a single user prompt.
    ///
    /// Implementations make exactly one upstream call and never retry.
    async fn generate(&self, prompt: &str) -> LlmResult<String>;

    /// Get the configuration for this provider.
    fn config(&self) -> &ProviderConfig;
}

/// Helper function to create an error for missing API key
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::AuthenticationFailed {
        message: format!("API key not configured for {}", provider),
    }
}

/// Map a non-2xx response to an error carrying both the status and the body
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    let message = format!("{} HTTP {}: {}", provider, status, body);
    match status {
        401 | 403 => LlmError::AuthenticationFailed { message },
        429 => LlmError::RateLimited {
            message,
            retry_after: None,
        },
        400 | 404 => LlmError::InvalidRequest { message },
        500..=599 => LlmError::ServerError {
            message: body.to_string(),
            status: Some(status),
        },
        _ => LlmError::Other { message },
    }
}
