//! Saju Intake LLM
//!
//! The generation oracle used by the job coordinator: a provider trait with a
//! single prompt-in, text-out call, its error taxonomy, and the OpenAI
//! chat-completions implementation.

pub mod http_client;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use http_client::build_http_client;
pub use openai::OpenAIProvider;
pub use provider::LlmProvider;
pub use types::*;
