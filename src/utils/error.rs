//! Error Handling
//!
//! Unified error types for the server side of the application.
//! Uses thiserror for ergonomic error definitions.

use saju_intake_core::CoreError;
use saju_intake_llm::LlmError;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(String),

    /// SQLite errors (auto-converted from rusqlite::Error)
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Intake validation errors; no record is created
    #[error("Validation error: {0}")]
    Validation(String),

    /// Required intake fields are missing; no record is created
    #[error("missing_required_fields")]
    MissingFields(Vec<&'static str>),

    /// Generation oracle errors
    #[error("{0}")]
    Oracle(#[from] LlmError),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the caller can fix this by correcting the submission
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::MissingFields(_))
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingFields(fields) => Self::MissingFields(fields),
            CoreError::Serialization(e) => Self::Serialization(e),
            other => Self::Validation(other.to_string()),
        }
    }
}

/// Convert AppError to a string suitable for JSON error payloads
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
