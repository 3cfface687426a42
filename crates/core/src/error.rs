//! Core Error Types
//!
//! Defines the foundational error types shared by the server and the client.
//! Kept dependency-free (only thiserror + std) so both sides can use them
//! without pulling in storage or HTTP crates.
//!
//! The server crate extends these with storage and oracle variants.

use thiserror::Error;

/// Core error type for the Saju Intake workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// One or more required intake fields are empty after trimming
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A status string that is not one of PENDING / DONE / ERROR
    #[error("Unknown job status: {0}")]
    UnknownStatus(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an unknown status error
    pub fn unknown_status(status: impl Into<String>) -> Self {
        Self::UnknownStatus(status.into())
    }

    /// Names of the missing fields, if this is a missing-fields error.
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            Self::MissingFields(fields) => fields,
            _ => &[],
        }
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
