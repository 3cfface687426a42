//! Client Errors

use saju_intake_core::CoreError;
use thiserror::Error;

/// Errors surfaced by the submission and polling clients
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Required fields are blank; nothing was sent
    #[error("필수 항목을 입력해 주세요: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Input rejected before transmission
    #[error("Validation error: {0}")]
    Validation(String),

    /// The server could not be reached or answered with a non-success status
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a body that is not a lookup payload
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The cancellation token fired
    #[error("Cancelled")]
    Cancelled,
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingFields(fields) => Self::MissingFields(fields),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
