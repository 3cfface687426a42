//! Job Status & Wire Payloads
//!
//! Status values, the tagged job state, and the JSON payloads exchanged on
//! the submission and lookup channels. Shared by the server handlers and the
//! polling client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::sections::ParsedSections;

/// Service name reported by the liveness payload.
pub const SERVICE_NAME: &str = "saju-intake";

/// Lookup action name on the read channel.
pub const ACTION_GET_RESULT: &str = "getResult";

/// Processing status stored on each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Pending,
    Done,
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Done => "DONE",
            Self::Error => "ERROR",
        }
    }

    /// DONE and ERROR are terminal; no transition leaves them.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "PENDING" => Ok(Self::Pending),
            "DONE" => Ok(Self::Done),
            "ERROR" => Ok(Self::Error),
            other => Err(CoreError::unknown_status(other)),
        }
    }
}

/// Observable state of a job, as seen through the lookup channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Done { result: ParsedSections },
    Error { message: String },
}

impl JobState {
    pub fn status(&self) -> JobStatus {
        match self {
            Self::Pending => JobStatus::Pending,
            Self::Done { .. } => JobStatus::Done,
            Self::Error { .. } => JobStatus::Error,
        }
    }
}

/// Response of the submission channel (when it can be read at all).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    pub fn accepted(row: i64) -> Self {
        Self {
            ok: true,
            row: Some(row),
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            row: None,
            error: Some(error.into()),
        }
    }
}

/// Response of the lookup channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ParsedSections>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LookupResponse {
    pub fn from_state(state: &JobState) -> Self {
        match state {
            JobState::Pending => Self {
                ok: true,
                status: Some(JobStatus::Pending),
                result: None,
                error: None,
            },
            JobState::Done { result } => Self {
                ok: true,
                status: Some(JobStatus::Done),
                result: Some(result.clone()),
                error: None,
            },
            JobState::Error { message } => Self {
                ok: true,
                status: Some(JobStatus::Error),
                result: None,
                error: Some(message.clone()),
            },
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: None,
            result: None,
            error: Some(error.into()),
        }
    }

    /// Interpret the payload as a job state.
    ///
    /// Returns `None` for payloads that carry no usable state: `ok: false`,
    /// a missing status, or DONE without a result. Callers treat those like
    /// PENDING.
    pub fn state(&self) -> Option<JobState> {
        if !self.ok {
            return None;
        }
        match self.status? {
            JobStatus::Pending => Some(JobState::Pending),
            JobStatus::Done => self.result.clone().map(|result| JobState::Done { result }),
            JobStatus::Error => Some(JobState::Error {
                message: self.error.clone().unwrap_or_default(),
            }),
        }
    }
}

/// Static liveness payload returned by the read channel without an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivenessPayload {
    pub ok: bool,
    pub service: String,
    pub time: String,
}

impl LivenessPayload {
    pub fn new(time: impl Into<String>) -> Self {
        Self {
            ok: true,
            service: SERVICE_NAME.to_string(),
            time: time.into(),
        }
    }
}
