//! Intake Client
//!
//! Submission over the unacknowledged write channel followed by polling over
//! the read channel.

pub mod error;
pub mod polling;
pub mod submission;
pub mod transport;

pub use error::{ClientError, ClientResult};
pub use polling::{PollOutcome, PollPolicy, PollingClient};
pub use submission::SubmissionClient;
pub use transport::{HttpTransport, LookupChannel, SubmitChannel};
