//! Data Models
//!
//! Stored records, configuration and response payloads.

pub mod intake;
pub mod response;
pub mod settings;

pub use intake::*;
pub use response::*;
pub use settings::*;
