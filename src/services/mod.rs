//! Services
//!
//! Business logic services for the application.
//! Services handle the core functionality and are called by commands.

pub mod coordinator;
pub mod prompt;

pub use coordinator::{JobCoordinator, ERROR_PREFIX};
pub use prompt::build_prompt;
