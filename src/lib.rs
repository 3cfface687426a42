//! Saju Intake - Server and Client Library
//!
//! Intake submissions are stored as PENDING records, sent once to a
//! generation oracle, and finish as DONE (with six parsed sections) or ERROR.
//! Clients submit without an acknowledgement and then poll by phone and
//! birthdate until the record is terminal.
//! It includes:
//! - HTTP command handlers (axum)
//! - The job coordinator and prompt builder
//! - Storage layer (SQLite, JSON config)
//! - Submission and polling clients
//! - Data models and utilities

pub mod client;
pub mod commands;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use commands::router;
pub use models::response::*;
pub use models::settings::{AppConfig, PollingSettings};
pub use services::JobCoordinator;
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
