//! Response Types
//!
//! Payloads returned by the HTTP handlers that are not part of the shared
//! submission / lookup wire format.

use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
    pub database: bool,
    pub oracle_configured: bool,
    pub model: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            service: saju_intake_core::SERVICE_NAME.to_string(),
            database: false,
            oracle_configured: false,
            model: String::new(),
        }
    }
}
