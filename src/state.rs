//! Application State
//!
//! Shared state handed to every HTTP handler.

use std::path::PathBuf;
use std::sync::Arc;

use saju_intake_llm::{LlmProvider, OpenAIProvider};

use crate::models::settings::AppConfig;
use crate::services::JobCoordinator;
use crate::storage::{ConfigService, Database};
use crate::utils::error::{AppError, AppResult};

/// Application state shared by the axum handlers
#[derive(Clone)]
pub struct AppState {
    /// SQLite record store with connection pool
    database: Arc<Database>,
    /// Drives submissions through the oracle
    coordinator: JobCoordinator,
    /// Effective configuration (file + environment overrides)
    config: Arc<AppConfig>,
}

impl AppState {
    /// Assemble state from already-built parts
    pub fn new(config: AppConfig, database: Arc<Database>, oracle: Arc<dyn LlmProvider>) -> Self {
        let coordinator = JobCoordinator::new(database.clone(), oracle);
        Self {
            database,
            coordinator,
            config: Arc::new(config),
        }
    }

    /// Open the configured database and build the OpenAI provider
    pub fn initialize(config_service: &ConfigService, api_key: Option<String>) -> AppResult<Self> {
        let config = config_service.get_config_clone();

        let database = match config.database_path.as_deref() {
            Some(path) => Database::open(&PathBuf::from(path))?,
            None => Database::new()?,
        };

        if api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set; every submission will end in ERROR");
        }
        let provider = OpenAIProvider::new(config.provider_config(api_key))
            .map_err(|e| AppError::config(e.to_string()))?;

        Ok(Self::new(config, Arc::new(database), Arc::new(provider)))
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.database
    }

    pub fn coordinator(&self) -> &JobCoordinator {
        &self.coordinator
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Check if the database is healthy
    pub fn is_database_healthy(&self) -> bool {
        self.database.is_healthy()
    }

    /// Whether the oracle has credentials to call out with
    pub fn is_oracle_configured(&self) -> bool {
        self.coordinator.oracle().config().has_api_key()
    }
}
