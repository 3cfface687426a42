//! JSON Configuration Management
//!
//! Handles reading and writing the service configuration file and applying
//! environment overrides on top of it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::AppConfig;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{config_path, ensure_data_dir};

/// Overrides `bind_address`
pub const ENV_BIND: &str = "SAJU_INTAKE_BIND";
/// Overrides `database_path`
pub const ENV_DB: &str = "SAJU_INTAKE_DB";
/// Oracle API key; never written to the config file
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";

/// Configuration service for the intake server and client
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    config: AppConfig,
}

impl ConfigService {
    /// Load ~/.saju-intake/config.json, creating it with defaults if absent,
    /// then apply environment overrides.
    pub fn new() -> AppResult<Self> {
        ensure_data_dir()?;
        let mut service = Self::load_or_create(&config_path()?)?;
        service.apply_overrides(
            std::env::var(ENV_BIND).ok(),
            std::env::var(ENV_DB).ok(),
        )?;
        Ok(service)
    }

    /// Load the config at `path`, writing defaults there if the file is missing
    pub fn load_or_create(path: &Path) -> AppResult<Self> {
        let config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            let default_config = AppConfig::default();
            Self::save_to_file(path, &default_config)?;
            tracing::info!(path = %path.display(), "created default config");
            default_config
        };

        Ok(Self {
            config_path: path.to_path_buf(),
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<AppConfig> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::config)?;
        Ok(config)
    }

    /// Save configuration to a file with pretty formatting
    fn save_to_file(path: &Path, config: &AppConfig) -> AppResult<()> {
        config.validate().map_err(AppError::config)?;
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Apply bind address / database path overrides. Blank values are ignored.
    ///
    /// Overrides live in memory only; the file on disk is left untouched.
    pub fn apply_overrides(&mut self, bind: Option<String>, db: Option<String>) -> AppResult<()> {
        if let Some(bind) = bind.filter(|v| !v.trim().is_empty()) {
            tracing::debug!(bind = %bind, "bind address overridden from environment");
            self.config.bind_address = bind.trim().to_string();
        }
        if let Some(db) = db.filter(|v| !v.trim().is_empty()) {
            tracing::debug!(db = %db, "database path overridden from environment");
            self.config.database_path = Some(db.trim().to_string());
        }
        self.config.validate().map_err(AppError::config)
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a clone of the current configuration
    pub fn get_config_clone(&self) -> AppConfig {
        self.config.clone()
    }

    /// Path of the backing config file
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Oracle API key from the environment, if set and non-blank
    pub fn api_key_from_env() -> Option<String> {
        std::env::var(ENV_API_KEY)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}
