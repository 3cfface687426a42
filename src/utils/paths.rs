//! Path Utilities
//!
//! Resolves the service data directory (~/.saju-intake/) and the files in it.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the service data directory (~/.saju-intake/)
pub fn data_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".saju-intake"))
}

/// Get the config file path (~/.saju-intake/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(data_dir()?.join("config.json"))
}

/// Get the default database file path (~/.saju-intake/intake.db)
pub fn database_path() -> AppResult<PathBuf> {
    Ok(data_dir()?.join("intake.db"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the data directory, creating it if it doesn't exist
pub fn ensure_data_dir() -> AppResult<PathBuf> {
    let path = data_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
