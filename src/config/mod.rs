//! Configuration management for the moodiary application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults.
//!
//! # Environment Variables
//!
//! - `MOODIARY_DIR`: Path to the entries directory (defaults to ~/.moodiary/entries)
//! - `HOME`: Used for expanding the default entries directory path

use crate::constants::{
    DEFAULT_ENTRIES_SUBDIR, ENV_VAR_HOME, ENV_VAR_MOODIARY_DIR, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Configuration for the moodiary application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use moodiary::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     entries_dir: PathBuf::from("/path/to/entries"),
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Default)]
pub struct Config {
    /// Directory where entry records are stored.
    ///
    /// This is loaded from the MOODIARY_DIR environment variable with a fallback
    /// to ~/.moodiary/entries if not specified.
    pub entries_dir: PathBuf,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("entries_dir", &REDACTED_PLACEHOLDER)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The entries directory is expanded with `shellexpand`, so `~` and
    /// environment variable references are resolved.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the path expansion fails or yields an
    /// empty path.
    pub fn load() -> AppResult<Self> {
        let entries_dir_str = env::var(ENV_VAR_MOODIARY_DIR).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_default();
            format!("{}/{}", home, DEFAULT_ENTRIES_SUBDIR)
        });

        let expanded_path = shellexpand::full(&entries_dir_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;

        let entries_dir = PathBuf::from(expanded_path.into_owned());

        if entries_dir.as_os_str().is_empty() {
            return Err(AppError::Config(
                "Entries directory path is empty".to_string(),
            ));
        }

        Ok(Config { entries_dir })
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` with one of the following messages:
    /// - "Entries directory path is empty" if the path is empty
    /// - "Entries directory must be an absolute path" if the path is relative
    pub fn validate(&self) -> AppResult<()> {
        if self.entries_dir.as_os_str().is_empty() {
            return Err(AppError::Config(
                "Entries directory path is empty".to_string(),
            ));
        }

        if !self.entries_dir.is_absolute() {
            return Err(AppError::Config(
                "Entries directory must be an absolute path".to_string(),
            ));
        }

        Ok(())
    }
}
