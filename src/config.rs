//! Configuration management for the METS workspace resolver
//!
//! Unified TOML configuration with zero-config defaults: every field has
//! a sensible default, so a missing configuration file is not an error
//! and an explicit one only needs to name what it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::fetcher::FetcherConfig;
use crate::constants::workspace;
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP fetcher settings
    pub fetcher: FetcherConfig,
    /// Workspace layout settings
    pub workspace: WorkspaceSettings,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Workspace layout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    /// Basename of the manifest inside a workspace
    pub mets_basename: String,
    /// Concurrent download workers for full-workspace downloads
    pub worker_count: usize,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            mets_basename: workspace::DEFAULT_METS_BASENAME.to_string(),
            worker_count: workspace::DEFAULT_WORKER_COUNT,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level when no CLI verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an explicit path, or from the default
    /// location when `path` is `None`. A missing default file yields the
    /// built-in defaults; a missing explicit file is an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for a missing explicit path and
    /// `ConfigError::InvalidFormat` for unparsable TOML.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                    });
                }
                Self::from_file(path)
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("no configuration file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Default configuration file location for the current OS.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mets-workspace").join("config.toml"))
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }
}
