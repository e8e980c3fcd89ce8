//! Configuration handling
//!
//! Optional user configuration is stored in `~/.config/taskfile/config.toml`
//! (or the platform equivalent). Command-line flags override it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::resolver::DEFAULT_TASKFILE;
use crate::domain::Platform;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// User configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Entrypoint file name looked up in the working directory
    pub entrypoint: String,

    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Platform used for overlays instead of the host's
    pub platform: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entrypoint: DEFAULT_TASKFILE.to_string(),
            default_format: OutputFormat::Text,
            platform: None,
        }
    }
}

impl Config {
    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "taskfile", "taskfile").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::global_config_dir() {
            Some(dir) => Self::load_from(&dir.join("config.toml")),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file, defaulting if it's absent
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.entrypoint.trim().is_empty() {
            return Err(ConfigError::Invalid("entrypoint must not be empty".to_string()));
        }
        if matches!(&self.platform, Some(p) if p.trim().is_empty()) {
            return Err(ConfigError::Invalid("platform must not be empty".to_string()));
        }
        Ok(())
    }

    /// The configured platform, or the host's
    pub fn effective_platform(&self) -> Platform {
        self.platform
            .as_deref()
            .map(Platform::new)
            .unwrap_or_else(Platform::current)
    }
}
