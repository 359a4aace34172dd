//! Configuration loading and management for loichao.
//!
//! Loads settings from `loichao.toml` with environment variable overrides for sensitive data.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the Gemini credential.
pub const API_KEY_VAR: &str = "API_KEY";
/// Accepted as a fallback when `API_KEY` is not set.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Overrides `logging.filter`.
pub const LOG_FILTER_VAR: &str = "LOICHAO_LOG";

const CONFIG_FILE_NAME: &str = "loichao.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("{0} environment variable is not set")]
    MissingApiKey(String),
}

/// Generation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Base URL of the generative language API
    pub endpoint: String,
    /// Model identifier (e.g., "gemini-2.5-flash")
    pub model: String,
    pub temperature: f64,
    /// Nucleus sampling
    pub top_p: f64,
}

/// API key configuration (normally supplied through the environment)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file path. Defaults to `<cache dir>/loichao/loichao.log`.
    pub file: Option<PathBuf>,
    /// `tracing` filter directive, e.g. "loichao=debug"
    pub filter: Option<String>,
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Where this configuration was read from, if anywhere
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load configuration from an explicit path, or from the default
    /// locations (loichao.toml in cwd or home). Falls back to defaults when
    /// no file exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => match Self::find_config_file() {
                Some(found) => Self::load_from(&found)?,
                None => Self::default(),
            },
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from a specific path, without environment overrides
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Override sensitive or per-run values from the environment
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());

        if let Some(key) = non_empty(API_KEY_VAR).or_else(|| non_empty(GEMINI_API_KEY_VAR)) {
            self.api.key = Some(key);
        }
        if let Some(filter) = non_empty(LOG_FILTER_VAR) {
            self.logging.filter = Some(filter);
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE_NAME);
        if local_config.exists() {
            return Some(local_config);
        }

        let home_config = dirs::home_dir()?
            .join(".config")
            .join("loichao")
            .join(CONFIG_FILE_NAME);
        home_config.exists().then_some(home_config)
    }

    /// Get the API key for the generation service
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api
            .key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey(API_KEY_VAR.to_string()))
    }

    /// Resolved log file location
    pub fn log_file(&self) -> Option<PathBuf> {
        self.logging
            .file
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join("loichao").join("loichao.log")))
    }

    pub fn log_filter(&self) -> &str {
        self.logging.filter.as_deref().unwrap_or("loichao=info")
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.8,
            top_p: 0.9,
        }
    }
}
