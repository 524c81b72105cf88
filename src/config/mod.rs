//! Configuration management for LazyIssues.
//!
//! This module handles loading, saving and validating the user's
//! configuration file.

mod settings;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub use settings::{Settings, DEFAULT_BASE_URL};

/// Environment variable overriding the configured backend URL.
pub const URL_ENV_VAR: &str = "LAZYISSUES_URL";

/// Errors that can occur while handling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform configuration directory could not be determined.
    #[error("could not determine configuration directory")]
    NoConfigDir,

    /// The configuration directory could not be created.
    #[error("failed to create config directory: {0}")]
    CreateDirError(#[source] std::io::Error),

    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    ReadError(#[source] std::io::Error),

    /// The configuration file could not be written.
    #[error("failed to write config file: {0}")]
    WriteError(#[source] std::io::Error),

    /// The configuration file is not valid TOML for `Config`.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A configuration value is invalid.
    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The complete configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Application settings.
    #[serde(default)]
    pub settings: Settings,
}

impl Config {
    /// Load the configuration from the default location.
    ///
    /// A missing file yields the default configuration. The
    /// `LAZYISSUES_URL` environment variable overrides the backend URL.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load the configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            debug!(path = %path.display(), "Loading config file");
            let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
            toml::from_str::<Config>(&contents)?
        } else {
            debug!(path = %path.display(), "Config file not found, using defaults");
            Config::default()
        };

        if let Ok(url) = std::env::var(URL_ENV_VAR) {
            if !url.trim().is_empty() {
                debug!(%url, "Backend URL overridden from environment");
                config.settings.base_url = url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(ConfigError::WriteError)?;

        info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<()> {
        let settings = &self.settings;

        if !settings.base_url.starts_with("http://") && !settings.base_url.starts_with("https://")
        {
            return Err(ConfigError::ValidationError(format!(
                "base_url '{}' must start with http:// or https://",
                settings.base_url
            )));
        }

        if settings.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "page_size must be greater than zero".to_string(),
            ));
        }

        if settings.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the path of the configuration file.
    pub fn config_path() -> Result<PathBuf> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("lazyissues").join("config.toml"))
    }
}
