//! Configuration management for devswipe.
//!
//! This module handles loading and saving the TOML configuration file and
//! layering environment overrides on top of it.

mod server;
mod settings;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use server::{ServerConfig, DEFAULT_SERVER_URL};
pub use settings::{Settings, MAX_STACK_DEPTH};

/// Environment variable overriding `server.api_url`.
pub const ENV_API_URL: &str = "DEVSWIPE_API_URL";

/// Environment variable overriding `server.realtime_url`.
pub const ENV_REALTIME_URL: &str = "DEVSWIPE_REALTIME_URL";

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform configuration directory could not be determined.
    #[error("could not determine configuration directory")]
    NoConfigDir,

    /// The configuration directory could not be created.
    #[error("failed to create configuration directory: {0}")]
    CreateDirError(std::io::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    ReadError(std::io::Error),

    /// The configuration file could not be written.
    #[error("failed to write configuration file: {0}")]
    WriteError(std::io::Error),

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A value failed validation.
    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Application settings.
    pub settings: Settings,
    /// Matching service endpoints.
    pub server: ServerConfig,
}

impl Config {
    /// Load the configuration from a specific file.
    ///
    /// A missing file yields the default configuration.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Save the configuration to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// The default configuration file path.
    ///
    /// - Linux: `~/.config/devswipe/config.toml`
    /// - macOS: `~/Library/Application Support/devswipe/config.toml`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\devswipe\config.toml`
    pub fn config_path() -> Result<PathBuf> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("devswipe").join("config.toml"))
    }

    /// Apply `DEVSWIPE_API_URL` and `DEVSWIPE_REALTIME_URL` if they are set.
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = non_empty_env(ENV_API_URL) {
            debug!(api_url = %url, "API URL overridden from environment");
            self.server.api_url = url;
        }
        if let Some(url) = non_empty_env(ENV_REALTIME_URL) {
            debug!(realtime_url = %url, "Realtime URL overridden from environment");
            self.server.realtime_url = url;
        }
    }

    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;

        if self.settings.tick_rate_ms == 0 {
            return Err(ConfigError::ValidationError(
                "tick_rate_ms must be greater than zero".to_string(),
            ));
        }

        if !(1..=MAX_STACK_DEPTH).contains(&self.settings.stack_depth) {
            return Err(ConfigError::ValidationError(format!(
                "stack_depth must be between 1 and {}",
                MAX_STACK_DEPTH
            )));
        }

        if self.settings.max_reconnect_delay_secs == 0 {
            return Err(ConfigError::ValidationError(
                "max_reconnect_delay_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
