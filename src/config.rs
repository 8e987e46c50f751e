//! Configuration management and validation.
//!
//! Provides the layered configuration for the processor: built-in defaults,
//! an optional TOML file, then environment-supplied RTT credentials. CLI
//! overrides are applied by the command layer on top of the loaded value.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_DATA_DIR, DEFAULT_DATABASE, DEFAULT_INFLUX_URL,
    DEFAULT_RTT_BASE_URL, RTT_PASSWORD_VAR, RTT_USERNAME_VAR,
};
use crate::error::{Result, RttError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Global configuration for the RTT processor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// InfluxDB storage settings
    pub influx: InfluxConfig,

    /// Realtime Trains API access settings
    pub rtt: RttConfig,

    /// Batch import settings
    pub import: ImportConfig,
}

/// InfluxDB storage settings.
///
/// Database name and write precision are fixed deployment configuration,
/// deliberately not exposed as CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluxConfig {
    /// Base URL of the InfluxDB 1.x write API
    pub url: String,

    /// Database every batch is written to
    pub database: String,
}

impl Default for InfluxConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_INFLUX_URL.to_string(),
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

/// Realtime Trains API access settings.
///
/// Credentials layer from the config file and the `RTT_USERNAME` /
/// `RTT_PASSWORD` environment variables; the environment wins.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RttConfig {
    /// Base URL of the RTT JSON API
    pub base_url: String,

    /// API username
    pub username: Option<String>,

    /// API password
    pub password: Option<String>,
}

impl Default for RttConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RTT_BASE_URL.to_string(),
            username: None,
            password: None,
        }
    }
}

impl fmt::Debug for RttConfig {
    // The password never reaches log output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RttConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field(
                "password",
                &self.password.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Batch import settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Directory scanned for snapshot files
    pub data_dir: PathBuf,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl Config {
    /// Default config file location (`~/.config/rtt-processor/config.toml`
    /// on Linux).
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Load configuration using the layered approach (defaults -> file ->
    /// environment). Pass `None` to fall back to the default config file
    /// location when it exists.
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path().filter(|path| path.exists()) {
                Some(path) => {
                    debug!("Using config file: {}", path.display());
                    Self::from_file(&path)?
                }
                None => Self::default(),
            },
        };

        config.apply_env();
        Ok(config)
    }

    /// Layer the credential environment variables over the loaded values.
    fn apply_env(&mut self) {
        if let Ok(username) = std::env::var(RTT_USERNAME_VAR) {
            self.rtt.username = Some(username);
        }
        if let Ok(password) = std::env::var(RTT_PASSWORD_VAR) {
            self.rtt.password = Some(password);
        }
    }

    /// Both credentials, when configured.
    pub fn rtt_credentials(&self) -> Option<(&str, &str)> {
        match (&self.rtt.username, &self.rtt.password) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        }
    }

    /// Validate the loaded configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.influx.url.starts_with("http://") && !self.influx.url.starts_with("https://") {
            return Err(RttError::Configuration {
                message: format!("InfluxDB URL must be http(s), got: {}", self.influx.url),
            });
        }

        if self.influx.database.is_empty()
            || self.influx.database.contains(char::is_whitespace)
        {
            return Err(RttError::Configuration {
                message: format!("invalid database name: {:?}", self.influx.database),
            });
        }

        if !self.rtt.base_url.starts_with("http://") && !self.rtt.base_url.starts_with("https://")
        {
            return Err(RttError::Configuration {
                message: format!("RTT base URL must be http(s), got: {}", self.rtt.base_url),
            });
        }

        Ok(())
    }
}
