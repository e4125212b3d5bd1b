//! Configuration for Tagledger

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, TagledgerError};
use crate::storage::DEFAULT_DATA_FILE;

/// Built-in redundant sources, tried in this order.
pub const DEFAULT_SOURCES: [&str; 2] = [
    "https://run.mocky.io/v3/03d2a7bd-f12f-4275-9e9a-84e41f9c2aae",
    "https://run.mocky.io/v3/aab281fe-3dbb-4d91-a863-a96e6bf083d7",
];

/// Environment variable pointing at a config file.
pub const CONFIG_ENV: &str = "TAGLEDGER_CONFIG";

/// Main configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagledgerConfig {
    /// Source addresses, tried strictly in order
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,

    /// Flat file holding the stored records
    #[serde(default = "default_data_path")]
    pub data_path: String,

    /// Transport timeout in seconds; must be positive
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_sources() -> Vec<String> {
    DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect()
}

fn default_data_path() -> String {
    DEFAULT_DATA_FILE.to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for TagledgerConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            data_path: default_data_path(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl TagledgerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TagledgerConfig =
            toml::from_str(&content).map_err(|e| TagledgerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the fetcher cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(TagledgerError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| TagledgerError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve configuration: explicit path, then `$TAGLEDGER_CONFIG`, then
    /// `~/.tagledger/config.toml` when it exists, then defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// ~/.tagledger/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    tagledger_logging::tagledger_home().map(|home| home.join("config.toml"))
}
