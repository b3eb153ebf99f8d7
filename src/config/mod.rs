//! # Configuration
//!
//! Type-safe configuration loaded from TOML, with defaults for every section so
//! a missing file still yields a working setup.
//!
//! ## Configuration Structure
//!
//! - [`FortunesConfig`] - where the fortune list comes from
//! - [`StorageConfig`] - where the seen set is persisted
//! - [`LoggingConfig`] - log level and optional log file
//! - [`LinksConfig`] - base URL used when generating tag links
//!
//! ## Configuration File Format
//!
//! ```toml
//! [fortunes]
//! file = "fortunes.txt"   # omit to use the built-in list
//!
//! [storage]
//! data_dir = "./data"
//!
//! [logging]
//! level = "info"
//! file = "fortunecookie.log"
//!
//! [links]
//! base_url = "https://yourdomain.example/"
//! ```

use crate::fortune::FortuneList;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FortunesConfig {
    /// JSON array, `%`-separated fortune file, or one fortune per line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of `error`, `warn`, `info`, `debug`, `trace`. Unknown values fall back to `warn`.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Warn)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    pub base_url: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            base_url: "https://yourdomain.example/".to_string(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fortunes: FortunesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub links: LinksConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Like [`Config::load`], but a missing file means defaults. A file that
    /// exists and does not parse is still an error.
    pub async fn load_or_default(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            log::debug!("config: {} not found, using defaults", path);
            return Ok(Config::default());
        }
        Self::load(path).await
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// The configured fortune list, or the built-in one.
    pub fn fortune_list(&self) -> Result<FortuneList> {
        match &self.fortunes.file {
            Some(file) => Ok(FortuneList::load(file)?),
            None => Ok(FortuneList::builtin()),
        }
    }
}
