//! Configuration management for the production tracker
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with PTS_ prefix

use std::path::PathBuf;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::AppResult;
use crate::store::Store;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Where the collections are persisted
    pub storage: StorageConfig,

    /// Log output configuration
    pub logging: LoggingConfig,

    /// Report export configuration
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Directory holding one JSON file per collection
    pub data_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is not set
    pub filter: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReportConfig {
    /// When set, the report index is also exported as CSV to this path
    pub csv_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("PTS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("storage.backend", "file")?
            .set_default("storage.data_dir", "data")?
            .set_default("logging.filter", "production_tracker=info")?
            .set_default("logging.json", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (PTS_ prefix)
            .add_source(
                Environment::with_prefix("PTS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Open the configured store
    pub fn open_store(&self) -> AppResult<Store> {
        match self.storage.backend {
            StorageBackend::File => Store::open(self.storage.data_dir.clone()),
            StorageBackend::Memory => Ok(Store::in_memory()),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "production_tracker=info".to_string(),
            json: false,
        }
    }
}
