//! Configuration infrastructure
//!
//! Contains configuration loading and management for the program reader.
//!
//! Configuration is organized into three sections:
//! 1. Reader settings (where and how the program page is fetched)
//! 2. Parsing settings (event date, strictness, selectors)
//! 3. Logging settings

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

pub use crate::infrastructure::parsing::config::ParsingConfig;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Program page fetch settings
    pub reader: ReaderConfig,

    /// Talk extraction settings
    pub parsing: ParsingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Settings of the program page download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// URL of the conference program page
    pub program_url: String,

    /// User agent string for HTTP requests
    pub user_agent: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Whether to follow redirects
    pub follow_redirects: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            program_url: defaults::PROGRAM_URL.to_string(),
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            follow_redirects: true,
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output (stderr, stdout is reserved for results)
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Log file name inside the log directory
    pub file_name: String,

    /// Per-module log levels applied unless the level is "trace"
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "info".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("html5ever".to_string(), "warn".to_string());
                filters.insert("selectors".to_string(), "warn".to_string());
                filters
            },
        }
    }
}

/// Loads and stores [`AppConfig`] as a JSON file
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(defaults::APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Create a configuration manager for the user's config directory
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self::from_path(config_dir.join(defaults::CONFIG_FILE_NAME)))
    }

    /// Create a configuration manager for an explicit file location
    pub fn from_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            let default_config = AppConfig::default();
            self.save_config(&default_config).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .context("Failed to read configuration file")?;

        match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => {
                info!("Loaded configuration from: {:?}", self.config_path);
                Ok(config)
            }
            Err(parse_error) => {
                warn!("⚠️  Configuration file is invalid: {}", parse_error);

                let backup_path = self.config_path.with_extension("json.corrupted");
                if let Err(e) = fs::copy(&self.config_path, &backup_path).await {
                    // Without a backup the file is the only copy; leave it alone
                    warn!("Failed to create backup of corrupted config: {}", e);
                    warn!("Using default configuration for this run without saving it");
                    return Ok(AppConfig::default());
                }
                info!("Backed up corrupted config to: {:?}", backup_path);

                let default_config = AppConfig::default();
                self.save_config(&default_config)
                    .await
                    .context("Failed to save default configuration")?;

                info!("✅ Reset to default configuration");
                Ok(default_config)
            }
        }
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(config_dir) = self.config_path.parent() {
            fs::create_dir_all(config_dir)
                .await
                .context("Failed to create config directory")?;
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .with_context(|| format!("Failed to write configuration file: {:?}", self.config_path))?;

        info!("Configuration saved to: {:?}", self.config_path);
        Ok(())
    }
}

/// Default values
pub mod defaults {
    use chrono::NaiveDate;

    /// Name of the per-user configuration directory
    pub const APP_DIR_NAME: &str = "sddc-program-reader";

    pub const CONFIG_FILE_NAME: &str = "sddc_program_reader_config.json";

    /// Conference program page
    pub const PROGRAM_URL: &str = "http://sddconf.com/program/";

    pub const USER_AGENT: &str = "sddc-program-reader/0.2";

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    /// Event day the program's hour:minute times belong to
    pub const EVENT_YEAR: i32 = 2016;
    pub const EVENT_MONTH: u32 = 4;
    pub const EVENT_DAY: u32 = 18;

    /// A page without talks is returned as an empty program
    pub const REQUIRE_AT_LEAST_ONE_MATCH: bool = false;

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = false;
    pub const LOG_FILE_NAME: &str = "sddc-program-reader.log";

    pub fn event_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(EVENT_YEAR, EVENT_MONTH, EVENT_DAY).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_creates_default() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::from_path(dir.path().join("nested").join("config.json"));

        let config = manager.load_config().await.unwrap();

        assert_eq!(config, AppConfig::default());
        assert!(manager.config_path().exists());
    }

    #[tokio::test]
    async fn test_saved_config_is_loaded_back() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::from_path(dir.path().join("config.json"));

        let mut config = AppConfig::default();
        config.reader.program_url = "https://example.org/program".to_string();
        config.parsing.require_at_least_one_match = true;
        manager.save_config(&config).await.unwrap();

        assert_eq!(manager.load_config().await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_corrupted_file_is_backed_up_and_reset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let manager = ConfigManager::from_path(&path);

        let config = manager.load_config().await.unwrap();

        assert_eq!(config, AppConfig::default());
        assert!(path.with_extension("json.corrupted").exists());
    }

    #[tokio::test]
    async fn test_corrupted_file_is_kept_when_backup_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        // A directory in the way makes the backup copy fail
        std::fs::create_dir(path.with_extension("json.corrupted")).unwrap();
        let manager = ConfigManager::from_path(&path);

        let config = manager.load_config().await.unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_default_event_date_is_valid() {
        assert_eq!(defaults::event_date().to_string(), "2016-04-18");
    }
}
