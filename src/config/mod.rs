//! Configuration management for skeg

pub mod schema;

pub use schema::{ChartEntryConfig, Config, RepositoryConfig};

use crate::error::{SkegError, SkegResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skeg")
            .join("config.toml")
    }

    /// Get the default home directory (archive cache lives below it)
    pub fn default_home() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skeg")
    }

    /// Load configuration, using defaults if the file does not exist
    pub async fn load(&self) -> SkegResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> SkegResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| SkegError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| SkegError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> SkegResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            SkegError::io(format!("writing config to {}", self.config_path.display()), e)
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> SkegResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SkegError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: Arc::new(e),
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolved runtime settings handed to the package client.
///
/// Built once at startup from [`Config`] plus command-line overrides and
/// passed by reference; nothing reads configuration from globals.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Home directory
    pub home: PathBuf,

    /// Deadline for one fetch attempt
    pub fetch_timeout: Duration,

    /// Largest archive accepted, in bytes
    pub max_archive_bytes: u64,
}

impl Settings {
    /// Build settings from config; `home_override` wins over `general.home`
    pub fn from_config(config: &Config, home_override: Option<PathBuf>) -> Self {
        let home = home_override
            .or_else(|| config.general.home.clone())
            .unwrap_or_else(ConfigManager::default_home);

        Self {
            home,
            fetch_timeout: Duration::from_secs(config.fetch.timeout_secs),
            max_archive_bytes: config.fetch.max_archive_mb.saturating_mul(1024 * 1024),
        }
    }

    /// Directory holding downloaded chart archives
    pub fn archive_dir(&self) -> PathBuf {
        self.home.join("cache").join("archive")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().await.unwrap();
        assert_eq!(config.fetch.timeout_secs, 300);
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.fetch.timeout_secs = 42;

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert_eq!(loaded.fetch.timeout_secs, 42);
    }

    #[tokio::test]
    async fn load_invalid_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[fetch]\ntimeout_secs = \"soon\"\n").unwrap();

        let err = ConfigManager::with_path(path.clone())
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, SkegError::ConfigInvalid { path: p, .. } if p == path));
    }

    #[test]
    fn settings_home_precedence() {
        let mut config = Config::default();
        config.general.home = Some(PathBuf::from("/from/config"));

        let settings = Settings::from_config(&config, None);
        assert_eq!(settings.home, PathBuf::from("/from/config"));

        let settings = Settings::from_config(&config, Some(PathBuf::from("/from/flag")));
        assert_eq!(settings.home, PathBuf::from("/from/flag"));
        assert_eq!(
            settings.archive_dir(),
            PathBuf::from("/from/flag/cache/archive")
        );
    }

    #[test]
    fn settings_converts_units() {
        let config = Config::default();
        let settings = Settings::from_config(&config, Some(PathBuf::from("/h")));
        assert_eq!(settings.fetch_timeout, Duration::from_secs(300));
        assert_eq!(settings.max_archive_bytes, 100 * 1024 * 1024);
    }
}
