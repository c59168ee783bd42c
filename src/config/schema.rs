//! Configuration schema for skeg
//!
//! Configuration is stored at `~/.config/skeg/config.toml`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Download settings
    pub fetch: FetchConfig,

    /// Chart repositories by name
    pub repositories: BTreeMap<String, RepositoryConfig>,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,

    /// Home directory holding the archive cache
    pub home: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            home: None,
        }
    }
}

/// Download settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Deadline for a single fetch attempt in seconds
    pub timeout_secs: u64,

    /// Largest archive accepted from a repository, in MB
    pub max_archive_mb: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 300,
            max_archive_mb: 100,
        }
    }
}

/// A named chart repository
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Base URL archives are served from (http, https or file)
    pub url: String,

    /// Bearer token sent with every request to this repository
    pub token: Option<String>,

    /// Published chart versions
    pub charts: Vec<ChartEntryConfig>,
}

/// One published chart version
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartEntryConfig {
    /// Chart name
    pub name: String,

    /// Published version
    pub version: String,

    /// Expected SHA-256 of the archive (hex)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    /// Archive URL, absolute or relative to the repository URL.
    /// Defaults to `{name}-{version}.tgz`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[fetch]"));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.fetch.timeout_secs, 300);
        assert!(config.repositories.is_empty());
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [fetch]
            timeout_secs = 30
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.fetch.max_archive_mb, 100); // default preserved
        assert_eq!(config.general.log_format, "text");
    }

    #[test]
    fn config_deserializes_repositories() {
        let toml = r#"
            [repositories.stable]
            url = "https://charts.example.com/stable"

            [[repositories.stable.charts]]
            name = "wordpress"
            version = "0.8.7"
            digest = "abc123"

            [[repositories.stable.charts]]
            name = "wordpress"
            version = "0.8.8"
            url = "archives/wordpress-0.8.8.tgz"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        let stable = &config.repositories["stable"];
        assert_eq!(stable.url, "https://charts.example.com/stable");
        assert!(stable.token.is_none());
        assert_eq!(stable.charts.len(), 2);
        assert_eq!(stable.charts[0].digest.as_deref(), Some("abc123"));
        assert_eq!(
            stable.charts[1].url.as_deref(),
            Some("archives/wordpress-0.8.8.tgz")
        );
    }
}
