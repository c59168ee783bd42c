//! Error types for skeg
//!
//! All modules use `SkegResult<T>` as their return type. The error is
//! `Clone` so a single fetch outcome can be handed to every waiter.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for skeg operations
pub type SkegResult<T> = Result<T, SkegError>;

/// All errors that can occur in skeg
#[derive(Error, Debug, Clone)]
pub enum SkegError {
    // Resolution errors
    #[error("Unknown repository: {0}")]
    UnknownRepository(String),

    #[error("No version of {chart} matches '{constraint}'")]
    NoMatchingVersion { chart: String, constraint: String },

    #[error("Invalid chart reference '{0}': expected <repository>/<chart>")]
    InvalidChartReference(String),

    // Fetch errors
    #[error("Verification failed for {chart}: expected digest {expected}, got {actual}")]
    VerificationFailed {
        chart: String,
        expected: String,
        actual: String,
    },

    #[error("Fetching {url} timed out after {timeout_secs}s")]
    FetchTimeout { url: String, timeout_secs: u64 },

    #[error("Network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Failed to write artifact: {context}")]
    Write {
        context: String,
        #[source]
        source: Arc<std::io::Error>,
    },

    // Store errors
    #[error("Invalid artifact name '{name}': {reason}")]
    InvalidArtifactName { name: String, reason: String },

    #[error("Artifact not found: {0}")]
    ArtifactNotFound(PathBuf),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: Arc<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[source] Arc<serde_json::Error>),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(String),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl SkegError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source: Arc::new(source),
        }
    }

    /// Create an artifact write error with context
    pub fn write(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Write {
            context: context.into(),
            source: Arc::new(source),
        }
    }

    /// Create a network error for a URL
    pub fn network(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Check if a fresh fetch attempt might succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::FetchTimeout { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownRepository(_) => Some("Add it under [repositories] in config.toml"),
            Self::NoMatchingVersion { .. } => Some("Run: skeg repo list"),
            Self::InvalidChartReference(_) => Some("Use the form stable/wordpress"),
            Self::VerificationFailed { .. } => {
                Some("The upstream archive does not match the repository index")
            }
            Self::FetchTimeout { .. } => Some("Raise fetch.timeout_secs or retry"),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SkegError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(Arc::new(e))
    }
}

impl From<toml::de::Error> for SkegError {
    fn from(e: toml::de::Error) -> Self {
        Self::TomlParse(e.to_string())
    }
}

impl From<toml::ser::Error> for SkegError {
    fn from(e: toml::ser::Error) -> Self {
        Self::TomlSerialize(e.to_string())
    }
}
