//! On-disk archive store
//!
//! Archives live at `{home}/cache/archive/{chart}@{version}.tgz`. Writes go
//! to a hidden temporary file in the same directory and are renamed into
//! place only after the digest check passes, so readers never see a
//! partial archive.

use crate::error::{SkegError, SkegResult};
use crate::repo::ResolvedKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Prefix of in-progress temporary files
pub(crate) const TEMP_PREFIX: &str = ".skeg-tmp-";

/// Extension of stored archives
const ARCHIVE_EXT: &str = "tgz";

/// A verified archive in the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub key: ResolvedKey,
    pub local_path: PathBuf,
    pub size_bytes: u64,
    /// SHA-256 of the archive, lowercase hex
    pub content_digest: String,
    pub fetched_at: DateTime<Utc>,
}

/// An archive found on disk by [`ArtifactStore::list`]
#[derive(Debug, Clone, Serialize)]
pub struct StoredArchive {
    pub file_name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Format bytes as human-readable size (e.g., "1.5 MB")
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// SHA-256 of `bytes` as lowercase hex
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Validate a chart name or version used as part of a file name
fn validate_component(kind: &str, value: &str) -> SkegResult<()> {
    let invalid = |reason: &str| SkegError::InvalidArtifactName {
        name: value.to_string(),
        reason: format!("{} {}", kind, reason),
    };

    if value.is_empty() {
        return Err(invalid("is empty"));
    }
    if value.contains("..") || value.starts_with('.') {
        return Err(invalid("must not start with '.' or contain '..'"));
    }
    // Alphanumerics plus the punctuation semver and chart names use
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+'))
    {
        return Err(invalid(
            "must contain only alphanumerics, '-', '_', '.' or '+'",
        ));
    }
    Ok(())
}

/// Content store for chart archives
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `root` (created lazily on first write)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the archives
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Final location of `key`'s archive, whether or not it exists yet
    pub fn archive_path(&self, key: &ResolvedKey) -> SkegResult<PathBuf> {
        validate_component("chart name", &key.package_name)?;
        validate_component("version", &key.exact_version)?;
        Ok(self.root.join(key.archive_name()))
    }

    /// Whether a complete archive for `key` is present
    pub async fn exists(&self, key: &ResolvedKey) -> bool {
        match self.archive_path(key) {
            Ok(path) => fs::metadata(&path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Location of `key`'s archive, or `ArtifactNotFound`
    pub async fn path_for(&self, key: &ResolvedKey) -> SkegResult<PathBuf> {
        let path = self.archive_path(key)?;
        if self.exists(key).await {
            Ok(path)
        } else {
            Err(SkegError::ArtifactNotFound(path))
        }
    }

    /// Verify and store `bytes` as `key`'s archive.
    ///
    /// On digest mismatch the temporary file is removed and nothing is left
    /// at the final path.
    pub async fn put(&self, key: &ResolvedKey, bytes: &[u8]) -> SkegResult<ArtifactRecord> {
        let final_path = self.archive_path(key)?;
        let digest = sha256_hex(bytes);

        fs::create_dir_all(&self.root).await.map_err(|e| {
            SkegError::write(format!("creating {}", self.root.display()), e)
        })?;

        let temp_path = self
            .root
            .join(format!("{}{}", TEMP_PREFIX, uuid::Uuid::new_v4()));

        if let Err(e) = write_synced(&temp_path, bytes).await {
            discard(&temp_path).await;
            return Err(SkegError::write(
                format!("writing {}", temp_path.display()),
                e,
            ));
        }

        if let Some(expected) = &key.expected_digest {
            if *expected != digest {
                discard(&temp_path).await;
                return Err(SkegError::VerificationFailed {
                    chart: key.to_string(),
                    expected: expected.clone(),
                    actual: digest,
                });
            }
        }

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            discard(&temp_path).await;
            return Err(SkegError::write(
                format!("moving archive into {}", final_path.display()),
                e,
            ));
        }

        debug!(
            "Stored {} ({}) at {}",
            key,
            format_bytes(bytes.len() as u64),
            final_path.display()
        );

        Ok(ArtifactRecord {
            key: key.clone(),
            local_path: final_path,
            size_bytes: bytes.len() as u64,
            content_digest: digest,
            fetched_at: Utc::now(),
        })
    }

    /// Rebuild the record of an archive already on disk.
    ///
    /// Returns `Ok(None)` when absent. An archive that fails the expected
    /// digest is removed and reported as absent so it gets fetched again.
    pub async fn load(&self, key: &ResolvedKey) -> SkegResult<Option<ArtifactRecord>> {
        let path = self.archive_path(key)?;

        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            // Something else squats on the name; `put` reports it
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SkegError::io(format!("inspecting {}", path.display()), e)),
        }

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SkegError::io(format!("reading {}", path.display()), e)),
        };

        let digest = sha256_hex(&bytes);
        if let Some(expected) = &key.expected_digest {
            if *expected != digest {
                warn!(
                    "Discarding corrupt archive {} (digest {}, expected {})",
                    path.display(),
                    digest,
                    expected
                );
                fs::remove_file(&path).await.map_err(|e| {
                    SkegError::write(format!("removing corrupt {}", path.display()), e)
                })?;
                return Ok(None);
            }
        }

        let fetched_at = fs::metadata(&path)
            .await
            .ok()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(Utc::now);

        Ok(Some(ArtifactRecord {
            key: key.clone(),
            local_path: path,
            size_bytes: bytes.len() as u64,
            content_digest: digest,
            fetched_at,
        }))
    }

    /// All complete archives, sorted by file name
    pub async fn list(&self) -> SkegResult<Vec<StoredArchive>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(SkegError::io(
                    format!("reading {}", self.root.display()),
                    e,
                ))
            }
        };

        let mut archives = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SkegError::io("reading archive entry", e))?
        {
            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if file_name.starts_with(TEMP_PREFIX)
                || path.extension().is_none_or(|ext| ext != ARCHIVE_EXT)
            {
                continue;
            }
            let Ok(meta) = entry.metadata().await else {
                continue;
            };
            if !meta.is_file() {
                continue;
            }
            archives.push(StoredArchive {
                file_name,
                path,
                size_bytes: meta.len(),
                modified_at: meta.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        archives.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(archives)
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    Ok(())
}

/// Best-effort removal of a temporary file
async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}
