//! Getter for `file://` URLs

use crate::error::{SkegError, SkegResult};
use crate::getter::Getter;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// Reads archives from local disk
pub struct FileGetter {
    max_bytes: u64,
}

impl FileGetter {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }
}

#[async_trait]
impl Getter for FileGetter {
    fn schemes(&self) -> &'static [&'static str] {
        &["file"]
    }

    async fn get(&self, url: &str) -> SkegResult<Vec<u8>> {
        let path = url
            .split_once("://")
            .map(|(_, rest)| PathBuf::from(rest))
            .ok_or_else(|| SkegError::network(url, "malformed file URL"))?;

        let meta = fs::metadata(&path)
            .await
            .map_err(|e| SkegError::network(url, e.to_string()))?;
        if meta.len() > self.max_bytes {
            return Err(SkegError::network(
                url,
                format!("archive is {} bytes, limit is {}", meta.len(), self.max_bytes),
            ));
        }

        fs::read(&path)
            .await
            .map_err(|e| SkegError::network(url, e.to_string()))
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
