//! Repository index state
//!
//! The resolver only needs the published versions of a chart. Where they
//! come from is behind [`RepositoryIndex`]; [`StaticIndex`] serves them
//! from the `[repositories]` section of the configuration.

use crate::config::RepositoryConfig;
use crate::error::SkegResult;
use async_trait::async_trait;

/// One published chart version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartVersion {
    pub name: String,
    pub version: String,
    /// Absolute archive URL
    pub url: String,
    /// Expected SHA-256 (hex) of the archive
    pub digest: Option<String>,
}

/// Source of published chart versions for one repository
#[async_trait]
pub trait RepositoryIndex: Send + Sync {
    /// All published versions of `chart`, in no particular order
    async fn versions(&self, chart: &str) -> SkegResult<Vec<ChartVersion>>;
}

/// Index held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticIndex {
    entries: Vec<ChartVersion>,
}

impl StaticIndex {
    pub fn new(entries: Vec<ChartVersion>) -> Self {
        Self { entries }
    }

    /// Build from a configured repository, expanding relative archive URLs
    pub fn from_config(repo: &RepositoryConfig) -> Self {
        let entries = repo
            .charts
            .iter()
            .map(|entry| {
                let relative = entry
                    .url
                    .clone()
                    .unwrap_or_else(|| format!("{}-{}.tgz", entry.name, entry.version));
                ChartVersion {
                    name: entry.name.clone(),
                    version: entry.version.clone(),
                    url: join_url(&repo.url, &relative),
                    digest: entry.digest.clone(),
                }
            })
            .collect();

        Self { entries }
    }

    /// Distinct chart names, sorted
    pub fn chart_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl RepositoryIndex for StaticIndex {
    async fn versions(&self, chart: &str) -> SkegResult<Vec<ChartVersion>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.name == chart)
            .cloned()
            .collect())
    }
}

/// Join an archive reference onto a repository base URL
pub fn join_url(base: &str, reference: &str) -> String {
    if reference.contains("://") {
        return reference.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        reference.trim_start_matches("./").trim_start_matches('/')
    )
}
