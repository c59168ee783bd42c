//! Release request and option structs
//!
//! Every option a deployment manager call accepts, as a plain struct with
//! its default. JSON field names match the request bodies release
//! tooling already sends (`repoName`, `disableHooks`, ...).

use crate::release::status::{parse_status_filter, ReleaseStatus};
use crate::repo::PackageCoordinates;
use serde::{Deserialize, Serialize};

/// Default seconds to wait for any single cluster operation
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default page size for release listings
pub const DEFAULT_LIST_LIMIT: u32 = 256;

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Install a chart as a new release
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallRequest {
    pub repo_name: String,
    pub chart_name: String,
    /// Version constraint; empty picks the highest published version
    #[serde(default)]
    pub version: String,
    /// Target namespace; empty lets the manager choose
    #[serde(default)]
    pub namespace: String,
    /// Simulate the install
    #[serde(default)]
    pub dry_run: bool,
}

impl InstallRequest {
    pub fn coordinates(&self) -> PackageCoordinates {
        PackageCoordinates::new(&self.repo_name, &self.chart_name, &self.version)
    }
}

/// Upgrade an existing release to another chart version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub repo_name: String,
    pub chart_name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub dry_run: bool,
    /// Seconds to wait for any single cluster operation
    #[serde(default = "default_timeout", rename = "timeout")]
    pub timeout_secs: u64,
}

impl UpdateRequest {
    pub fn coordinates(&self) -> PackageCoordinates {
        PackageCoordinates::new(&self.repo_name, &self.chart_name, &self.version)
    }
}

impl Default for UpdateRequest {
    fn default() -> Self {
        Self {
            repo_name: String::new(),
            chart_name: String::new(),
            version: String::new(),
            namespace: String::new(),
            dry_run: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Delete a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOptions {
    /// Simulate the delete
    #[serde(default)]
    pub dry_run: bool,
    /// Skip hooks during deletion
    #[serde(default)]
    pub disable_hooks: bool,
    /// Remove the release record so its name can be reused
    #[serde(default)]
    pub purge: bool,
    /// Seconds to wait for any single cluster operation
    #[serde(default = "default_timeout", rename = "timeout")]
    pub timeout_secs: u64,
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            disable_hooks: false,
            purge: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Name,
    LastReleased,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// List releases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListOptions {
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    /// Maximum releases returned
    pub limit: u32,
    /// Name of the release to start after; empty starts at the beginning
    pub offset: String,
    /// Regular expression release names must match; empty matches all
    pub filter: String,
    /// Only releases in this namespace; empty means every namespace
    pub namespace: String,
    pub status_filter: Vec<ReleaseStatus>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            sort_by: SortBy::Name,
            sort_order: SortOrder::Asc,
            limit: DEFAULT_LIST_LIMIT,
            offset: String::new(),
            filter: String::new(),
            namespace: String::new(),
            status_filter: ReleaseStatus::DEFAULT_FILTER.to_vec(),
        }
    }
}

impl ListOptions {
    /// Build from query parameters (`sort_by`, `sort_ord`, `limit`,
    /// `offset`, `filter`, `status`, `namespace`).
    ///
    /// Unrecognised values fall back to the defaults; unknown keys are
    /// ignored. A negative `limit` has no meaning for a page size and is
    /// treated as unrecognised, so the default of 256 applies.
    pub fn from_query<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut opts = Self::default();
        for (key, value) in params {
            match key {
                "sort_by" => {
                    opts.sort_by = if value == "last_released" {
                        SortBy::LastReleased
                    } else {
                        SortBy::Name
                    }
                }
                "sort_ord" => {
                    opts.sort_order = if value == "desc" {
                        SortOrder::Desc
                    } else {
                        SortOrder::Asc
                    }
                }
                "limit" => {
                    if let Ok(limit) = value.trim().parse() {
                        opts.limit = limit;
                    }
                }
                "offset" => opts.offset = value.to_string(),
                "filter" => opts.filter = value.to_string(),
                "namespace" => opts.namespace = value.to_string(),
                "status" if !value.is_empty() => opts.status_filter = parse_status_filter(value),
                _ => {}
            }
        }
        opts
    }
}
