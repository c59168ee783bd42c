//! Release plans
//!
//! A plan is the fully prepared request a deployment manager would receive:
//! the chart is already fetched and every option is spelled out. Sending it
//! is the caller's business.

use crate::cache::ArtifactRecord;
use crate::client::PackageClient;
use crate::error::SkegResult;
use crate::release::options::{DeleteOptions, InstallRequest, ListOptions, UpdateRequest};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// The chart a plan deploys
#[derive(Debug, Clone, Serialize)]
pub struct PlannedChart {
    pub name: String,
    pub version: String,
    pub archive: PathBuf,
    pub sha256: String,
}

impl From<ArtifactRecord> for PlannedChart {
    fn from(record: ArtifactRecord) -> Self {
        Self {
            name: record.key.package_name,
            version: record.key.exact_version,
            archive: record.local_path,
            sha256: record.content_digest,
        }
    }
}

/// One prepared release operation
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ReleasePlan {
    Install {
        chart: PlannedChart,
        namespace: String,
        dry_run: bool,
    },
    Update {
        release: String,
        chart: PlannedChart,
        namespace: String,
        dry_run: bool,
        timeout_secs: u64,
    },
    Delete {
        release: String,
        #[serde(flatten)]
        options: DeleteOptions,
    },
    List {
        #[serde(flatten)]
        options: ListOptions,
    },
}

impl ReleasePlan {
    /// Fetch the chart and prepare an install
    pub async fn install(client: &PackageClient, req: &InstallRequest) -> SkegResult<Self> {
        let record = client.fetch_record(&req.coordinates()).await?;
        debug!("Planned install of {}", record.key);
        Ok(Self::Install {
            chart: record.into(),
            namespace: req.namespace.clone(),
            dry_run: req.dry_run,
        })
    }

    /// Fetch the chart and prepare an upgrade of `release`
    pub async fn update(
        client: &PackageClient,
        release: &str,
        req: &UpdateRequest,
    ) -> SkegResult<Self> {
        let record = client.fetch_record(&req.coordinates()).await?;
        debug!("Planned update of {} to {}", release, record.key);
        Ok(Self::Update {
            release: release.to_string(),
            chart: record.into(),
            namespace: req.namespace.clone(),
            dry_run: req.dry_run,
            timeout_secs: req.timeout_secs,
        })
    }

    pub fn delete(release: &str, options: DeleteOptions) -> Self {
        Self::Delete {
            release: release.to_string(),
            options,
        }
    }

    pub fn list(options: ListOptions) -> Self {
        Self::List { options }
    }
}
