//! Package client: the entry point callers use to get a chart on disk
//!
//! Composes resolution, fetch coordination and the archive store. Holds no
//! state of its own beyond those components.

use crate::cache::{ArtifactRecord, ArtifactStore, FetchCoordinator};
use crate::config::{Config, Settings};
use crate::error::SkegResult;
use crate::getter::GetterSet;
use crate::repo::{PackageCoordinates, ResolvedKey, SourceResolver};
use futures_util::future::join_all;
use std::path::PathBuf;

/// Fetches charts by coordinates
#[derive(Clone)]
pub struct PackageClient {
    resolver: SourceResolver,
    coordinator: FetchCoordinator,
}

impl PackageClient {
    /// Create a client from explicit settings and already-built collaborators
    pub fn new(settings: &Settings, resolver: SourceResolver, getters: GetterSet) -> Self {
        let store = ArtifactStore::new(settings.archive_dir());
        Self {
            resolver,
            coordinator: FetchCoordinator::new(store, getters, settings.fetch_timeout),
        }
    }

    /// Create a client with the configured repositories and standard getters
    pub fn from_config(config: &Config, settings: &Settings) -> Self {
        Self::new(
            settings,
            SourceResolver::from_config(config),
            GetterSet::from_config(config, settings),
        )
    }

    pub fn resolver(&self) -> &SourceResolver {
        &self.resolver
    }

    pub fn coordinator(&self) -> &FetchCoordinator {
        &self.coordinator
    }

    pub fn store(&self) -> &ArtifactStore {
        self.coordinator.store()
    }

    /// Resolve coordinates without fetching
    pub async fn resolve(&self, coords: &PackageCoordinates) -> SkegResult<ResolvedKey> {
        self.resolver.resolve(coords).await
    }

    /// Fetch a chart and return its local archive path
    pub async fn fetch(&self, coords: &PackageCoordinates) -> SkegResult<PathBuf> {
        Ok(self.fetch_record(coords).await?.local_path)
    }

    /// Fetch a chart and return the full archive record
    pub async fn fetch_record(&self, coords: &PackageCoordinates) -> SkegResult<ArtifactRecord> {
        let key = self.resolver.resolve(coords).await?;
        self.coordinator.acquire(&key).await
    }

    /// Fetch several charts concurrently; results keep the input order
    pub async fn fetch_all(
        &self,
        coords: &[PackageCoordinates],
    ) -> Vec<SkegResult<ArtifactRecord>> {
        join_all(coords.iter().map(|c| self.fetch_record(c))).await
    }
}
