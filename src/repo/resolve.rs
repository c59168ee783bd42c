//! Chart resolution
//!
//! Turns `repository/chart` plus a version constraint into a
//! [`ResolvedKey`] pinned to one published archive:
//! 1. Look up the repository by name
//! 2. Ask its index for the published versions of the chart
//! 3. Pick the highest version satisfying the constraint

use crate::config::Config;
use crate::error::{SkegError, SkegResult};
use crate::repo::coordinates::{PackageCoordinates, ResolvedKey};
use crate::repo::index::{ChartVersion, RepositoryIndex, StaticIndex};
use semver::{Version, VersionReq};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// A named repository known to the resolver
#[derive(Clone)]
pub struct Repository {
    pub name: String,
    pub url: String,
    pub index: Arc<dyn RepositoryIndex>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("name", &self.name)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Resolves coordinates against the configured repositories
#[derive(Debug, Clone, Default)]
pub struct SourceResolver {
    repositories: BTreeMap<String, Repository>,
}

impl SourceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a resolver serving every `[repositories.<name>]` table
    pub fn from_config(config: &Config) -> Self {
        let mut resolver = Self::new();
        for (name, repo) in &config.repositories {
            resolver.add_repository(name, &repo.url, Arc::new(StaticIndex::from_config(repo)));
        }
        resolver
    }

    /// Register (or replace) a repository
    pub fn add_repository(
        &mut self,
        name: impl Into<String>,
        url: impl Into<String>,
        index: Arc<dyn RepositoryIndex>,
    ) {
        let name = name.into();
        self.repositories.insert(
            name.clone(),
            Repository {
                name,
                url: url.into(),
                index,
            },
        );
    }

    /// Known repositories, sorted by name
    pub fn repositories(&self) -> impl Iterator<Item = &Repository> {
        self.repositories.values()
    }

    /// Resolve coordinates to a version-pinned key. Never touches the network.
    pub async fn resolve(&self, coords: &PackageCoordinates) -> SkegResult<ResolvedKey> {
        let repo = self
            .repositories
            .get(&coords.repository_name)
            .ok_or_else(|| SkegError::UnknownRepository(coords.repository_name.clone()))?;

        let versions = repo.index.versions(&coords.package_name).await?;
        debug!(
            "{} has {} published versions of {}",
            repo.name,
            versions.len(),
            coords.package_name
        );

        let chosen = select_version(&versions, &coords.version_constraint).ok_or_else(|| {
            SkegError::NoMatchingVersion {
                chart: format!("{}/{}", coords.repository_name, coords.package_name),
                constraint: coords.version_constraint.clone(),
            }
        })?;

        debug!("Resolved {} to {} ({})", coords, chosen.version, chosen.url);

        let key = ResolvedKey::new(&chosen.name, &chosen.version, &chosen.url);
        Ok(match &chosen.digest {
            Some(digest) => key.with_digest(digest),
            None => key,
        })
    }
}

/// How a constraint string is interpreted
#[derive(Debug)]
enum Constraint {
    /// Empty or `*`: highest stable version
    Any,
    /// A bare version: that version only
    Exact(Version),
    /// A semver requirement: highest matching version
    Req(VersionReq),
    /// Anything else only matches a published version string verbatim
    Literal(String),
}

impl Constraint {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == "*" {
            return Self::Any;
        }
        if let Ok(version) = parse_version(raw) {
            return Self::Exact(version);
        }
        match VersionReq::parse(raw) {
            Ok(req) => Self::Req(req),
            Err(_) => Self::Literal(raw.to_string()),
        }
    }

    fn matches(&self, published: &str, parsed: Option<&Version>) -> bool {
        match (self, parsed) {
            (Self::Any, Some(v)) => v.pre.is_empty(),
            (Self::Exact(want), Some(v)) => want == v,
            (Self::Req(req), Some(v)) => req.matches(v),
            (Self::Literal(s), _) => s == published,
            _ => false,
        }
    }
}

/// Parse a published version, tolerating a leading `v`
fn parse_version(raw: &str) -> Result<Version, semver::Error> {
    Version::parse(raw.strip_prefix('v').unwrap_or(raw))
}

/// Pick the highest published version satisfying `constraint`
fn select_version<'a>(versions: &'a [ChartVersion], constraint: &str) -> Option<&'a ChartVersion> {
    let constraint = Constraint::parse(constraint);

    let mut best: Option<(&ChartVersion, Option<Version>)> = None;
    for candidate in versions {
        let parsed = parse_version(&candidate.version).ok();
        if !constraint.matches(&candidate.version, parsed.as_ref()) {
            continue;
        }
        let better = match (&best, &parsed) {
            (None, _) => true,
            (Some((_, Some(current))), Some(v)) => v > current,
            (Some((_, None)), Some(_)) => true,
            (Some(_), None) => false,
        };
        if better {
            best = Some((candidate, parsed));
        }
    }

    best.map(|(chosen, _)| chosen)
}
