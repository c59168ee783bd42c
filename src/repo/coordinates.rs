//! Package coordinates and resolved artifact keys

use crate::error::{SkegError, SkegResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// What a caller asks for: a chart in a named repository plus a version
/// constraint. An empty constraint means the highest published version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageCoordinates {
    pub repository_name: String,
    pub package_name: String,
    pub version_constraint: String,
}

impl PackageCoordinates {
    pub fn new(
        repository_name: impl Into<String>,
        package_name: impl Into<String>,
        version_constraint: impl Into<String>,
    ) -> Self {
        Self {
            repository_name: repository_name.into(),
            package_name: package_name.into(),
            version_constraint: version_constraint.into(),
        }
    }

    /// Parse a `repository/chart` reference
    pub fn parse(reference: &str, version_constraint: Option<&str>) -> SkegResult<Self> {
        let (repo, chart) = reference
            .split_once('/')
            .ok_or_else(|| SkegError::InvalidChartReference(reference.to_string()))?;

        if repo.is_empty() || chart.is_empty() || chart.contains('/') {
            return Err(SkegError::InvalidChartReference(reference.to_string()));
        }

        Ok(Self::new(repo, chart, version_constraint.unwrap_or("").trim()))
    }
}

impl fmt::Display for PackageCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.repository_name, self.package_name)?;
        if !self.version_constraint.is_empty() {
            write!(f, "@{}", self.version_constraint)?;
        }
        Ok(())
    }
}

/// A chart pinned to one immutable published archive.
///
/// Identity is `(package_name, exact_version)`; the URL and digest travel
/// along but do not take part in equality or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedKey {
    pub package_name: String,
    pub exact_version: String,
    pub source_url: String,
    /// SHA-256 (hex) the archive must hash to, when the index publishes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_digest: Option<String>,
}

impl ResolvedKey {
    pub fn new(
        package_name: impl Into<String>,
        exact_version: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            exact_version: exact_version.into(),
            source_url: source_url.into(),
            expected_digest: None,
        }
    }

    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.expected_digest = Some(digest.into().to_ascii_lowercase());
        self
    }

    /// Archive file name, `{chart}@{version}.tgz`. Neither part may
    /// contain `@`, so distinct keys never share a file.
    pub fn archive_name(&self) -> String {
        format!("{}@{}.tgz", self.package_name, self.exact_version)
    }
}

impl PartialEq for ResolvedKey {
    fn eq(&self, other: &Self) -> bool {
        self.package_name == other.package_name && self.exact_version == other.exact_version
    }
}

impl Eq for ResolvedKey {}

impl Hash for ResolvedKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.package_name.hash(state);
        self.exact_version.hash(state);
    }
}

impl fmt::Display for ResolvedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.package_name, self.exact_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn parse_reference() {
        let coords = PackageCoordinates::parse("stable/wordpress", Some("0.8.7")).unwrap();
        assert_eq!(coords.repository_name, "stable");
        assert_eq!(coords.package_name, "wordpress");
        assert_eq!(coords.version_constraint, "0.8.7");
        assert_eq!(coords.to_string(), "stable/wordpress@0.8.7");
    }

    #[test]
    fn parse_reference_without_version() {
        let coords = PackageCoordinates::parse("stable/redis", None).unwrap();
        assert_eq!(coords.version_constraint, "");
        assert_eq!(coords.to_string(), "stable/redis");
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["wordpress", "/wordpress", "stable/", "stable/a/b"] {
            assert!(
                matches!(
                    PackageCoordinates::parse(bad, None),
                    Err(SkegError::InvalidChartReference(_))
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn key_identity_ignores_url_and_digest() {
        let a = ResolvedKey::new("wordpress", "0.8.7", "https://a/wordpress-0.8.7.tgz");
        let b = ResolvedKey::new("wordpress", "0.8.7", "https://mirror/w.tgz").with_digest("ff");
        let c = ResolvedKey::new("wordpress", "0.8.8", "https://a/wordpress-0.8.8.tgz");

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn key_archive_name() {
        let key = ResolvedKey::new("wordpress", "0.8.7", "https://a");
        assert_eq!(key.archive_name(), "wordpress@0.8.7.tgz");
    }

    #[test]
    fn hyphenated_names_do_not_collide() {
        let a = ResolvedKey::new("a-b", "1.0.0", "https://a");
        let b = ResolvedKey::new("a", "b-1.0.0", "https://a");
        assert_ne!(a, b);
        assert_ne!(a.archive_name(), b.archive_name());
    }
}
