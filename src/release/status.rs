//! Release status codes and status-filter parsing

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a deployed release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseStatus {
    Unknown,
    Deployed,
    Deleted,
    Deleting,
    Failed,
    Superseded,
    PendingInstall,
    PendingUpgrade,
    PendingRollback,
}

impl ReleaseStatus {
    /// Statuses listed when no filter is given
    pub const DEFAULT_FILTER: &'static [Self] = &[Self::Deployed, Self::Failed];

    /// Statuses selected by the `all` filter. Superseded revisions are
    /// history, not live releases, and stay out of it.
    pub const ALL_FILTER: &'static [Self] = &[
        Self::Unknown,
        Self::Deployed,
        Self::Deleted,
        Self::Deleting,
        Self::Failed,
        Self::PendingInstall,
        Self::PendingUpgrade,
        Self::PendingRollback,
    ];
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::Deployed => "deployed",
            Self::Deleted => "deleted",
            Self::Deleting => "deleting",
            Self::Failed => "failed",
            Self::Superseded => "superseded",
            Self::PendingInstall => "pending-install",
            Self::PendingUpgrade => "pending-upgrade",
            Self::PendingRollback => "pending-rollback",
        };
        write!(f, "{}", name)
    }
}

/// Parse a status filter: `all`, or comma-separated words out of
/// `deployed, deleted, deleting, failed, superseded, pending`.
///
/// `pending` selects all three pending states. Unknown words are ignored,
/// and the result is in canonical order regardless of input order.
pub fn parse_status_filter(raw: &str) -> Vec<ReleaseStatus> {
    let raw = raw.trim();
    if raw == "all" {
        return ReleaseStatus::ALL_FILTER.to_vec();
    }

    let words: Vec<&str> = raw.split(',').map(str::trim).collect();
    let has = |word: &str| words.contains(&word);

    let mut statuses = Vec::new();
    if has("deployed") {
        statuses.push(ReleaseStatus::Deployed);
    }
    if has("deleted") {
        statuses.push(ReleaseStatus::Deleted);
    }
    if has("deleting") {
        statuses.push(ReleaseStatus::Deleting);
    }
    if has("failed") {
        statuses.push(ReleaseStatus::Failed);
    }
    if has("superseded") {
        statuses.push(ReleaseStatus::Superseded);
    }
    if has("pending") {
        statuses.extend([
            ReleaseStatus::PendingInstall,
            ReleaseStatus::PendingUpgrade,
            ReleaseStatus::PendingRollback,
        ]);
    }
    statuses
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_excludes_superseded() {
        let all = parse_status_filter("all");
        assert_eq!(all.len(), 8);
        assert!(!all.contains(&ReleaseStatus::Superseded));
    }

    #[test]
    fn subset_in_canonical_order() {
        assert_eq!(
            parse_status_filter("failed, deployed"),
            vec![ReleaseStatus::Deployed, ReleaseStatus::Failed]
        );
    }

    #[test]
    fn pending_expands() {
        assert_eq!(
            parse_status_filter("pending"),
            vec![
                ReleaseStatus::PendingInstall,
                ReleaseStatus::PendingUpgrade,
                ReleaseStatus::PendingRollback,
            ]
        );
    }

    #[test]
    fn unknown_words_ignored() {
        assert!(parse_status_filter("bogus").is_empty());
        assert_eq!(
            parse_status_filter("bogus,superseded"),
            vec![ReleaseStatus::Superseded]
        );
    }

    #[test]
    fn display_and_serde_names() {
        assert_eq!(ReleaseStatus::PendingInstall.to_string(), "pending-install");
        assert_eq!(
            serde_json::to_string(&ReleaseStatus::PendingInstall).unwrap(),
            "\"PENDING_INSTALL\""
        );
    }
}
