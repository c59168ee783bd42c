//! Deduplicated chart archive cache
//!
//! Archives are keyed by `(chart, exact version)`, which always points at
//! an immutable published archive, so a stored archive never goes stale.
//! No in-process eviction: archives stay until removed from disk.
//!
//! # Fetch States
//!
//! | State | Description |
//! |-------|-------------|
//! | Absent | Never requested in this process |
//! | Pending | One owner task is downloading; other callers wait on it |
//! | Ready | Verified archive in the store; served without network |
//! | Failed | Last attempt failed; the next `acquire` starts a new one |

pub mod coordinator;
pub mod store;

pub use coordinator::{FetchCoordinator, FetchStatus};
pub use store::{format_bytes, sha256_hex, ArtifactRecord, ArtifactStore, StoredArchive};
