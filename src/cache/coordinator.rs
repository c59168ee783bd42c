//! Single-flight fetch coordination
//!
//! One table maps each resolved key to its fetch state. The first caller
//! for a key inserts a pending entry and spawns the fetch; everyone else
//! arriving while it runs subscribes to the same outcome. The table lock
//! is held only for map reads and writes, never across I/O.

use crate::cache::store::{ArtifactRecord, ArtifactStore};
use crate::error::{SkegError, SkegResult};
use crate::getter::GetterSet;
use crate::repo::ResolvedKey;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Terminal result of one fetch attempt
type Outcome = SkegResult<ArtifactRecord>;

/// Per-key state. Within one attempt the only transitions are
/// Pending -> Ready and Pending -> Failed.
enum FetchState {
    Pending(watch::Receiver<Option<Outcome>>),
    Ready(ArtifactRecord),
    Failed(SkegError),
}

/// Observable state of a key
#[derive(Debug, Clone)]
pub enum FetchStatus {
    Absent,
    Pending,
    Ready(ArtifactRecord),
    Failed(SkegError),
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::Pending => write!(f, "pending"),
            Self::Ready(_) => write!(f, "ready"),
            Self::Failed(_) => write!(f, "failed"),
        }
    }
}

type Table = Mutex<HashMap<ResolvedKey, FetchState>>;

/// Deduplicates concurrent fetches and fills the [`ArtifactStore`]
#[derive(Clone)]
pub struct FetchCoordinator {
    store: ArtifactStore,
    getters: GetterSet,
    timeout: Duration,
    table: Arc<Table>,
}

impl FetchCoordinator {
    pub fn new(store: ArtifactStore, getters: GetterSet, timeout: Duration) -> Self {
        Self {
            store,
            getters,
            timeout,
            table: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Current state of `key`
    pub fn status(&self, key: &ResolvedKey) -> FetchStatus {
        match lock(&self.table).get(key) {
            None => FetchStatus::Absent,
            Some(FetchState::Pending(_)) => FetchStatus::Pending,
            Some(FetchState::Ready(record)) => FetchStatus::Ready(record.clone()),
            Some(FetchState::Failed(err)) => FetchStatus::Failed(err.clone()),
        }
    }

    /// Get `key`'s archive, fetching it at most once across all callers.
    ///
    /// A key that is already Ready returns immediately as long as its
    /// archive is still on disk; an archive removed from under the cache
    /// is forgotten and fetched again. A key that failed is fetched again
    /// only because this call asked for it; the coordinator itself never
    /// retries. Dropping the returned future does not cancel a fetch other
    /// callers may be waiting on.
    pub async fn acquire(&self, key: &ResolvedKey) -> SkegResult<ArtifactRecord> {
        let mut rx = loop {
            let cached = {
                let mut table = lock(&self.table);
                match table.get(key) {
                    Some(FetchState::Ready(record)) => record.clone(),
                    Some(FetchState::Pending(rx)) => {
                        debug!("Joining in-flight fetch of {}", key);
                        break rx.clone();
                    }
                    Some(FetchState::Failed(err)) => {
                        debug!("Retrying {} after failure: {}", key, err);
                        break self.start_fetch(&mut table, key);
                    }
                    None => break self.start_fetch(&mut table, key),
                }
            };

            if self.store.exists(key).await {
                debug!("Cache hit for {}", key);
                return Ok(cached);
            }

            // Only drop the entry we looked at; a newer record stays
            let mut table = lock(&self.table);
            let stale = matches!(
                table.get(key),
                Some(FetchState::Ready(current)) if current.fetched_at == cached.fetched_at
            );
            if stale {
                warn!(
                    "Archive for {} is gone from {}, fetching again",
                    key,
                    cached.local_path.display()
                );
                table.remove(key);
            }
        };

        let outcome = rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| SkegError::Internal(format!("fetch of {} ended without a result", key)))?;

        match outcome.as_ref() {
            Some(result) => result.clone(),
            None => Err(SkegError::Internal(format!("fetch of {} has no result", key))),
        }
    }

    /// Insert a pending entry and spawn its owner task. Caller holds the lock.
    fn start_fetch(
        &self,
        table: &mut HashMap<ResolvedKey, FetchState>,
        key: &ResolvedKey,
    ) -> watch::Receiver<Option<Outcome>> {
        let (tx, rx) = watch::channel(None);
        table.insert(key.clone(), FetchState::Pending(rx.clone()));

        let publisher = Publisher {
            table: Arc::clone(&self.table),
            key: key.clone(),
            tx: Some(tx),
        };
        let this = self.clone();
        let key = key.clone();

        tokio::spawn(async move {
            let outcome = this.fetch(&key).await;
            publisher.publish(outcome);
        });

        rx
    }

    /// The owner's work: adopt an archive already on disk, or download,
    /// verify and store it. Runs without the table lock.
    async fn fetch(&self, key: &ResolvedKey) -> Outcome {
        if let Some(record) = self.store.load(key).await? {
            debug!("Adopting archive already on disk for {}", key);
            return Ok(record);
        }

        let getter = self.getters.for_url(&key.source_url)?;
        debug!("Fetching {} from {} via {}", key, key.source_url, getter.name());

        let bytes = tokio::time::timeout(self.timeout, getter.get(&key.source_url))
            .await
            .map_err(|_| SkegError::FetchTimeout {
                url: key.source_url.clone(),
                timeout_secs: self.timeout.as_secs(),
            })??;

        let record = self.store.put(key, &bytes).await?;
        info!(
            "Fetched {} ({} bytes, sha256 {})",
            key, record.size_bytes, record.content_digest
        );
        Ok(record)
    }
}

/// Publishes the terminal outcome of one attempt: table first, then
/// waiters. If dropped unpublished (owner task panicked or was aborted)
/// the attempt is marked Failed so waiters are not stranded.
struct Publisher {
    table: Arc<Table>,
    key: ResolvedKey,
    tx: Option<watch::Sender<Option<Outcome>>>,
}

impl Publisher {
    fn publish(mut self, outcome: Outcome) {
        self.finish(outcome);
    }

    fn finish(&mut self, outcome: Outcome) {
        let Some(tx) = self.tx.take() else {
            return;
        };

        {
            let state = match &outcome {
                Ok(record) => FetchState::Ready(record.clone()),
                Err(err) => {
                    warn!("Fetch of {} failed: {}", self.key, err);
                    FetchState::Failed(err.clone())
                }
            };
            lock(&self.table).insert(self.key.clone(), state);
        }

        // No receivers left is fine: the table already holds the result
        let _ = tx.send(Some(outcome));
    }
}

impl Drop for Publisher {
    fn drop(&mut self) {
        if self.tx.is_some() {
            let key = self.key.to_string();
            self.finish(Err(SkegError::Internal(format!(
                "fetch of {} was aborted",
                key
            ))));
        }
    }
}

/// The table holds plain data, so a poisoned lock is still usable
fn lock(table: &Table) -> MutexGuard<'_, HashMap<ResolvedKey, FetchState>> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}
