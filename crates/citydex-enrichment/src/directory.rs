pub mod rest_countries;

use crate::clock::{Clock, SystemClock};
use crate::error::{DirectoryError, FetchError};
use async_trait::async_trait;
use citydex_core::CountryDirectoryEntry;
use jiff::{SignedDuration, Timestamp};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};

/// An upstream provider of the full country directory.
#[async_trait]
pub trait CountrySource: Send + Sync + 'static {
    /// Fetches every country the provider knows about.
    async fn fetch_countries(&self) -> Result<Vec<CountryDirectoryEntry>, FetchError>;
}

/// An immutable copy of the country directory and the time it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectorySnapshot {
    entries: Vec<CountryDirectoryEntry>,
    fetched_at: Timestamp,
}

impl DirectorySnapshot {
    pub fn new(entries: Vec<CountryDirectoryEntry>, fetched_at: Timestamp) -> Self {
        Self {
            entries,
            fetched_at,
        }
    }

    /// Entries in provider order.
    pub fn entries(&self) -> &[CountryDirectoryEntry] {
        &self.entries
    }

    pub fn fetched_at(&self) -> Timestamp {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn age(&self, now: Timestamp) -> SignedDuration {
        now.duration_since(self.fetched_at)
    }
}

/// Process-wide cache of the country directory.
///
/// A snapshot younger than the TTL is served without touching the network.
/// Otherwise the source is asked for a fresh directory; on success the
/// snapshot is replaced wholesale, on failure the previous snapshot (even a
/// stale one) keeps being served. Only when no snapshot was ever obtained does
/// a failed fetch surface as [`DirectoryError::Unavailable`].
///
/// Readers clone an `Arc` out of the lock, so a concurrent refresh is seen
/// either entirely or not at all. Refreshes are single-flight: callers that
/// miss while a fetch is in progress wait for it and share its outcome.
pub struct CountryDirectoryCache<S, C = SystemClock> {
    source: S,
    clock: C,
    ttl: SignedDuration,
    snapshot: RwLock<Option<Arc<DirectorySnapshot>>>,
    refresh: Mutex<()>,
    /// Completed fetch attempts, successful or not.
    attempts: AtomicU64,
    last_failure: RwLock<Option<FetchError>>,
}

impl<S: CountrySource> CountryDirectoryCache<S, SystemClock> {
    /// Creates an empty cache backed by the system clock.
    pub fn new(source: S, ttl: Duration) -> Self {
        Self::with_clock(source, SystemClock, ttl)
    }
}

impl<S: CountrySource, C: Clock> CountryDirectoryCache<S, C> {
    /// Creates an empty cache that reads time from `clock`.
    pub fn with_clock(source: S, clock: C, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            ttl: SignedDuration::try_from(ttl).unwrap_or(SignedDuration::MAX),
            snapshot: RwLock::new(None),
            refresh: Mutex::new(()),
            attempts: AtomicU64::new(0),
            last_failure: RwLock::new(None),
        }
    }

    /// The snapshot currently held, if any, without refreshing it.
    pub fn snapshot(&self) -> Option<Arc<DirectorySnapshot>> {
        self.snapshot.read().clone()
    }

    /// Returns the directory, refetching it when missing or stale.
    pub async fn get_directory(&self) -> Result<Arc<DirectorySnapshot>, DirectoryError> {
        if let Some(snapshot) = self.fresh_snapshot() {
            return Ok(snapshot);
        }

        let seen = self.attempts.load(Ordering::SeqCst);
        let _gate = self.refresh.lock().await;

        // a fetch finished while we waited for the gate
        if let Some(shared) = self.shared_outcome(seen) {
            trace!("country directory refresh coalesced");
            return shared;
        }

        let now = self.clock.now();
        let current = self.snapshot();
        match &current {
            Some(snapshot) => {
                debug!(age = %snapshot.age(now), "country directory is stale, refreshing")
            }
            None => debug!("country directory is empty, fetching"),
        }

        let outcome = match self.source.fetch_countries().await {
            Ok(entries) => {
                let fresh = Arc::new(DirectorySnapshot::new(entries, now));
                *self.snapshot.write() = Some(Arc::clone(&fresh));
                *self.last_failure.write() = None;
                info!(countries = fresh.len(), "country directory refreshed");
                Ok(fresh)
            }
            Err(error) => {
                *self.last_failure.write() = Some(error.clone());
                match current {
                    Some(stale) => {
                        warn!(
                            error = %error,
                            fetched_at = %stale.fetched_at(),
                            "country directory refresh failed, serving stale snapshot"
                        );
                        Ok(stale)
                    }
                    None => {
                        warn!(error = %error, "country directory fetch failed with no snapshot");
                        Err(DirectoryError::Unavailable(error))
                    }
                }
            }
        };
        self.attempts.fetch_add(1, Ordering::SeqCst);
        outcome
    }

    fn fresh_snapshot(&self) -> Option<Arc<DirectorySnapshot>> {
        let now = self.clock.now();
        let snapshot = self.snapshot()?;
        let age = snapshot.age(now);
        if age < self.ttl {
            trace!(age = %age, "country directory cache hit");
            Some(snapshot)
        } else {
            None
        }
    }

    /// The outcome of a fetch that completed after `seen` attempts, if any.
    fn shared_outcome(&self, seen: u64) -> Option<Result<Arc<DirectorySnapshot>, DirectoryError>> {
        if self.attempts.load(Ordering::SeqCst) == seen {
            return None;
        }
        match self.snapshot() {
            Some(snapshot) => Some(Ok(snapshot)),
            None => self
                .last_failure
                .read()
                .clone()
                .map(|error| Err(DirectoryError::Unavailable(error))),
        }
    }
}
