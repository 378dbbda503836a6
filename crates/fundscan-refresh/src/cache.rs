//! Staleness-aware snapshot cache.

use crate::error::RefreshResult;
use chrono::{DateTime, Duration, Utc};
use fundscan_client::BoxFuture;
use fundscan_core::RankedSnapshot;
use fundscan_telemetry::Metrics;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Something that can produce and publish a fresh snapshot.
pub trait Refresher: Send + Sync {
    /// Run a refresh and return the snapshot it published.
    fn refresh(&self) -> BoxFuture<'_, RefreshResult<Arc<RankedSnapshot>>>;
}

/// Holder of the single current [`RankedSnapshot`].
///
/// Snapshots are swapped by reference, so a reader holds either the old
/// snapshot or the new one in full.
pub struct SnapshotCache {
    current: RwLock<Option<Arc<RankedSnapshot>>>,
    staleness: Duration,
}

impl SnapshotCache {
    /// Create an empty cache.
    ///
    /// A snapshot older than `staleness` is refreshed before it is served.
    pub fn new(staleness: Duration) -> Self {
        Self {
            current: RwLock::new(None),
            staleness,
        }
    }

    /// The current snapshot, if any.
    pub fn current(&self) -> Option<Arc<RankedSnapshot>> {
        self.current.read().clone()
    }

    pub fn staleness(&self) -> Duration {
        self.staleness
    }

    /// Replace the current snapshot.
    ///
    /// Always replaces, even when the new snapshot's `computed_at` is earlier
    /// (wall clock stepped back). Callers serialize publication.
    pub fn publish(&self, snapshot: Arc<RankedSnapshot>) {
        let mut current = self.current.write();
        if let Some(existing) = current.as_ref() {
            if snapshot.computed_at < existing.computed_at {
                warn!(
                    current = %existing.computed_at,
                    replacement = %snapshot.computed_at,
                    "Replacing snapshot with one computed earlier, clock went backwards"
                );
            }
        }
        *current = Some(snapshot);
    }

    /// Install `snapshot` only if the cache is empty. Returns whether it was.
    pub fn seed(&self, snapshot: Arc<RankedSnapshot>) -> bool {
        let mut current = self.current.write();
        if current.is_some() {
            return false;
        }
        *current = Some(snapshot);
        true
    }

    /// Whether `snapshot` is past the staleness window at `now`.
    pub fn is_stale(&self, snapshot: &RankedSnapshot, now: DateTime<Utc>) -> bool {
        now > snapshot.computed_at + self.staleness
    }

    /// Read the snapshot, refreshing first when forced, empty, or stale.
    ///
    /// A failed refresh is returned as an error; the previous snapshot is
    /// never served in its place.
    pub async fn read(
        &self,
        force_refresh: bool,
        refresher: &dyn Refresher,
    ) -> RefreshResult<Arc<RankedSnapshot>> {
        let now = Utc::now();

        match self.current() {
            Some(snapshot) if !force_refresh && !self.is_stale(&snapshot, now) => {
                Metrics::cache_hit();
                Metrics::snapshot_age(snapshot.age(now).num_milliseconds() as f64 / 1_000.0);
                return Ok(snapshot);
            }
            Some(snapshot) if !force_refresh => {
                debug!(computed_at = %snapshot.computed_at, "Snapshot stale, refreshing");
            }
            Some(_) => debug!("Forced refresh requested"),
            None => debug!("No snapshot yet, refreshing"),
        }

        Metrics::cache_refresh();
        let snapshot = refresher.refresh().await?;
        Metrics::snapshot_age(0.0);
        Ok(snapshot)
    }
}
