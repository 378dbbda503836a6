//! Refresh orchestration.
//!
//! Runs the pipeline under a single-flight guard, publishes the result into
//! the cache and writes the persisted document.

use crate::cache::{Refresher, SnapshotCache};
use crate::error::RefreshResult;
use crate::pipeline::RefreshPipeline;
use crate::single_flight::SingleFlight;
use fundscan_client::BoxFuture;
use fundscan_core::RankedSnapshot;
use fundscan_persistence::{SnapshotDocument, SnapshotStore};
use fundscan_telemetry::Metrics;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Refresh orchestrator.
///
/// The only writer of the cache. Concurrent `refresh` calls (scheduled,
/// forced, or triggered by a stale read) share one in-flight run.
pub struct RefreshOrchestrator {
    pipeline: Arc<RefreshPipeline>,
    cache: Arc<SnapshotCache>,
    store: Arc<dyn SnapshotStore>,
    flight: SingleFlight<Arc<RankedSnapshot>>,
}

impl RefreshOrchestrator {
    pub fn new(
        pipeline: RefreshPipeline,
        cache: Arc<SnapshotCache>,
        store: Arc<dyn SnapshotStore>,
    ) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            cache,
            store,
            flight: SingleFlight::new(),
        }
    }

    pub fn cache(&self) -> &Arc<SnapshotCache> {
        &self.cache
    }

    /// Whether a refresh is currently running.
    pub fn is_refreshing(&self) -> bool {
        self.flight.is_in_flight()
    }

    /// Seed an empty cache with the persisted document, if any.
    ///
    /// Returns whether a snapshot was seeded. Load failures are logged.
    pub fn seed_from_store(&self) -> bool {
        let document = match self.store.load() {
            Ok(Some(document)) => document,
            Ok(None) => return false,
            Err(e) => {
                warn!(store = %self.store.describe(), error = %e, "Failed to load persisted snapshot");
                return false;
            }
        };

        match document.into_snapshot() {
            Ok(snapshot) => {
                info!(
                    store = %self.store.describe(),
                    coins = snapshot.len(),
                    last_updated = %snapshot.computed_at,
                    "Seeded cache from persisted snapshot"
                );
                self.cache.seed(Arc::new(snapshot))
            }
            Err(e) => {
                warn!(error = %e, "Discarding persisted snapshot");
                false
            }
        }
    }

    /// Run a refresh, or join the one in flight.
    ///
    /// On success the new snapshot is already published when this returns.
    /// On failure the cache is untouched.
    pub async fn refresh(&self) -> RefreshResult<Arc<RankedSnapshot>> {
        let pipeline = Arc::clone(&self.pipeline);
        let cache = Arc::clone(&self.cache);
        let store = Arc::clone(&self.store);

        self.flight
            .run(move || run_refresh(pipeline, cache, store))
            .await
    }

    /// Serve the cached snapshot, refreshing first when forced or stale.
    pub async fn read(&self, force_refresh: bool) -> RefreshResult<Arc<RankedSnapshot>> {
        self.cache.read(force_refresh, self).await
    }
}

impl Refresher for RefreshOrchestrator {
    fn refresh(&self) -> BoxFuture<'_, RefreshResult<Arc<RankedSnapshot>>> {
        Box::pin(RefreshOrchestrator::refresh(self))
    }
}

async fn run_refresh(
    pipeline: Arc<RefreshPipeline>,
    cache: Arc<SnapshotCache>,
    store: Arc<dyn SnapshotStore>,
) -> RefreshResult<Arc<RankedSnapshot>> {
    let started = Instant::now();
    info!("Refresh started");

    let snapshot = match pipeline.run().await {
        Ok(snapshot) => Arc::new(snapshot),
        Err(e) => {
            let elapsed = started.elapsed();
            error!(error = %e, elapsed_ms = elapsed.as_millis() as u64, "Refresh failed");
            Metrics::refresh_finished(false, elapsed.as_secs_f64());
            return Err(e);
        }
    };

    cache.publish(Arc::clone(&snapshot));
    persist(store, &snapshot).await;

    let elapsed = started.elapsed();
    Metrics::refresh_finished(true, elapsed.as_secs_f64());
    Metrics::ranked_instruments(snapshot.len());

    info!(
        ranked = snapshot.len(),
        computed_at = %snapshot.computed_at,
        valid_until = %snapshot.valid_until,
        elapsed_ms = elapsed.as_millis() as u64,
        "Refresh complete"
    );

    Ok(snapshot)
}

/// Replace the persisted document. Failures are logged and counted only.
async fn persist(store: Arc<dyn SnapshotStore>, snapshot: &RankedSnapshot) {
    let document = SnapshotDocument::from(snapshot);
    let description = store.describe();

    match tokio::task::spawn_blocking(move || store.replace(&document)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            warn!(store = %description, error = %e, "Failed to persist snapshot");
            Metrics::persist_failed();
        }
        Err(e) => {
            warn!(store = %description, error = %e, "Persist task failed");
            Metrics::persist_failed();
        }
    }
}
