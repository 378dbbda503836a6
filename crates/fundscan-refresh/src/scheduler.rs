//! Periodic refresh scheduler.

use crate::cache::Refresher;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Background task that refreshes on a fixed interval.
///
/// The first tick fires one interval after start; the host runs the eager
/// startup refresh itself. Ticks missed while a refresh runs are delayed,
/// not burst.
pub struct RefreshScheduler {
    shutdown_token: CancellationToken,
    handle: JoinHandle<()>,
}

impl RefreshScheduler {
    /// Spawn the scheduler.
    pub fn start(refresher: Arc<dyn Refresher>, interval: Duration) -> Self {
        Self::start_with_token(refresher, interval, CancellationToken::new())
    }

    /// Spawn the scheduler, stopping when `shutdown_token` is cancelled.
    pub fn start_with_token(
        refresher: Arc<dyn Refresher>,
        interval: Duration,
        shutdown_token: CancellationToken,
    ) -> Self {
        info!(interval_secs = interval.as_secs(), "Refresh scheduler started");

        let handle = tokio::spawn(run_schedule(refresher, interval, shutdown_token.clone()));

        Self {
            shutdown_token,
            handle,
        }
    }

    /// Whether the scheduler task is still running.
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop the scheduler and wait for its task to exit.
    ///
    /// A scheduled refresh in progress keeps running on its own task; only
    /// the scheduler stops waiting for it.
    pub async fn shutdown(self) {
        info!("Refresh scheduler shutdown requested");
        self.shutdown_token.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Refresh scheduler task ended abnormally");
        }
    }
}

async fn run_schedule(
    refresher: Arc<dyn Refresher>,
    interval: Duration,
    shutdown_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown_token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        debug!("Scheduled refresh tick");

        tokio::select! {
            _ = shutdown_token.cancelled() => break,
            result = refresher.refresh() => match result {
                Ok(snapshot) => debug!(ranked = snapshot.len(), "Scheduled refresh succeeded"),
                Err(e) => warn!(error = %e, "Scheduled refresh failed"),
            },
        }
    }

    info!("Refresh scheduler stopped");
}
