//! At-most-one in-flight execution with shared results.

use crate::error::{RefreshError, RefreshResult};
use fundscan_client::BoxFuture;
use fundscan_telemetry::Metrics;
use futures_util::future::{FutureExt, Shared};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

type SharedFlight<T> = Shared<BoxFuture<'static, RefreshResult<T>>>;

/// Slot holding the current flight and its generation.
type FlightSlot<T> = Arc<Mutex<Option<(u64, SharedFlight<T>)>>>;

/// Single-flight guard.
///
/// The first caller spawns the work on its own task; callers arriving while
/// it runs await the same result. The work is not cancelled when callers
/// drop their futures. Once it completes the slot is cleared and the next
/// call starts a fresh flight.
pub struct SingleFlight<T> {
    slot: FlightSlot<T>,
    generation: AtomicU64,
}

impl<T> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            generation: AtomicU64::new(0),
        }
    }
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a flight is currently running.
    pub fn is_in_flight(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Run `work` unless a flight is already running, in which case join it.
    ///
    /// `work` is only invoked when this call starts a new flight.
    pub async fn run<F, Fut>(&self, work: F) -> RefreshResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshResult<T>> + Send + 'static,
    {
        let flight = {
            let mut slot = self.slot.lock();
            match slot.as_ref() {
                Some((generation, flight)) => {
                    debug!(generation, "Joining in-flight refresh");
                    Metrics::refresh_joined();
                    flight.clone()
                }
                None => {
                    let generation = self.generation.fetch_add(1, Ordering::Relaxed);
                    let flight = self.spawn_flight(generation, work());
                    *slot = Some((generation, flight.clone()));
                    flight
                }
            }
        };

        flight.await
    }

    fn spawn_flight<Fut>(&self, generation: u64, work: Fut) -> SharedFlight<T>
    where
        Fut: Future<Output = RefreshResult<T>> + Send + 'static,
    {
        let guard = FlightGuard {
            slot: Arc::clone(&self.slot),
            generation,
        };

        let handle = tokio::spawn(async move {
            let _guard = guard;
            work.await
        });

        let joined: BoxFuture<'static, RefreshResult<T>> = Box::pin(async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => Err(RefreshError::Aborted(e.to_string())),
            }
        });

        joined.shared()
    }
}

/// Clears the slot entry of its flight when the spawned task ends,
/// including on panic and when every waiter is gone.
struct FlightGuard<T> {
    slot: FlightSlot<T>,
    generation: u64,
}

impl<T> Drop for FlightGuard<T> {
    fn drop(&mut self) {
        let mut slot = self.slot.lock();
        if matches!(slot.as_ref(), Some((current, _)) if *current == self.generation) {
            *slot = None;
        }
    }
}
