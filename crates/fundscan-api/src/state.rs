//! Shared handler state.

use fundscan_client::BoxFuture;
use fundscan_core::RankedSnapshot;
use fundscan_refresh::{RefreshOrchestrator, RefreshResult};
use std::sync::Arc;

/// Read access to the ranked snapshot.
///
/// Implemented by [`RefreshOrchestrator`]; tests substitute a mock.
pub trait SnapshotReader: Send + Sync {
    /// Serve the snapshot, refreshing first when forced or stale.
    fn read(&self, force_refresh: bool) -> BoxFuture<'_, RefreshResult<Arc<RankedSnapshot>>>;

    /// Current snapshot without triggering a refresh.
    fn current(&self) -> Option<Arc<RankedSnapshot>>;
}

impl SnapshotReader for RefreshOrchestrator {
    fn read(&self, force_refresh: bool) -> BoxFuture<'_, RefreshResult<Arc<RankedSnapshot>>> {
        Box::pin(RefreshOrchestrator::read(self, force_refresh))
    }

    fn current(&self) -> Option<Arc<RankedSnapshot>> {
        self.cache().current()
    }
}

/// Shared application state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    reader: Arc<dyn SnapshotReader>,
}

impl AppState {
    pub fn new(reader: Arc<dyn SnapshotReader>) -> Self {
        Self { reader }
    }

    pub fn reader(&self) -> &dyn SnapshotReader {
        self.reader.as_ref()
    }
}
