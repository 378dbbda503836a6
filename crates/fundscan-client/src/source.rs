//! Market data source abstraction.

use crate::error::ClientResult;
use fundscan_core::{FundingHistoryEntry, InstrumentContext, InstrumentMeta};
use std::future::Future;
use std::pin::Pin;

/// Boxed future type for trait object compatibility.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Universe and contexts exactly as the exchange ordered them.
pub type UniverseAndContexts = (Vec<InstrumentMeta>, Vec<InstrumentContext>);

/// Source of exchange market data.
///
/// This trait abstracts the exchange API, allowing for:
/// - Unit testing the refresh pipeline with mock implementations
/// - Alternative transports (e.g., recorded fixtures)
pub trait MarketDataSource: Send + Sync {
    /// Fetch the instrument universe and the positionally aligned contexts.
    ///
    /// Fails with `ClientError::Upstream` on any non-success status or a body
    /// that is not `[ {universe: [...]}, [...] ]`.
    fn fetch_universe_and_contexts(&self) -> BoxFuture<'_, ClientResult<UniverseAndContexts>>;

    /// Fetch funding history for one instrument.
    ///
    /// Never fails: a non-success status, timeout, or malformed body is logged
    /// and yields an empty sequence. `end_ms = None` means "through now".
    fn fetch_funding_history<'a>(
        &'a self,
        coin: &'a str,
        start_ms: i64,
        end_ms: Option<i64>,
    ) -> BoxFuture<'a, Vec<FundingHistoryEntry>>;
}
