//! Scriptable in-memory market data source.

use fundscan_client::{BoxFuture, ClientError, ClientResult, MarketDataSource, UniverseAndContexts};
use fundscan_core::{FundingHistoryEntry, InstrumentContext, InstrumentMeta};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock market data source.
///
/// Counts calls, can fail the universe fetch, adds latency, and tracks the
/// peak number of concurrent funding-history requests.
#[derive(Default)]
pub struct MockSource {
    universe: Mutex<(Vec<InstrumentMeta>, Vec<InstrumentContext>)>,
    histories: Mutex<HashMap<String, Vec<FundingHistoryEntry>>>,
    universe_error: Mutex<Option<String>>,
    universe_delay: Mutex<Duration>,
    funding_delay: Mutex<Duration>,
    universe_calls: AtomicUsize,
    funding_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_universe(&self, metas: Vec<InstrumentMeta>, contexts: Vec<InstrumentContext>) {
        *self.universe.lock() = (metas, contexts);
    }

    /// Funding history of `rates` for `coin`, one entry per 8h.
    pub fn set_history(&self, coin: &str, rates: &[Decimal]) {
        let entries = rates
            .iter()
            .enumerate()
            .map(|(i, rate)| FundingHistoryEntry {
                instrument: coin.to_string(),
                funding_rate: *rate,
                timestamp_ms: 1_700_000_000_000 + i as i64 * 28_800_000,
            })
            .collect();
        self.histories.lock().insert(coin.to_string(), entries);
    }

    /// Make the universe fetch fail with an upstream error.
    pub fn fail_universe(&self, message: &str) {
        *self.universe_error.lock() = Some(message.to_string());
    }

    pub fn heal_universe(&self) {
        *self.universe_error.lock() = None;
    }

    pub fn set_universe_delay(&self, delay: Duration) {
        *self.universe_delay.lock() = delay;
    }

    pub fn set_funding_delay(&self, delay: Duration) {
        *self.funding_delay.lock() = delay;
    }

    pub fn universe_calls(&self) -> usize {
        self.universe_calls.load(Ordering::SeqCst)
    }

    pub fn funding_calls(&self) -> usize {
        self.funding_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl MarketDataSource for MockSource {
    fn fetch_universe_and_contexts(&self) -> BoxFuture<'_, ClientResult<UniverseAndContexts>> {
        Box::pin(async move {
            self.universe_calls.fetch_add(1, Ordering::SeqCst);

            let delay = *self.universe_delay.lock();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            if let Some(message) = self.universe_error.lock().clone() {
                return Err(ClientError::Upstream(message));
            }
            Ok(self.universe.lock().clone())
        })
    }

    fn fetch_funding_history<'a>(
        &'a self,
        coin: &'a str,
        _start_ms: i64,
        _end_ms: Option<i64>,
    ) -> BoxFuture<'a, Vec<FundingHistoryEntry>> {
        Box::pin(async move {
            self.funding_calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let delay = *self.funding_delay.lock();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.histories.lock().get(coin).cloned().unwrap_or_default()
        })
    }
}
