//! One end-to-end refresh: fetch, screen, fetch histories, rank.

use crate::config::RefreshConfig;
use crate::error::RefreshResult;
use chrono::Utc;
use fundscan_client::MarketDataSource;
use fundscan_core::{pair_instruments, FundingHistoryEntry, RankedSnapshot};
use fundscan_ranking::{funding_window, LiquidInstrument, RankingEngine, SkipCounts};
use fundscan_telemetry::Metrics;
use futures_util::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Fetch-and-rank pipeline.
///
/// Produces a new [`RankedSnapshot`] per run and has no other side effects.
/// Only the universe/context fetch can fail a run.
pub struct RefreshPipeline {
    source: Arc<dyn MarketDataSource>,
    engine: RankingEngine,
    config: RefreshConfig,
}

impl RefreshPipeline {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        engine: RankingEngine,
        config: RefreshConfig,
    ) -> Self {
        Self {
            source,
            engine,
            config,
        }
    }

    pub fn engine(&self) -> &RankingEngine {
        &self.engine
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// Run the pipeline once.
    pub async fn run(&self) -> RefreshResult<RankedSnapshot> {
        let (universe, contexts) = self.source.fetch_universe_and_contexts().await?;

        let instruments = pair_instruments(universe, contexts);
        let screening = self.engine.screen(&instruments);
        Metrics::liquid_instruments(screening.liquid.len());

        info!(
            universe = instruments.len(),
            liquid = screening.liquid.len(),
            "Fetching funding history for liquid instruments"
        );

        let (start_ms, end_ms) = funding_window(Utc::now(), self.engine.config().days_back);
        let histories = self
            .fetch_histories(&screening.liquid, start_ms, end_ms)
            .await;

        let ranking = self.engine.rank_screened(&screening.liquid, &histories);
        record_skips(screening.skipped.merge(ranking.skipped));

        Ok(RankedSnapshot::new(
            ranking.instruments,
            Utc::now(),
            self.config.validity(),
        ))
    }

    /// Fetch histories with at most `max_concurrent_requests` in flight.
    async fn fetch_histories(
        &self,
        liquid: &[LiquidInstrument],
        start_ms: i64,
        end_ms: i64,
    ) -> HashMap<String, Vec<FundingHistoryEntry>> {
        let names: Vec<String> = liquid.iter().map(|i| i.name.clone()).collect();

        let histories: HashMap<String, Vec<FundingHistoryEntry>> = stream::iter(names)
            .map(|name| {
                let source = Arc::clone(&self.source);
                async move {
                    let history = source
                        .fetch_funding_history(&name, start_ms, Some(end_ms))
                        .await;
                    (name, history)
                }
            })
            .buffer_unordered(self.config.max_concurrent_requests.max(1))
            .collect()
            .await;

        debug!(
            requested = liquid.len(),
            with_history = histories.values().filter(|h| !h.is_empty()).count(),
            "Funding history fetch complete"
        );

        histories
    }
}

fn record_skips(skipped: SkipCounts) {
    for (reason, count) in skipped.by_reason() {
        Metrics::instruments_skipped(reason, count);
    }
}
