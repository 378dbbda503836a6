//! Prometheus metrics for the funding-rate scanner.
//!
//! Covers:
//! - Refresh runs (outcome, duration, single-flight joins)
//! - Ranking funnel (liquid / ranked counts, skip reasons)
//! - Upstream funding-history fetch outcomes
//! - Cache reads and snapshot age
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. If registration fails,
//! it indicates a fatal configuration error (e.g., duplicate metric names)
//! that should cause an immediate crash at startup rather than silent failure.

use crate::error::{TelemetryError, TelemetryResult};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge, register_histogram, register_int_counter,
    register_int_gauge, CounterVec, Encoder, Gauge, Histogram, IntCounter, IntGauge,
    TextEncoder,
};

/// Refresh runs by outcome.
/// Labels: outcome (success/failure)
pub static REFRESH_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "fundscan_refresh_total",
        "Total refresh runs by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Refresh duration in seconds (fetch + rank).
pub static REFRESH_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "fundscan_refresh_duration_seconds",
        "Duration of a full refresh run in seconds",
        vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0]
    )
    .unwrap()
});

/// Callers that joined an already in-flight refresh.
pub static REFRESH_JOINED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "fundscan_refresh_joined_total",
        "Refresh requests served by an already in-flight refresh"
    )
    .unwrap()
});

/// Instruments that passed the liquidity filter in the last refresh.
pub static LIQUID_INSTRUMENTS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "fundscan_liquid_instruments",
        "Instruments passing the liquidity filter in the last refresh"
    )
    .unwrap()
});

/// Instruments in the last published ranking.
pub static RANKED_INSTRUMENTS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "fundscan_ranked_instruments",
        "Instruments in the last published ranking"
    )
    .unwrap()
});

/// Instruments excluded from a ranking.
/// Labels: reason (parse/overflow/below_threshold/no_history)
pub static INSTRUMENTS_SKIPPED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "fundscan_instruments_skipped_total",
        "Instruments excluded from ranking by reason",
        &["reason"]
    )
    .unwrap()
});

/// Funding-history fetches by outcome.
/// Labels: outcome (ok/empty/http_status/timeout/transport/parse)
pub static FUNDING_FETCH_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "fundscan_funding_fetch_total",
        "Funding history fetches by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Cache reads by result.
/// Labels: result (hit/refresh)
pub static CACHE_READS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "fundscan_cache_reads_total",
        "Snapshot cache reads by result",
        &["result"]
    )
    .unwrap()
});

/// Age of the snapshot served by the most recent read, in seconds.
pub static SNAPSHOT_AGE_SECONDS: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "fundscan_snapshot_age_seconds",
        "Age of the most recently served snapshot in seconds"
    )
    .unwrap()
});

/// Snapshot documents that failed to persist.
pub static PERSIST_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "fundscan_persist_failures_total",
        "Snapshot documents that failed to persist"
    )
    .unwrap()
});

/// Metrics helper for recording.
pub struct Metrics;

impl Metrics {
    /// Record a finished refresh run.
    pub fn refresh_finished(success: bool, duration_secs: f64) {
        let outcome = if success { "success" } else { "failure" };
        REFRESH_TOTAL.with_label_values(&[outcome]).inc();
        REFRESH_DURATION_SECONDS.observe(duration_secs);
    }

    /// Record a caller joining an in-flight refresh.
    pub fn refresh_joined() {
        REFRESH_JOINED_TOTAL.inc();
    }

    /// Update the liquid instrument count.
    pub fn liquid_instruments(count: usize) {
        LIQUID_INSTRUMENTS.set(count as i64);
    }

    /// Update the ranked instrument count.
    pub fn ranked_instruments(count: usize) {
        RANKED_INSTRUMENTS.set(count as i64);
    }

    /// Record instruments excluded from a ranking.
    pub fn instruments_skipped(reason: &str, count: usize) {
        if count > 0 {
            INSTRUMENTS_SKIPPED_TOTAL
                .with_label_values(&[reason])
                .inc_by(count as f64);
        }
    }

    /// Record a funding-history fetch outcome.
    pub fn funding_fetch(outcome: &str) {
        FUNDING_FETCH_TOTAL.with_label_values(&[outcome]).inc();
    }

    /// Record a cache read served from the existing snapshot.
    pub fn cache_hit() {
        CACHE_READS_TOTAL.with_label_values(&["hit"]).inc();
    }

    /// Record a cache read that required a refresh.
    pub fn cache_refresh() {
        CACHE_READS_TOTAL.with_label_values(&["refresh"]).inc();
    }

    /// Update the served snapshot age.
    pub fn snapshot_age(age_secs: f64) {
        SNAPSHOT_AGE_SECONDS.set(age_secs);
    }

    /// Record a failed snapshot persist.
    pub fn persist_failed() {
        PERSIST_FAILURES_TOTAL.inc();
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn gather_text() -> TelemetryResult<String> {
        let encoder = TextEncoder::new();
        let families = prometheus::gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&families, &mut buffer)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}
