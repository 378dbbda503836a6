//! Ranked output of one refresh run.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Funding statistics and liquidity figures for one ranked instrument.
///
/// Immutable once computed. Decimal figures serialize as JSON numbers.
///
/// Invariants:
/// - `open_interest_usd = open_interest * mark_price`
/// - `annualized_funding_rate = avg_funding_rate * periods_per_year`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedInstrument {
    /// Coin symbol.
    #[serde(rename = "coin")]
    pub name: String,
    /// Arithmetic mean of the fetched per-period funding rates.
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_funding_rate: Decimal,
    /// `avg_funding_rate` as a per-period percentage.
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_funding_rate_pct: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub annualized_funding_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub annualized_funding_rate_pct: Decimal,
    /// Current per-period funding rate from the context snapshot.
    #[serde(with = "rust_decimal::serde::float")]
    pub current_funding_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_funding_rate_annualized: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_funding_rate_annualized_pct: Decimal,
    /// Sum of every fetched rate as a percentage. Covers the fetched window,
    /// which is seven days only with the default lookback.
    #[serde(rename = "total_7d_funding_pct", with = "rust_decimal::serde::float")]
    pub total_window_funding_pct: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub open_interest_usd: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub daily_volume_usd: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub mark_price: Decimal,
    /// Number of history entries the statistics were computed from.
    pub funding_data_points: usize,
}

/// The ranked result of one refresh, with its validity window.
///
/// Created atomically by one refresh and never mutated afterwards; the next
/// successful refresh supersedes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedSnapshot {
    /// Ranked instruments, descending by annualized funding rate.
    pub instruments: Vec<RankedInstrument>,
    pub computed_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
}

impl RankedSnapshot {
    /// Create a snapshot valid for `validity` after `computed_at`.
    pub fn new(
        instruments: Vec<RankedInstrument>,
        computed_at: DateTime<Utc>,
        validity: Duration,
    ) -> Self {
        Self {
            instruments,
            computed_at,
            valid_until: computed_at + validity,
        }
    }

    /// Age of the snapshot at `now`.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.computed_at
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}
