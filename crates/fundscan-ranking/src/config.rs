//! Ranking configuration.

use crate::error::{RankingError, RankingResult};
use fundscan_core::DAYS_PER_YEAR;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration for liquidity filtering and ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Minimum open interest in USD (`openInterest * markPx`). Inclusive.
    #[serde(default = "default_min_open_interest_usd")]
    pub min_open_interest_usd: Decimal,
    /// Minimum 24h notional volume in USD. Inclusive.
    #[serde(default = "default_min_daily_volume_usd")]
    pub min_daily_volume_usd: Decimal,
    /// Funding history lookback in days.
    #[serde(default = "default_days_back")]
    pub days_back: u32,
    /// Maximum number of ranked instruments returned.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Funding settlements per day. Default 3 (one every 8 hours).
    #[serde(default = "default_funding_periods_per_day")]
    pub funding_periods_per_day: u32,
}

fn default_min_open_interest_usd() -> Decimal {
    Decimal::from(10_000_000) // $10M
}

fn default_min_daily_volume_usd() -> Decimal {
    Decimal::from(10_000_000) // $10M
}

fn default_days_back() -> u32 {
    7
}

fn default_top_n() -> usize {
    10
}

fn default_funding_periods_per_day() -> u32 {
    3
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            min_open_interest_usd: default_min_open_interest_usd(),
            min_daily_volume_usd: default_min_daily_volume_usd(),
            days_back: default_days_back(),
            top_n: default_top_n(),
            funding_periods_per_day: default_funding_periods_per_day(),
        }
    }
}

impl RankingConfig {
    /// Validate configuration values.
    ///
    /// Returns Err if:
    /// - either threshold is negative
    /// - top_n, days_back or funding_periods_per_day is zero
    pub fn validate(&self) -> RankingResult<()> {
        if self.min_open_interest_usd.is_sign_negative() {
            return Err(RankingError::InvalidConfig(format!(
                "min_open_interest_usd ({}) must be non-negative",
                self.min_open_interest_usd
            )));
        }

        if self.min_daily_volume_usd.is_sign_negative() {
            return Err(RankingError::InvalidConfig(format!(
                "min_daily_volume_usd ({}) must be non-negative",
                self.min_daily_volume_usd
            )));
        }

        if self.top_n == 0 {
            return Err(RankingError::InvalidConfig(
                "top_n must be positive".to_string(),
            ));
        }

        if self.days_back == 0 {
            return Err(RankingError::InvalidConfig(
                "days_back must be positive".to_string(),
            ));
        }

        if self.funding_periods_per_day == 0 {
            return Err(RankingError::InvalidConfig(
                "funding_periods_per_day must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Funding settlements per year (`funding_periods_per_day * 365`).
    pub fn periods_per_year(&self) -> Decimal {
        Decimal::from(self.funding_periods_per_day) * Decimal::from(DAYS_PER_YEAR)
    }
}
