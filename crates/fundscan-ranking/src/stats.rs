//! Funding statistics over a fetched history window.

use crate::error::{RankingError, RankingResult};
use fundscan_core::FundingHistoryEntry;
use rust_decimal::Decimal;

/// Equal-weight statistics over one instrument's funding history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundingStats {
    /// Arithmetic mean of the per-entry rates (not time-weighted).
    pub avg_rate: Decimal,
    /// Sum of every rate in the window.
    pub total_rate: Decimal,
    pub data_points: usize,
}

impl FundingStats {
    /// Compute statistics for `coin`.
    ///
    /// Fails with `NoHistory` for an empty history and `Overflow` when the
    /// sum leaves the decimal range.
    pub fn compute(coin: &str, entries: &[FundingHistoryEntry]) -> RankingResult<Self> {
        if entries.is_empty() {
            return Err(RankingError::NoHistory {
                coin: coin.to_string(),
            });
        }

        let overflow = || RankingError::Overflow {
            coin: coin.to_string(),
            quantity: "funding rate sum",
        };

        let total_rate = entries
            .iter()
            .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.funding_rate))
            .ok_or_else(overflow)?;
        let data_points = entries.len();
        let avg_rate = total_rate
            .checked_div(Decimal::from(data_points))
            .ok_or_else(overflow)?;

        Ok(Self {
            avg_rate,
            total_rate,
            data_points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(rate: Decimal, time: i64) -> FundingHistoryEntry {
        FundingHistoryEntry {
            instrument: "BTC".to_string(),
            funding_rate: rate,
            timestamp_ms: time,
        }
    }

    #[test]
    fn test_empty_history() {
        assert!(matches!(
            FundingStats::compute("BTC", &[]),
            Err(RankingError::NoHistory { .. })
        ));
    }

    #[test]
    fn test_mean_and_sum() {
        let stats = FundingStats::compute(
            "BTC",
            &[
                entry(dec!(0.0001), 0),
                entry(dec!(0.0003), 1),
                entry(dec!(-0.0001), 2),
            ],
        )
        .unwrap();
        assert_eq!(stats.total_rate, dec!(0.0003));
        assert_eq!(stats.avg_rate, dec!(0.0001));
        assert_eq!(stats.data_points, 3);
    }

    #[test]
    fn test_entries_weighted_equally_regardless_of_spacing() {
        // Uneven timestamps do not change the mean.
        let stats = FundingStats::compute(
            "BTC",
            &[
                entry(dec!(0.0002), 0),
                entry(dec!(0.0004), 1),
                entry(dec!(0.0006), 1_000_000_000),
            ],
        )
        .unwrap();
        assert_eq!(stats.avg_rate, dec!(0.0004));
    }

    #[test]
    fn test_sum_overflow_is_an_error() {
        let result = FundingStats::compute("BTC", &[entry(Decimal::MAX, 0), entry(Decimal::MAX, 1)]);
        assert!(matches!(result, Err(RankingError::Overflow { .. })));
    }
}
