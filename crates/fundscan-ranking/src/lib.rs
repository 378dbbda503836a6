//! Liquidity filtering and funding-rate ranking.
//!
//! Pure computation, no I/O. Given the paired universe and per-instrument
//! funding history, produces the top-N instruments by annualized average
//! funding rate among those passing the open-interest and volume thresholds.

pub mod config;
pub mod engine;
pub mod error;
pub mod stats;

pub use config::RankingConfig;
pub use engine::{
    funding_window, rank, LiquidInstrument, Ranking, RankingEngine, Screening, SkipCounts,
};
pub use error::{RankingError, RankingResult};
pub use stats::FundingStats;
