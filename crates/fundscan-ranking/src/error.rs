//! Ranking error types.
//!
//! Per-instrument variants never abort a ranking; they exclude the instrument.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("{coin}: failed to parse {field}: {reason}")]
    Parse {
        coin: String,
        field: &'static str,
        reason: String,
    },

    #[error("{coin}: missing field {field}")]
    MissingField { coin: String, field: &'static str },

    #[error("{coin}: {quantity} overflowed")]
    Overflow { coin: String, quantity: &'static str },

    #[error("{coin}: no funding history")]
    NoHistory { coin: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RankingError {
    /// Label under which a skipped instrument is counted.
    pub fn skip_reason(&self) -> &'static str {
        match self {
            RankingError::Parse { .. } | RankingError::MissingField { .. } => "parse",
            RankingError::Overflow { .. } => "overflow",
            RankingError::NoHistory { .. } => "no_history",
            RankingError::InvalidConfig(_) => "invalid_config",
        }
    }
}

pub type RankingResult<T> = Result<T, RankingError>;
