//! Exchange snapshot records.
//!
//! `metaAndAssetCtxs` returns the instrument universe and the per-instrument
//! contexts as two parallel lists. They are aligned exactly once, in
//! [`pair_instruments`], and every later stage works on [`PairedInstrument`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Identity of a tradable perpetual instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentMeta {
    /// Coin symbol (e.g., "BTC").
    pub name: String,
}

impl InstrumentMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Current market state for one instrument.
///
/// All numeric fields are kept as the raw decimal strings the exchange sent.
/// A missing key deserializes to `None` and is rejected by the ranking engine,
/// not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentContext {
    /// Open interest in contracts.
    #[serde(rename = "openInterest", default)]
    pub open_interest: Option<String>,
    /// Mark price in USD.
    #[serde(rename = "markPx", default)]
    pub mark_price: Option<String>,
    /// Rolling 24h notional volume, already USD-denominated.
    #[serde(rename = "dayNtlVlm", default)]
    pub day_volume: Option<String>,
    /// Current per-period funding rate.
    #[serde(rename = "funding", default)]
    pub current_funding_rate: Option<String>,
}

impl InstrumentContext {
    /// Build a context with every field present.
    pub fn new(
        open_interest: impl Into<String>,
        mark_price: impl Into<String>,
        day_volume: impl Into<String>,
        current_funding_rate: impl Into<String>,
    ) -> Self {
        Self {
            open_interest: Some(open_interest.into()),
            mark_price: Some(mark_price.into()),
            day_volume: Some(day_volume.into()),
            current_funding_rate: Some(current_funding_rate.into()),
        }
    }
}

/// Instrument metadata paired with its context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedInstrument {
    /// Position in the exchange universe. Used as the ranking tie-breaker.
    pub index: usize,
    pub meta: InstrumentMeta,
    pub context: InstrumentContext,
}

impl PairedInstrument {
    /// Coin symbol.
    pub fn name(&self) -> &str {
        &self.meta.name
    }
}

/// Align the universe with its contexts by position.
///
/// Index `i` of `contexts` belongs to index `i` of `metas`. When the lists
/// differ in length the unpaired tail is dropped and counted in the log.
pub fn pair_instruments(
    metas: Vec<InstrumentMeta>,
    contexts: Vec<InstrumentContext>,
) -> Vec<PairedInstrument> {
    let meta_count = metas.len();
    let context_count = contexts.len();

    if meta_count != context_count {
        warn!(
            meta_count,
            context_count,
            dropped = meta_count.abs_diff(context_count),
            "Universe and context lists differ in length, dropping unpaired tail"
        );
    }

    metas
        .into_iter()
        .zip(contexts)
        .enumerate()
        .map(|(index, (meta, context))| PairedInstrument {
            index,
            meta,
            context,
        })
        .collect()
}

/// One historical funding settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingHistoryEntry {
    /// Coin symbol.
    #[serde(rename = "coin")]
    pub instrument: String,
    /// Per-period funding rate. The exchange sends a string; numbers are accepted too.
    #[serde(rename = "fundingRate")]
    pub funding_rate: Decimal,
    /// Settlement time (Unix millis).
    #[serde(rename = "time")]
    pub timestamp_ms: i64,
}
