//! Ranking engine.
//!
//! Strategy: rank perpetuals by annualized average funding rate, restricted
//! to instruments liquid enough to matter.
//! 1. Parse each paired context (unparseable instruments are skipped)
//! 2. Keep instruments with `OI * markPx >= min_oi` and `dayNtlVlm >= min_vol`
//! 3. Drop instruments with no funding history
//! 4. Compute equal-weight mean, annualize, sort descending (stable), take top N
//!
//! [`RankingEngine::screen`] covers steps 1-2 so the caller only fetches
//! history for liquid instruments. [`RankingEngine::rank_screened`] covers the
//! rest. Arithmetic is checked; an instrument whose figures leave the decimal
//! range is skipped like an unparseable one.
//!
//! The engine records nothing globally. Skipped instruments are reported in
//! [`SkipCounts`] for the caller to record.

use crate::config::RankingConfig;
use crate::error::{RankingError, RankingResult};
use crate::stats::FundingStats;
use chrono::{DateTime, Duration, Utc};
use fundscan_core::{
    pair_instruments, parse_decimal, FundingHistoryEntry, InstrumentContext, InstrumentMeta,
    PairedInstrument, RankedInstrument, PERCENT,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// An instrument that passed parsing and the liquidity filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidInstrument {
    /// Position in the exchange universe.
    pub index: usize,
    pub name: String,
    pub open_interest_usd: Decimal,
    pub daily_volume_usd: Decimal,
    pub mark_price: Decimal,
    pub current_funding_rate: Decimal,
}

/// Instruments excluded from a ranking, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    /// Unparseable or missing context fields.
    pub parse: usize,
    pub overflow: usize,
    pub below_threshold: usize,
    pub no_history: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.parse + self.overflow + self.below_threshold + self.no_history
    }

    /// `(reason, count)` pairs, labelled as [`RankingError::skip_reason`].
    pub fn by_reason(&self) -> [(&'static str, usize); 4] {
        [
            ("parse", self.parse),
            ("overflow", self.overflow),
            ("below_threshold", self.below_threshold),
            ("no_history", self.no_history),
        ]
    }

    /// Sum of both counts.
    pub fn merge(self, other: SkipCounts) -> SkipCounts {
        SkipCounts {
            parse: self.parse + other.parse,
            overflow: self.overflow + other.overflow,
            below_threshold: self.below_threshold + other.below_threshold,
            no_history: self.no_history + other.no_history,
        }
    }

    fn record(&mut self, error: &RankingError) {
        match error {
            RankingError::Parse { .. } | RankingError::MissingField { .. } => self.parse += 1,
            RankingError::Overflow { .. } => self.overflow += 1,
            RankingError::NoHistory { .. } => self.no_history += 1,
            RankingError::InvalidConfig(_) => {}
        }
    }
}

/// Output of [`RankingEngine::screen`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screening {
    /// Liquid instruments in universe order.
    pub liquid: Vec<LiquidInstrument>,
    pub skipped: SkipCounts,
}

/// Output of [`RankingEngine::rank_screened`] and [`RankingEngine::rank`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ranking {
    /// Highest annualized funding first, at most `top_n`.
    pub instruments: Vec<RankedInstrument>,
    pub skipped: SkipCounts,
}

/// Parsed numeric view of one context.
struct ParsedContext {
    open_interest: Decimal,
    mark_price: Decimal,
    day_volume: Decimal,
    current_funding_rate: Decimal,
}

/// Funding-rate ranking engine.
#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    config: RankingConfig,
}

impl RankingEngine {
    /// Create a new engine with configuration.
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    /// Get configuration.
    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Parse contexts and apply the liquidity filter.
    pub fn screen(&self, instruments: &[PairedInstrument]) -> Screening {
        let mut screening = Screening::default();

        for instrument in instruments {
            let liquid = match self.screen_one(instrument) {
                Ok(Some(liquid)) => liquid,
                Ok(None) => {
                    screening.skipped.below_threshold += 1;
                    continue;
                }
                Err(e) => {
                    warn!(error = %e, "Skipping instrument");
                    screening.skipped.record(&e);
                    continue;
                }
            };
            screening.liquid.push(liquid);
        }

        debug!(
            universe = instruments.len(),
            liquid = screening.liquid.len(),
            skipped = screening.skipped.total(),
            "Liquidity screen complete"
        );

        screening
    }

    /// `Ok(None)` when the instrument is below a liquidity threshold.
    fn screen_one(
        &self,
        instrument: &PairedInstrument,
    ) -> RankingResult<Option<LiquidInstrument>> {
        let coin = instrument.name();
        let parsed = parse_context(coin, &instrument.context)?;

        let open_interest_usd = checked_mul(
            coin,
            "open interest USD",
            parsed.open_interest,
            parsed.mark_price,
        )?;
        let daily_volume_usd = parsed.day_volume;

        if open_interest_usd < self.config.min_open_interest_usd
            || daily_volume_usd < self.config.min_daily_volume_usd
        {
            debug!(
                coin = %coin,
                open_interest_usd = %open_interest_usd.round_dp(0),
                daily_volume_usd = %daily_volume_usd.round_dp(0),
                "Below liquidity threshold"
            );
            return Ok(None);
        }

        Ok(Some(LiquidInstrument {
            index: instrument.index,
            name: coin.to_string(),
            open_interest_usd,
            daily_volume_usd,
            mark_price: parsed.mark_price,
            current_funding_rate: parsed.current_funding_rate,
        }))
    }

    /// Compute funding statistics for screened instruments and rank them.
    ///
    /// `histories` is keyed by coin symbol; a missing key counts as empty.
    pub fn rank_screened(
        &self,
        liquid: &[LiquidInstrument],
        histories: &HashMap<String, Vec<FundingHistoryEntry>>,
    ) -> Ranking {
        let mut skipped = SkipCounts::default();
        let mut ranked: Vec<(usize, RankedInstrument)> = Vec::with_capacity(liquid.len());

        for instrument in liquid {
            let history = histories
                .get(&instrument.name)
                .map(Vec::as_slice)
                .unwrap_or_default();

            match self.rank_one(instrument, history) {
                Ok(entry) => ranked.push((instrument.index, entry)),
                Err(e) => {
                    warn!(error = %e, "Skipping instrument");
                    skipped.record(&e);
                }
            }
        }

        // Highest first; ties keep universe order
        ranked.sort_by(|(a_idx, a), (b_idx, b)| {
            b.annualized_funding_rate
                .cmp(&a.annualized_funding_rate)
                .then(a_idx.cmp(b_idx))
        });
        ranked.truncate(self.config.top_n);

        info!(
            eligible = liquid.len(),
            ranked = ranked.len(),
            top_n = self.config.top_n,
            "Ranking complete"
        );

        Ranking {
            instruments: ranked.into_iter().map(|(_, instrument)| instrument).collect(),
            skipped,
        }
    }

    /// Screen and rank in one pass.
    pub fn rank(
        &self,
        instruments: &[PairedInstrument],
        histories: &HashMap<String, Vec<FundingHistoryEntry>>,
    ) -> Ranking {
        let screening = self.screen(instruments);
        let ranking = self.rank_screened(&screening.liquid, histories);
        Ranking {
            instruments: ranking.instruments,
            skipped: screening.skipped.merge(ranking.skipped),
        }
    }

    fn rank_one(
        &self,
        instrument: &LiquidInstrument,
        history: &[FundingHistoryEntry],
    ) -> RankingResult<RankedInstrument> {
        let coin = instrument.name.as_str();
        let stats = FundingStats::compute(coin, history)?;
        let periods_per_year = self.config.periods_per_year();

        let annualized = checked_mul(
            coin,
            "annualized funding rate",
            stats.avg_rate,
            periods_per_year,
        )?;
        let current_annualized = checked_mul(
            coin,
            "current annualized funding rate",
            instrument.current_funding_rate,
            periods_per_year,
        )?;
        let pct = |quantity: &'static str, value: Decimal| checked_mul(coin, quantity, value, PERCENT);

        let ranked = RankedInstrument {
            name: instrument.name.clone(),
            avg_funding_rate: stats.avg_rate,
            avg_funding_rate_pct: pct("average funding rate %", stats.avg_rate)?,
            annualized_funding_rate: annualized,
            annualized_funding_rate_pct: pct("annualized funding rate %", annualized)?,
            current_funding_rate: instrument.current_funding_rate,
            current_funding_rate_annualized: current_annualized,
            current_funding_rate_annualized_pct: pct(
                "current annualized funding rate %",
                current_annualized,
            )?,
            total_window_funding_pct: pct("window funding %", stats.total_rate)?,
            open_interest_usd: instrument.open_interest_usd,
            daily_volume_usd: instrument.daily_volume_usd,
            mark_price: instrument.mark_price,
            funding_data_points: stats.data_points,
        };

        debug!(
            coin = %coin,
            avg_funding_rate_pct = %ranked.avg_funding_rate_pct.round_dp(4),
            annualized_pct = %ranked.annualized_funding_rate_pct.round_dp(2),
            data_points = stats.data_points,
            "Computed funding statistics"
        );

        Ok(ranked)
    }
}

/// Rank a raw universe/context pair.
///
/// Contexts are aligned with the universe by position; metas without a
/// context are skipped.
pub fn rank(
    universe: Vec<InstrumentMeta>,
    contexts: Vec<InstrumentContext>,
    histories: &HashMap<String, Vec<FundingHistoryEntry>>,
    config: RankingConfig,
) -> Vec<RankedInstrument> {
    let instruments = pair_instruments(universe, contexts);
    RankingEngine::new(config).rank(&instruments, histories).instruments
}

/// Funding history window `(start_ms, end_ms)` ending at `now`.
pub fn funding_window(now: DateTime<Utc>, days_back: u32) -> (i64, i64) {
    let start = now - Duration::days(i64::from(days_back));
    (start.timestamp_millis(), now.timestamp_millis())
}

fn checked_mul(
    coin: &str,
    quantity: &'static str,
    lhs: Decimal,
    rhs: Decimal,
) -> RankingResult<Decimal> {
    lhs.checked_mul(rhs).ok_or_else(|| RankingError::Overflow {
        coin: coin.to_string(),
        quantity,
    })
}

fn parse_context(coin: &str, context: &InstrumentContext) -> RankingResult<ParsedContext> {
    Ok(ParsedContext {
        open_interest: parse_field(coin, "openInterest", context.open_interest.as_deref())?,
        mark_price: parse_field(coin, "markPx", context.mark_price.as_deref())?,
        day_volume: parse_field(coin, "dayNtlVlm", context.day_volume.as_deref())?,
        current_funding_rate: parse_field(
            coin,
            "funding",
            context.current_funding_rate.as_deref(),
        )?,
    })
}

fn parse_field(coin: &str, field: &'static str, raw: Option<&str>) -> RankingResult<Decimal> {
    let raw = raw.ok_or_else(|| RankingError::MissingField {
        coin: coin.to_string(),
        field,
    })?;

    parse_decimal(raw).map_err(|e| RankingError::Parse {
        coin: coin.to_string(),
        field,
        reason: e.to_string(),
    })
}
