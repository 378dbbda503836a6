//! Plain-text table of a ranked snapshot.

use fundscan_core::RankedSnapshot;
use rust_decimal::Decimal;
use std::fmt::Write;

/// Render `snapshot` as a fixed-width table.
pub fn format_table(snapshot: &RankedSnapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Top {} coins by annualized funding rate (computed {}, next update {})",
        snapshot.len(),
        snapshot.computed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        snapshot.valid_until.format("%Y-%m-%d %H:%M:%S UTC"),
    );
    let _ = writeln!(
        out,
        "{:>4}  {:<10} {:>10} {:>12} {:>12} {:>16} {:>16}",
        "#", "Coin", "Avg FR %", "Annual %", "Current %", "OI (USD)", "Volume (USD)"
    );

    for (rank, coin) in snapshot.instruments.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4}  {:<10} {:>10} {:>12} {:>12} {:>16} {:>16}",
            rank + 1,
            coin.name,
            coin.avg_funding_rate_pct.round_dp(4),
            coin.annualized_funding_rate_pct.round_dp(2),
            coin.current_funding_rate_annualized_pct.round_dp(2),
            usd(coin.open_interest_usd),
            usd(coin.daily_volume_usd),
        );
    }

    if snapshot.is_empty() {
        let _ = writeln!(out, "(no instruments passed the liquidity filter)");
    }

    out
}

/// Whole dollars with thousands separators.
fn usd(value: Decimal) -> String {
    let whole = value.round_dp(0).abs().to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value.is_sign_negative() && !value.round_dp(0).is_zero() {
        grouped.insert(0, '-');
    }
    grouped
}
