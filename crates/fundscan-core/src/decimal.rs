//! Decimal helpers for exchange numeric strings.
//!
//! The exchange encodes every quantity as a decimal string. Values are kept
//! as `rust_decimal::Decimal` end to end so that derived figures such as
//! annualized rates are exact.

use crate::error::{CoreError, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Scale factor from a fraction to a percentage.
pub const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Days used when annualizing per-period rates.
pub const DAYS_PER_YEAR: u32 = 365;

/// Parse an exchange decimal string.
///
/// Accepts plain notation ("0.0001") and scientific notation ("1e-4").
pub fn parse_decimal(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidDecimal {
            value: raw.to_string(),
            reason: "empty".to_string(),
        });
    }

    match Decimal::from_str(trimmed) {
        Ok(value) => Ok(value),
        Err(plain_err) => {
            if trimmed.contains(|c: char| c == 'e' || c == 'E') {
                Decimal::from_scientific(trimmed).map_err(CoreError::from)
            } else {
                Err(CoreError::InvalidDecimal {
                    value: raw.to_string(),
                    reason: plain_err.to_string(),
                })
            }
        }
    }
}
