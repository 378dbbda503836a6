//! Request and response types.

use chrono::{DateTime, Utc};
use fundscan_core::{RankedInstrument, RankedSnapshot};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Query string of the top-coins route.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TopCoinsQuery {
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub force_refresh: bool,
}

/// Case-insensitive `true/false`, `1/0`, `yes/no`, `on/off`, `t/f`, `y/n`.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| {
        de::Error::invalid_value(de::Unexpected::Str(&raw), &"a boolean flag")
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" | "y" => Some(true),
        "false" | "0" | "no" | "off" | "f" | "n" => Some(false),
        _ => None,
    }
}

/// Top-coins response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopCoinsResponse {
    pub success: bool,
    pub coins: Vec<RankedInstrument>,
    pub last_updated: DateTime<Utc>,
    pub next_update: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TopCoinsResponse {
    pub fn from_snapshot(snapshot: &RankedSnapshot) -> Self {
        Self {
            success: true,
            coins: snapshot.instruments.clone(),
            last_updated: snapshot.computed_at,
            next_update: snapshot.valid_until,
            error: None,
        }
    }

    /// Unsuccessful response: no coins, both timestamps `now`.
    pub fn failure(error: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            success: false,
            coins: Vec::new(),
            last_updated: now,
            next_update: now,
            error: Some(error.into()),
        }
    }
}

/// Health response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub has_snapshot: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}
