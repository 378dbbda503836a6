//! Refresh and cache configuration.

use crate::error::{RefreshError, RefreshResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Refresh scheduling, staleness and fan-out settings.
///
/// `refresh_interval_secs` sets both the scheduler period and each
/// snapshot's `valid_until`. `staleness_secs` is the age after which a
/// read refreshes synchronously. They share a default but are independent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_staleness_secs")]
    pub staleness_secs: u64,
    /// Upper bound on concurrent funding-history requests.
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

fn default_refresh_interval_secs() -> u64 {
    3600
}

fn default_staleness_secs() -> u64 {
    3600
}

fn default_max_concurrent_requests() -> usize {
    8
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            staleness_secs: default_staleness_secs(),
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

impl RefreshConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> RefreshResult<()> {
        if self.refresh_interval_secs == 0 {
            return Err(RefreshError::InvalidConfig(
                "refresh_interval_secs must be positive".to_string(),
            ));
        }

        if self.staleness_secs == 0 {
            return Err(RefreshError::InvalidConfig(
                "staleness_secs must be positive".to_string(),
            ));
        }

        if self.max_concurrent_requests == 0 {
            return Err(RefreshError::InvalidConfig(
                "max_concurrent_requests must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Scheduler period.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Validity window stamped on each snapshot.
    pub fn validity(&self) -> chrono::Duration {
        chrono::Duration::seconds(clamp_secs(self.refresh_interval_secs))
    }

    /// Age after which a cached snapshot is stale.
    pub fn staleness(&self) -> chrono::Duration {
        chrono::Duration::seconds(clamp_secs(self.staleness_secs))
    }
}

fn clamp_secs(secs: u64) -> i64 {
    i64::try_from(secs).unwrap_or(i64::MAX / 1_000)
}
