//! The persisted snapshot document.

use crate::error::{PersistenceError, PersistenceResult};
use chrono::{DateTime, Utc};
use fundscan_core::{RankedInstrument, RankedSnapshot};
use serde::{Deserialize, Serialize};

/// Persisted form of a [`RankedSnapshot`].
///
/// `last_updated` is the snapshot's `computed_at`, `next_update` its
/// `valid_until`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub coins: Vec<RankedInstrument>,
    pub last_updated: DateTime<Utc>,
    pub next_update: DateTime<Utc>,
}

impl SnapshotDocument {
    /// Rebuild the in-memory snapshot.
    ///
    /// Rejects a document whose `next_update` precedes `last_updated`.
    pub fn into_snapshot(self) -> PersistenceResult<RankedSnapshot> {
        if self.next_update < self.last_updated {
            return Err(PersistenceError::InvalidDocument(format!(
                "next_update ({}) precedes last_updated ({})",
                self.next_update, self.last_updated
            )));
        }

        Ok(RankedSnapshot {
            instruments: self.coins,
            computed_at: self.last_updated,
            valid_until: self.next_update,
        })
    }
}

impl From<&RankedSnapshot> for SnapshotDocument {
    fn from(snapshot: &RankedSnapshot) -> Self {
        Self {
            coins: snapshot.instruments.clone(),
            last_updated: snapshot.computed_at,
            next_update: snapshot.valid_until,
        }
    }
}
