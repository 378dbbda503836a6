//! Core domain types for the funding-rate scanner.
//!
//! This crate provides the data model shared by every stage of the pipeline:
//! - `InstrumentMeta`, `InstrumentContext`: raw exchange snapshot records
//! - `PairedInstrument`: metadata and context aligned once at the boundary
//! - `FundingHistoryEntry`: one historical funding settlement
//! - `RankedInstrument`, `RankedSnapshot`: derived ranking output

pub mod decimal;
pub mod error;
pub mod instrument;
pub mod snapshot;

pub use decimal::{parse_decimal, DAYS_PER_YEAR, PERCENT};
pub use error::{CoreError, Result};
pub use instrument::{
    pair_instruments, FundingHistoryEntry, InstrumentContext, InstrumentMeta, PairedInstrument,
};
pub use snapshot::{RankedInstrument, RankedSnapshot};
