//! Exchange info endpoint client.
//!
//! Issues the two request kinds the scanner needs against the exchange's
//! `info` endpoint:
//! - `metaAndAssetCtxs`: instrument universe plus current market contexts
//! - `fundingHistory`: per-instrument funding settlements over a window
//!
//! [`MarketDataSource`] is the seam the refresh pipeline depends on, so the
//! pipeline can be driven by a mock in tests.

pub mod client;
pub mod error;
pub mod source;

pub use client::{InfoClient, DEFAULT_TIMEOUT};
pub use error::{ClientError, ClientResult};
pub use source::{BoxFuture, MarketDataSource, UniverseAndContexts};
