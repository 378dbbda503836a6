//! Shared fixtures for refresh integration tests.

pub mod mock_source;

pub use mock_source::MockSource;

use fundscan_core::{InstrumentContext, InstrumentMeta};

/// Liquid context: $10M open interest, $20M volume.
pub fn liquid_context(funding: &str) -> InstrumentContext {
    InstrumentContext::new("100", "100000", "20000000", funding)
}

/// Context below the volume threshold.
pub fn illiquid_context() -> InstrumentContext {
    InstrumentContext::new("1000000", "100", "5000000", "0.0005")
}

pub fn metas(names: &[&str]) -> Vec<InstrumentMeta> {
    names.iter().map(|name| InstrumentMeta::new(*name)).collect()
}
