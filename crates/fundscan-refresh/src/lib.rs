//! Refresh orchestration and the staleness-aware snapshot cache.
//!
//! Flow: [`RefreshPipeline`] fetches and ranks, [`RefreshOrchestrator`]
//! runs at most one pipeline at a time and publishes into the
//! [`SnapshotCache`], [`RefreshScheduler`] drives periodic refreshes.

pub mod cache;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod scheduler;
pub mod single_flight;

pub use cache::{Refresher, SnapshotCache};
pub use config::RefreshConfig;
pub use error::{RefreshError, RefreshResult};
pub use orchestrator::RefreshOrchestrator;
pub use pipeline::RefreshPipeline;
pub use scheduler::RefreshScheduler;
pub use single_flight::SingleFlight;
