//! fundscan-api - HTTP read API for the ranked funding-rate snapshot.
//!
//! # Routes
//!
//! ```text
//! GET /api/hyperliquid/top-coins?force_refresh=bool  → ranked snapshot
//! GET /api/health                                    → liveness + snapshot presence
//! GET /metrics                                       → Prometheus text format
//! ```
//!
//! A failed refresh is reported as `503` with `success: false` and an
//! `error` message. The previous snapshot is never returned in its place.
//!
//! # Usage
//!
//! ```ignore
//! use fundscan_api::{run_server, ApiConfig, AppState};
//!
//! let state = AppState::new(orchestrator.clone());
//! tokio::spawn(async move {
//!     if let Err(e) = run_server(state, ApiConfig::default(), shutdown_token).await {
//!         tracing::error!(error = %e, "API server failed");
//!     }
//! });
//! ```

mod config;
mod error;
mod server;
mod state;
mod types;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use server::{create_router, run_server};
pub use state::{AppState, SnapshotReader};
pub use types::{HealthResponse, TopCoinsQuery, TopCoinsResponse};
