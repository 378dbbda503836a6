//! Funding-rate scanner service.
//!
//! Wires the components together:
//! - Exchange info client
//! - Ranking engine and refresh pipeline
//! - Single-flight refresh orchestrator, scheduler and snapshot cache
//! - Snapshot persistence
//! - HTTP read API

pub mod app;
pub mod config;
pub mod error;
pub mod report;

pub use app::{build_pipeline, Application};
pub use config::{resolve_config_path, AppConfig, ClientConfig, TelemetryConfig};
pub use error::{AppError, AppResult};
