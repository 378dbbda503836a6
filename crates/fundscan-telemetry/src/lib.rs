//! Prometheus metrics and structured logging for the funding-rate scanner.
//!
//! Provides:
//! - Prometheus metrics for refresh runs, upstream fetches and cache reads
//! - Structured logging with tracing (pretty in development, JSON in production)

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, DEFAULT_LOG_FILTER};
pub use metrics::Metrics;
