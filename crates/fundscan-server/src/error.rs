//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Client error: {0}")]
    Client(#[from] fundscan_client::ClientError),

    #[error("Ranking error: {0}")]
    Ranking(#[from] fundscan_ranking::RankingError),

    #[error("Refresh error: {0}")]
    Refresh(#[from] fundscan_refresh::RefreshError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] fundscan_persistence::PersistenceError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] fundscan_telemetry::TelemetryError),

    #[error("API error: {0}")]
    Api(#[from] fundscan_api::ApiError),

    #[error("Server task failed: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
