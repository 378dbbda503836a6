//! Refresh error types.

use fundscan_client::ClientError;
use thiserror::Error;

/// Fatal failure of a refresh run.
///
/// `Clone` so one in-flight result can be handed to every waiter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshError {
    /// Universe/context fetch failed; nothing could be ranked.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The refresh task panicked or was cancelled.
    #[error("Refresh aborted: {0}")]
    Aborted(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<ClientError> for RefreshError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Upstream(msg) => RefreshError::Upstream(msg),
            other => RefreshError::Upstream(other.to_string()),
        }
    }
}

pub type RefreshResult<T> = Result<T, RefreshError>;
