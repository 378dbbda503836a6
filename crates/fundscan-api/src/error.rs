//! API server error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;
