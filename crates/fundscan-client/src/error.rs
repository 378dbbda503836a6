//! Client error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-success status, transport failure, or malformed body from the
    /// bulk metadata call. Fatal to a refresh.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
