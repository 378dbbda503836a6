//! API server configuration.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl ApiConfig {
    /// Socket address to listen on.
    pub fn socket_addr(&self) -> ApiResult<SocketAddr> {
        let ip: IpAddr = self
            .bind
            .parse()
            .map_err(|e| ApiError::InvalidAddress(format!("{}: {e}", self.bind)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
