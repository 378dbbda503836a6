//! Application configuration.

use crate::error::{AppError, AppResult};
use fundscan_api::ApiConfig;
use fundscan_persistence::PersistenceConfig;
use fundscan_ranking::RankingConfig;
use fundscan_refresh::RefreshConfig;
use fundscan_telemetry::DEFAULT_LOG_FILTER;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "FUNDSCAN_CONFIG";

/// Config file used when neither the CLI nor the environment names one.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Exchange client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Exchange info endpoint.
    #[serde(default = "default_info_url")]
    pub info_url: String,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_info_url() -> String {
    "https://api.hyperliquid.xyz/info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            info_url: default_info_url(),
            client: ClientConfig::default(),
            ranking: RankingConfig::default(),
            refresh: RefreshConfig::default(),
            persistence: PersistenceConfig::default(),
            api: ApiConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or defaults when the file does not exist.
    pub fn load(path: &str) -> AppResult<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Validate configuration values.
    pub fn validate(&self) -> AppResult<()> {
        if self.info_url.trim().is_empty() {
            return Err(AppError::Config("info_url must not be empty".to_string()));
        }

        if self.client.timeout_secs == 0 {
            return Err(AppError::Config(
                "client.timeout_secs must be positive".to_string(),
            ));
        }

        self.ranking.validate()?;
        self.refresh.validate()?;
        self.api.socket_addr()?;

        Ok(())
    }
}

/// Config path: CLI arg > `FUNDSCAN_CONFIG` > `config/default.toml`.
pub fn resolve_config_path(cli: Option<String>) -> String {
    cli.or_else(|| std::env::var(CONFIG_ENV_VAR).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}
