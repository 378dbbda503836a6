//! HTTP client for the exchange info endpoint.
//!
//! Every request is a `POST` of a JSON body discriminated by `type`.
//! No retries happen at this layer.

use crate::error::{ClientError, ClientResult};
use crate::source::{BoxFuture, MarketDataSource, UniverseAndContexts};
use fundscan_core::{FundingHistoryEntry, InstrumentContext, InstrumentMeta};
use fundscan_telemetry::Metrics;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest body excerpt carried in an error message.
const BODY_EXCERPT_LEN: usize = 256;

/// Request type for info endpoint.
#[derive(Debug, Serialize)]
struct InfoRequest {
    #[serde(rename = "type")]
    request_type: String,
}

/// Request type for funding history.
#[derive(Debug, Serialize)]
struct FundingHistoryRequest<'a> {
    #[serde(rename = "type")]
    request_type: &'static str,
    coin: &'a str,
    #[serde(rename = "startTime")]
    start_time: i64,
    /// Omitted means "through now".
    #[serde(rename = "endTime", skip_serializing_if = "Option::is_none")]
    end_time: Option<i64>,
}

/// `universe` section of the metaAndAssetCtxs response.
#[derive(Debug, Deserialize)]
struct UniverseSection {
    universe: Vec<InstrumentMeta>,
}

/// Raw metaAndAssetCtxs response: `[ {universe: [...]}, [ctx, ...] ]`.
#[derive(Debug, Deserialize)]
struct MetaAndAssetCtxsResponse(UniverseSection, Vec<InstrumentContext>);

/// Client for the exchange info endpoint.
pub struct InfoClient {
    /// HTTP client, reused across requests.
    client: Client,
    /// Info endpoint URL.
    info_url: String,
}

impl InfoClient {
    /// Create a new info client.
    ///
    /// # Arguments
    /// * `info_url` - URL of the info endpoint (e.g., "https://api.hyperliquid.xyz/info")
    /// * `timeout` - Per-request timeout applied to every call
    pub fn new(info_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            info_url: info_url.into(),
        })
    }

    /// Create a client with [`DEFAULT_TIMEOUT`].
    pub fn with_default_timeout(info_url: impl Into<String>) -> ClientResult<Self> {
        Self::new(info_url, DEFAULT_TIMEOUT)
    }

    /// Info endpoint URL.
    pub fn info_url(&self) -> &str {
        &self.info_url
    }

    /// Fetch the perpetual universe and current asset contexts.
    ///
    /// # API Details
    /// Uses `{"type": "metaAndAssetCtxs"}` which returns a two-element array:
    /// the meta object (with `universe`) and the context list, index-aligned.
    pub async fn fetch_meta_and_asset_ctxs(&self) -> ClientResult<UniverseAndContexts> {
        info!(url = %self.info_url, "Fetching metaAndAssetCtxs from exchange");

        let request = InfoRequest {
            request_type: "metaAndAssetCtxs".to_string(),
        };

        let response = self
            .client
            .post(&self.info_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::Upstream(format!("metaAndAssetCtxs request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Upstream(format!(
                "metaAndAssetCtxs failed: HTTP {status}: {}",
                excerpt(&body)
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            ClientError::Upstream(format!("Failed to read metaAndAssetCtxs body: {e}"))
        })?;

        let MetaAndAssetCtxsResponse(meta, contexts) =
            serde_json::from_slice(&body).map_err(|e| {
                ClientError::Upstream(format!("Malformed metaAndAssetCtxs response: {e}"))
            })?;

        info!(
            universe = meta.universe.len(),
            contexts = contexts.len(),
            "Fetched metaAndAssetCtxs"
        );

        Ok((meta.universe, contexts))
    }

    /// Fetch funding history for `coin` between `start_ms` and `end_ms`.
    ///
    /// Failures are logged and mapped to an empty history so one instrument
    /// cannot fail the whole refresh.
    pub async fn fetch_funding(
        &self,
        coin: &str,
        start_ms: i64,
        end_ms: Option<i64>,
    ) -> Vec<FundingHistoryEntry> {
        let request = FundingHistoryRequest {
            request_type: "fundingHistory",
            coin,
            start_time: start_ms,
            end_time: end_ms,
        };

        let response = match self.client.post(&self.info_url).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                let reason = if e.is_timeout() { "timeout" } else { "transport" };
                warn!(coin, error = %e, reason, "Failed to fetch funding history");
                Metrics::funding_fetch(reason);
                return Vec::new();
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(coin, %status, "Failed to fetch funding history");
            Metrics::funding_fetch("http_status");
            return Vec::new();
        }

        match response.json::<Vec<FundingHistoryEntry>>().await {
            Ok(entries) => {
                debug!(coin, entries = entries.len(), "Fetched funding history");
                Metrics::funding_fetch(if entries.is_empty() { "empty" } else { "ok" });
                entries
            }
            Err(e) => {
                let reason = if e.is_timeout() { "timeout" } else { "parse" };
                warn!(coin, error = %e, reason, "Failed to decode funding history");
                Metrics::funding_fetch(reason);
                Vec::new()
            }
        }
    }
}

impl MarketDataSource for InfoClient {
    fn fetch_universe_and_contexts(&self) -> BoxFuture<'_, ClientResult<UniverseAndContexts>> {
        Box::pin(self.fetch_meta_and_asset_ctxs())
    }

    fn fetch_funding_history<'a>(
        &'a self,
        coin: &'a str,
        start_ms: i64,
        end_ms: Option<i64>,
    ) -> BoxFuture<'a, Vec<FundingHistoryEntry>> {
        Box::pin(self.fetch_funding(coin, start_ms, end_ms))
    }
}

/// Truncate a response body for inclusion in an error message.
fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
