//! Mock exchange info endpoint for integration tests.
//!
//! Provides a simple HTTP server that can:
//! - Answer `metaAndAssetCtxs` with a configured status and body
//! - Answer `fundingHistory` per coin, optionally after a delay
//! - Record every request body it receives

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Canned answer for one request kind.
#[derive(Clone)]
pub struct Canned {
    pub status: StatusCode,
    pub body: Value,
    pub delay: Option<Duration>,
}

impl Canned {
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            delay: None,
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: json!({"error": "mock failure"}),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Clone, Default)]
struct MockState {
    meta: Arc<Mutex<Option<Canned>>>,
    funding: Arc<Mutex<HashMap<String, Canned>>>,
    requests: Arc<Mutex<Vec<Value>>>,
}

/// A mock info endpoint for testing.
pub struct MockInfoServer {
    addr: SocketAddr,
    state: MockState,
    shutdown_tx: oneshot::Sender<()>,
}

impl MockInfoServer {
    /// Start a new mock server on an available port.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = MockState::default();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = Router::new()
            .route("/info", post(handle_info))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx,
        }
    }

    /// Info endpoint URL.
    pub fn url(&self) -> String {
        format!("http://{}/info", self.addr)
    }

    pub fn set_meta(&self, canned: Canned) {
        *self.state.meta.lock() = Some(canned);
    }

    pub fn set_funding(&self, coin: &str, canned: Canned) {
        self.state.funding.lock().insert(coin.to_string(), canned);
    }

    /// All request bodies received so far.
    pub fn received_requests(&self) -> Vec<Value> {
        self.state.requests.lock().clone()
    }

    /// Shutdown the server.
    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}

async fn handle_info(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    state.requests.lock().push(body.clone());

    let canned = match body.get("type").and_then(Value::as_str) {
        Some("metaAndAssetCtxs") => state.meta.lock().clone(),
        Some("fundingHistory") => {
            let coin = body.get("coin").and_then(Value::as_str).unwrap_or_default();
            Some(
                state
                    .funding
                    .lock()
                    .get(coin)
                    .cloned()
                    .unwrap_or_else(|| Canned::ok(json!([]))),
            )
        }
        _ => None,
    };

    let Some(canned) = canned else {
        return (StatusCode::UNPROCESSABLE_ENTITY, "unknown request").into_response();
    };

    if let Some(delay) = canned.delay {
        tokio::time::sleep(delay).await;
    }

    (canned.status, Json(canned.body)).into_response()
}

/// A realistic two-instrument metaAndAssetCtxs body.
pub fn sample_meta_body() -> Value {
    json!([
        {
            "universe": [
                {"name": "BTC", "szDecimals": 5, "maxLeverage": 40},
                {"name": "ETH", "szDecimals": 4, "maxLeverage": 25}
            ]
        },
        [
            {
                "dayNtlVlm": "1169046.29406",
                "funding": "0.0000125",
                "impactPxs": ["97000.0", "97001.0"],
                "markPx": "97000.5",
                "midPx": "97000.5",
                "openInterest": "688.11",
                "oraclePx": "96990.0",
                "premium": "0.00031774",
                "prevDayPx": "95000.0"
            },
            {
                "dayNtlVlm": "500000.0",
                "funding": "-0.00002",
                "markPx": "3500.25",
                "openInterest": "1200.5"
            }
        ]
    ])
}
