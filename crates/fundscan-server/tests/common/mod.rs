//! Mock exchange for end-to-end tests.
//!
//! Serves a fixed three-coin market on `/info` and can be switched into a
//! failing mode where `metaAndAssetCtxs` answers HTTP 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{extract::State, Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Default)]
struct ExchangeState {
    failing: AtomicBool,
    meta_requests: AtomicUsize,
    funding_coins: Mutex<Vec<String>>,
}

pub struct MockExchange {
    addr: SocketAddr,
    state: Arc<ExchangeState>,
    shutdown_tx: oneshot::Sender<()>,
}

impl MockExchange {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(ExchangeState::default());
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

    pub fn url(&self) -> String {
        format!("http://{}/info", self.addr)
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    pub fn meta_requests(&self) -> usize {
        self.state.meta_requests.load(Ordering::SeqCst)
    }

    pub fn funding_coins(&self) -> Vec<String> {
        let mut coins = self.state.funding_coins.lock().clone();
        coins.sort();
        coins
    }

    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}

async fn handle_info(State(state): State<Arc<ExchangeState>>, Json(body): Json<Value>) -> Response {
    match body.get("type").and_then(Value::as_str) {
        Some("metaAndAssetCtxs") => {
            state.meta_requests.fetch_add(1, Ordering::SeqCst);
            if state.failing.load(Ordering::SeqCst) {
                return (StatusCode::INTERNAL_SERVER_ERROR, "upstream down").into_response();
            }
            Json(market()).into_response()
        }
        Some("fundingHistory") => {
            let coin = body
                .get("coin")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            state.funding_coins.lock().push(coin.clone());
            Json(history(&coin)).into_response()
        }
        _ => (StatusCode::UNPROCESSABLE_ENTITY, "unknown request").into_response(),
    }
}

/// BTC and ETH are liquid; DOGE fails the volume threshold.
fn market() -> Value {
    json!([
        {"universe": [{"name": "BTC"}, {"name": "ETH"}, {"name": "DOGE"}]},
        [
            {"openInterest": "100", "markPx": "100000", "dayNtlVlm": "20000000", "funding": "0.0001"},
            {"openInterest": "10000", "markPx": "3500", "dayNtlVlm": "50000000", "funding": "0.0002"},
            {"openInterest": "500000000", "markPx": "0.1", "dayNtlVlm": "5000000", "funding": "0.0005"}
        ]
    ])
}

fn history(coin: &str) -> Value {
    let rate = match coin {
        "BTC" => "0.0001",
        "ETH" => "0.00025",
        _ => "0.001",
    };
    let entries: Vec<Value> = (0..3)
        .map(|i| {
            json!({
                "coin": coin,
                "fundingRate": rate,
                "premium": "0.0",
                "time": 1_700_000_000_000i64 + i * 28_800_000
            })
        })
        .collect();
    Value::Array(entries)
}
