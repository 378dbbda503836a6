//! HTTP server implementation using axum.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use fundscan_telemetry::Metrics;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info, warn};

use crate::config::ApiConfig;
use crate::error::ApiResult;
use crate::state::AppState;
use crate::types::{HealthResponse, TopCoinsQuery, TopCoinsResponse};

/// Create the axum router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/hyperliquid/top-coins", get(get_top_coins))
        .route("/api/health", get(get_health))
        .route("/metrics", get(get_metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Ranked snapshot, refreshed first when forced or stale.
///
/// An unreadable query string gets the same response shape with `400`.
async fn get_top_coins(
    State(state): State<AppState>,
    query: Result<Query<TopCoinsQuery>, QueryRejection>,
) -> (StatusCode, Json<TopCoinsResponse>) {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected top coins query");
            return (
                StatusCode::BAD_REQUEST,
                Json(TopCoinsResponse::failure(rejection.body_text(), Utc::now())),
            );
        }
    };

    debug!(force_refresh = query.force_refresh, "Top coins requested");

    match state.reader().read(query.force_refresh).await {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(TopCoinsResponse::from_snapshot(&snapshot)),
        ),
        Err(e) => {
            error!(error = %e, force_refresh = query.force_refresh, "Failed to serve top coins");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(TopCoinsResponse::failure(e.to_string(), Utc::now())),
            )
        }
    }
}

/// Liveness plus snapshot presence. Never triggers a refresh.
async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let current = state.reader().current();
    Json(HealthResponse {
        status: "ok".to_string(),
        has_snapshot: current.is_some(),
        last_updated: current.map(|s| s.computed_at),
    })
}

/// Prometheus text exposition.
async fn get_metrics() -> Response {
    match Metrics::gather_text() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Run the HTTP server until `shutdown_token` is cancelled.
pub async fn run_server(
    state: AppState,
    config: ApiConfig,
    shutdown_token: CancellationToken,
) -> ApiResult<()> {
    let app = create_router(state);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Starting API server");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown_token.cancelled().await })
        .await?;

    info!("API server stopped");
    Ok(())
}
