//! Main application orchestration.
//!
//! Startup order:
//! 1. Seed the cache from the persisted document
//! 2. Start the HTTP server
//! 3. Eager refresh (failure is logged, reads retry)
//! 4. Start the periodic scheduler
//!
//! Shutdown on Ctrl+C cancels the scheduler and drains the server.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use fundscan_api::{run_server, AppState};
use fundscan_client::InfoClient;
use fundscan_ranking::RankingEngine;
use fundscan_refresh::{RefreshOrchestrator, RefreshPipeline, RefreshScheduler, SnapshotCache};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Build the fetch-and-rank pipeline described by `config`.
pub fn build_pipeline(config: &AppConfig) -> AppResult<RefreshPipeline> {
    let client = InfoClient::new(config.info_url.clone(), config.client.timeout())?;

    Ok(RefreshPipeline::new(
        Arc::new(client),
        RankingEngine::new(config.ranking.clone()),
        config.refresh.clone(),
    ))
}

/// Main application.
pub struct Application {
    config: AppConfig,
}

impl Application {
    /// Create a new application. Fails on invalid configuration.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build the orchestrator with its cache and store.
    pub fn build_orchestrator(&self) -> AppResult<Arc<RefreshOrchestrator>> {
        let pipeline = build_pipeline(&self.config)?;
        let cache = Arc::new(SnapshotCache::new(self.config.refresh.staleness()));
        let store = self.config.persistence.build_store();

        info!(
            info_url = %self.config.info_url,
            store = %store.describe(),
            refresh_interval_secs = self.config.refresh.refresh_interval_secs,
            staleness_secs = self.config.refresh.staleness_secs,
            max_concurrent_requests = self.config.refresh.max_concurrent_requests,
            "Refresh orchestrator configured"
        );

        Ok(Arc::new(RefreshOrchestrator::new(pipeline, cache, store)))
    }

    /// Run until Ctrl+C or until the HTTP server exits.
    pub async fn run(self) -> AppResult<()> {
        let orchestrator = self.build_orchestrator()?;
        orchestrator.seed_from_store();

        let shutdown_token = CancellationToken::new();
        let mut server = tokio::spawn(run_server(
            AppState::new(orchestrator.clone()),
            self.config.api.clone(),
            shutdown_token.clone(),
        ));

        match orchestrator.refresh().await {
            Ok(snapshot) => info!(ranked = snapshot.len(), "Startup refresh complete"),
            Err(e) => warn!(error = %e, "Startup refresh failed, reads will retry"),
        }

        let scheduler = RefreshScheduler::start_with_token(
            orchestrator.clone(),
            self.config.refresh.refresh_interval(),
            shutdown_token.child_token(),
        );

        let early_exit = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                None
            }
            result = &mut server => Some(result),
        };

        shutdown_token.cancel();
        scheduler.shutdown().await;

        let server_result = match early_exit {
            Some(result) => {
                error!("API server exited unexpectedly");
                result
            }
            None => server.await,
        };

        match server_result {
            Ok(Ok(())) => {
                info!("Shutdown complete");
                Ok(())
            }
            Ok(Err(e)) => Err(e.into()),
            Err(e) => Err(AppError::Server(e.to_string())),
        }
    }
}
