//! Orchestrator, cache and pipeline against a mock market data source.

mod common;

use chrono::{Duration as ChronoDuration, Utc};
use common::{illiquid_context, liquid_context, metas, MockSource};
use fundscan_core::RankedSnapshot;
use fundscan_persistence::{
    MemoryStore, PersistenceError, PersistenceResult, SnapshotDocument, SnapshotStore,
};
use fundscan_ranking::{RankingConfig, RankingEngine};
use fundscan_refresh::{
    RefreshConfig, RefreshError, RefreshOrchestrator, RefreshPipeline, RefreshScheduler,
    SnapshotCache,
};
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    source: Arc<MockSource>,
    store: Arc<MemoryStore>,
    orchestrator: Arc<RefreshOrchestrator>,
}

fn harness_with(refresh: RefreshConfig, ranking: RankingConfig) -> Harness {
    let source = Arc::new(MockSource::new());
    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(SnapshotCache::new(refresh.staleness()));
    let pipeline = RefreshPipeline::new(source.clone(), RankingEngine::new(ranking), refresh);
    let orchestrator = Arc::new(RefreshOrchestrator::new(pipeline, cache, store.clone()));

    Harness {
        source,
        store,
        orchestrator,
    }
}

fn harness() -> Harness {
    harness_with(RefreshConfig::default(), RankingConfig::default())
}

/// BTC and ETH liquid with history, DOGE illiquid.
fn seed_basic_market(source: &MockSource) {
    source.set_universe(
        metas(&["BTC", "ETH", "DOGE"]),
        vec![
            liquid_context("0.0001"),
            liquid_context("0.0002"),
            illiquid_context(),
        ],
    );
    source.set_history("BTC", &[dec!(0.0001), dec!(0.0001), dec!(0.0001)]);
    source.set_history("ETH", &[dec!(0.0003), dec!(0.0001)]);
    source.set_history("DOGE", &[dec!(0.01)]);
}

#[tokio::test]
async fn test_refresh_publishes_and_persists() {
    let h = harness();
    seed_basic_market(&h.source);

    let snapshot = h.orchestrator.refresh().await.unwrap();

    let names: Vec<_> = snapshot.instruments.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["ETH", "BTC"]);
    assert_eq!(snapshot.instruments[1].annualized_funding_rate, dec!(0.1095));
    assert_eq!(
        snapshot.valid_until - snapshot.computed_at,
        ChronoDuration::hours(1)
    );

    // Published by reference.
    let cached = h.orchestrator.cache().current().unwrap();
    assert!(Arc::ptr_eq(&cached, &snapshot));

    // Persisted as a whole document.
    let document = h.store.load().unwrap().unwrap();
    assert_eq!(document.coins.len(), 2);
    assert_eq!(document.last_updated, snapshot.computed_at);
    assert_eq!(document.next_update, snapshot.valid_until);

    // History fetched for liquid instruments only.
    assert_eq!(h.source.funding_calls(), 2);
}

#[tokio::test]
async fn test_universe_failure_leaves_prior_snapshot() {
    let h = harness();
    seed_basic_market(&h.source);
    let prior = h.orchestrator.refresh().await.unwrap();

    h.source.fail_universe("metaAndAssetCtxs failed: HTTP 500");
    let err = h.orchestrator.refresh().await.unwrap_err();

    assert!(matches!(err, RefreshError::Upstream(ref msg) if msg.contains("HTTP 500")));
    assert!(Arc::ptr_eq(&h.orchestrator.cache().current().unwrap(), &prior));
    assert_eq!(
        h.store.load().unwrap().unwrap().last_updated,
        prior.computed_at
    );
}

#[tokio::test]
async fn test_read_surfaces_failure_instead_of_stale_data() {
    let h = harness();
    seed_basic_market(&h.source);
    h.orchestrator.refresh().await.unwrap();

    h.source.fail_universe("HTTP 500");
    assert!(h.orchestrator.read(true).await.is_err());

    h.source.heal_universe();
    let snapshot = h.orchestrator.read(true).await.unwrap();
    assert_eq!(snapshot.len(), 2);
}

#[tokio::test]
async fn test_partial_history_failure_excludes_only_that_instrument() {
    let h = harness();
    h.source.set_universe(
        metas(&["BTC", "ETH", "SOL"]),
        vec![
            liquid_context("0.0001"),
            liquid_context("0.0001"),
            liquid_context("0.0001"),
        ],
    );
    // ETH returns no history, as a failed fetch would.
    h.source.set_history("BTC", &[dec!(0.0001)]);
    h.source.set_history("SOL", &[dec!(0.0002)]);

    let snapshot = h.orchestrator.refresh().await.unwrap();

    let names: Vec<_> = snapshot.instruments.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["SOL", "BTC"]);
}

#[tokio::test]
async fn test_concurrent_refreshes_share_one_run() {
    let h = harness();
    seed_basic_market(&h.source);
    h.source.set_universe_delay(Duration::from_millis(150));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let orchestrator = Arc::clone(&h.orchestrator);
        handles.push(tokio::spawn(async move { orchestrator.refresh().await }));
    }
    // A forced read arriving mid-flight joins the same run.
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(h.orchestrator.is_refreshing());
    let forced = h.orchestrator.read(true).await.unwrap();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(h.source.universe_calls(), 1);
    for snapshot in &results {
        assert!(Arc::ptr_eq(snapshot, &forced));
    }
    assert!(!h.orchestrator.is_refreshing());
}

#[tokio::test]
async fn test_history_fan_out_is_bounded() {
    let h = harness_with(
        RefreshConfig {
            max_concurrent_requests: 3,
            ..Default::default()
        },
        RankingConfig::default(),
    );

    let names: Vec<String> = (0..20).map(|i| format!("C{i}")).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    h.source.set_universe(
        metas(&name_refs),
        names.iter().map(|_| liquid_context("0.0001")).collect(),
    );
    for name in &names {
        h.source.set_history(name, &[dec!(0.0001)]);
    }
    h.source.set_funding_delay(Duration::from_millis(20));

    let snapshot = h.orchestrator.refresh().await.unwrap();

    assert_eq!(h.source.funding_calls(), 20);
    assert!(h.source.max_in_flight() <= 3);
    assert!(h.source.max_in_flight() >= 2);
    assert_eq!(snapshot.len(), 10);
}

#[tokio::test]
async fn test_read_within_window_hits_upstream_once() {
    let h = harness();
    seed_basic_market(&h.source);

    let first = h.orchestrator.read(false).await.unwrap();
    let second = h.orchestrator.read(false).await.unwrap();

    assert_eq!(h.source.universe_calls(), 1);
    assert!(Arc::ptr_eq(&first, &second));

    h.orchestrator.read(true).await.unwrap();
    assert_eq!(h.source.universe_calls(), 2);
}

#[tokio::test]
async fn test_seed_from_store() {
    let h = harness();
    let computed_at = Utc::now() - ChronoDuration::minutes(5);
    let persisted = RankedSnapshot::new(Vec::new(), computed_at, ChronoDuration::hours(1));
    h.store.replace(&SnapshotDocument::from(&persisted)).unwrap();

    assert!(h.orchestrator.seed_from_store());

    // Fresh enough to serve without touching upstream.
    let served = h.orchestrator.read(false).await.unwrap();
    assert_eq!(served.computed_at, computed_at);
    assert_eq!(h.source.universe_calls(), 0);
}

#[tokio::test]
async fn test_stale_seed_triggers_refresh() {
    let h = harness();
    seed_basic_market(&h.source);
    let computed_at = Utc::now() - ChronoDuration::hours(3);
    let persisted = RankedSnapshot::new(Vec::new(), computed_at, ChronoDuration::hours(1));
    h.store.replace(&SnapshotDocument::from(&persisted)).unwrap();
    h.orchestrator.seed_from_store();

    let served = h.orchestrator.read(false).await.unwrap();
    assert!(served.computed_at > computed_at);
    assert_eq!(served.len(), 2);
    assert_eq!(h.source.universe_calls(), 1);
}

#[tokio::test]
async fn test_refresh_replaces_future_dated_seed() {
    let h = harness();
    seed_basic_market(&h.source);
    let computed_at = Utc::now() + ChronoDuration::minutes(10);
    let persisted = RankedSnapshot::new(Vec::new(), computed_at, ChronoDuration::hours(1));
    h.store.replace(&SnapshotDocument::from(&persisted)).unwrap();
    assert!(h.orchestrator.seed_from_store());

    let forced = h.orchestrator.read(true).await.unwrap();
    assert_eq!(forced.len(), 2);

    // Cache, store and unforced reads all see the refreshed snapshot.
    let cached = h.orchestrator.cache().current().unwrap();
    assert!(Arc::ptr_eq(&cached, &forced));
    assert_eq!(h.store.load().unwrap().unwrap().coins.len(), 2);
    let served = h.orchestrator.read(false).await.unwrap();
    assert_eq!(served.len(), 2);
    assert!(served.computed_at < computed_at);
}

#[tokio::test]
async fn test_seed_does_not_overwrite_refreshed_snapshot() {
    let h = harness();
    seed_basic_market(&h.source);
    h.orchestrator.refresh().await.unwrap();

    let persisted = RankedSnapshot::new(Vec::new(), Utc::now(), ChronoDuration::hours(1));
    h.store.replace(&SnapshotDocument::from(&persisted)).unwrap();

    assert!(!h.orchestrator.seed_from_store());
    assert_eq!(h.orchestrator.cache().current().unwrap().len(), 2);
}

/// Store whose writes always fail.
struct BrokenStore;

impl SnapshotStore for BrokenStore {
    fn replace(&self, _document: &SnapshotDocument) -> PersistenceResult<()> {
        Err(PersistenceError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only filesystem",
        )))
    }

    fn load(&self) -> PersistenceResult<Option<SnapshotDocument>> {
        Ok(None)
    }

    fn describe(&self) -> String {
        "broken".to_string()
    }
}

#[tokio::test]
async fn test_persist_failure_does_not_fail_refresh() {
    let source = Arc::new(MockSource::new());
    seed_basic_market(&source);
    let refresh = RefreshConfig::default();
    let cache = Arc::new(SnapshotCache::new(refresh.staleness()));
    let pipeline = RefreshPipeline::new(source.clone(), RankingEngine::default(), refresh);
    let orchestrator = RefreshOrchestrator::new(pipeline, cache, Arc::new(BrokenStore));

    let snapshot = orchestrator.refresh().await.unwrap();
    assert_eq!(snapshot.len(), 2);
    assert!(orchestrator.cache().current().is_some());
}

#[tokio::test]
async fn test_scheduler_drives_orchestrator() {
    let h = harness();
    seed_basic_market(&h.source);

    let scheduler = RefreshScheduler::start(h.orchestrator.clone(), Duration::from_millis(100));
    tokio::time::sleep(Duration::from_millis(350)).await;
    scheduler.shutdown().await;

    let calls = h.source.universe_calls();
    assert!(calls >= 2, "expected scheduled refreshes, got {calls}");
    assert!(h.orchestrator.cache().current().is_some());
}
