//! Integration tests exercising the full node lifecycle:
//! config → node construction → engine operations → event processing →
//! snapshot persistence → restart with restored state.

use std::sync::Arc;

use vigil_crypto::blake2b_256;
use vigil_engine::EngineError;
use vigil_node::{NodeConfig, VigilNode};
use vigil_nullables::{NullClock, NullSubmodule};
use vigil_types::{SubmoduleId, Timestamp, WatcherId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const HOUR_SECS: u64 = 3_600;

fn watcher(byte: u8) -> WatcherId {
    WatcherId::new([byte; 32])
}

fn submodule_id() -> SubmoduleId {
    SubmoduleId::new([0x42; 32])
}

fn test_config(dir: &std::path::Path) -> NodeConfig {
    NodeConfig {
        data_dir: dir.to_path_buf(),
        submodule_id: submodule_id().to_string(),
        watchers: vec![
            watcher(0xA1).to_string(),
            watcher(0xB2).to_string(),
            watcher(0xC3).to_string(),
        ],
        watcher_threshold: 2,
        fraud_window_secs: HOUR_SECS,
        ..NodeConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn digest_submodule_flow_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let node = VigilNode::new(test_config(dir.path())).unwrap();

    let message = b"cross-system message";
    let digest = blake2b_256(message);

    // The default submodule demands the message digest as metadata.
    assert!(node
        .engine
        .pre_verify(&digest, message, Timestamp::new(1_000))
        .unwrap());
    let err = node
        .engine
        .pre_verify(b"wrong metadata length!!", b"another message", Timestamp::new(1_000))
        .unwrap_err();
    assert!(matches!(err, EngineError::UnderlyingVerificationFailed(_)));

    // Window still open.
    assert!(matches!(
        node.engine.verify(b"", message, Timestamp::new(1_000 + HOUR_SECS)),
        Err(EngineError::NotElapsed { .. })
    ));
    // One second past the boundary.
    assert!(node
        .engine
        .verify(b"", message, Timestamp::new(1_001 + HOUR_SECS))
        .unwrap());
}

#[test]
fn events_feed_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let node = VigilNode::with_submodule(
        config,
        Arc::new(NullSubmodule::accepting(submodule_id())),
    )
    .unwrap();

    node.engine.pre_verify(b"", b"m1", Timestamp::new(10)).unwrap();
    node.engine.pre_verify(b"", b"m2", Timestamp::new(20)).unwrap();
    node.engine
        .mark_fraudulent(&watcher(0xA1), &submodule_id(), Timestamp::new(30))
        .unwrap();
    node.engine
        .mark_fraudulent(&watcher(0xB2), &submodule_id(), Timestamp::new(40))
        .unwrap();

    node.process_events();

    assert_eq!(node.metrics.pre_verifications.get(), 2);
    assert_eq!(node.metrics.fraud_flags.get(), 2);
    assert_eq!(node.metrics.fraud_quorums.get(), 1);
    assert_eq!(node.metrics.pre_verification_records.get(), 2);
    assert_eq!(node.metrics.flagged_submodules.get(), 1);

    // Draining is destructive; a second pass adds nothing.
    node.process_events();
    assert_eq!(node.metrics.pre_verifications.get(), 2);
}

#[test]
fn snapshot_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    {
        let node = VigilNode::with_submodule(
            config.clone(),
            Arc::new(NullSubmodule::accepting(submodule_id())),
        )
        .unwrap();
        node.engine.pre_verify(b"", b"msg", Timestamp::new(500)).unwrap();
        node.engine
            .mark_fraudulent(&watcher(0xA1), &submodule_id(), Timestamp::new(600))
            .unwrap();
        node.persist_snapshot().unwrap();
    }

    // Fresh node from the same data directory picks the state back up.
    let node = VigilNode::with_submodule(
        config,
        Arc::new(NullSubmodule::accepting(submodule_id())),
    )
    .unwrap();
    assert_eq!(
        node.engine.pre_verified_at(b"msg", &submodule_id()),
        Some(Timestamp::new(500))
    );
    assert_eq!(node.engine.fraud_count(&submodule_id()), 1);

    // Restored ledgers still enforce their write-once rules.
    assert!(matches!(
        node.engine.pre_verify(b"", b"msg", Timestamp::new(999)),
        Err(EngineError::AlreadyPreVerified(_))
    ));
    assert!(matches!(
        node.engine
            .mark_fraudulent(&watcher(0xA1), &submodule_id(), Timestamp::new(999)),
        Err(EngineError::AlreadyMarked { .. })
    ));
}

#[test]
fn fraud_lockout_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    {
        let node = VigilNode::with_submodule(
            config.clone(),
            Arc::new(NullSubmodule::accepting(submodule_id())),
        )
        .unwrap();
        node.engine.pre_verify(b"", b"msg", Timestamp::new(0)).unwrap();
        node.engine
            .mark_fraudulent(&watcher(0xA1), &submodule_id(), Timestamp::new(1))
            .unwrap();
        node.engine
            .mark_fraudulent(&watcher(0xB2), &submodule_id(), Timestamp::new(2))
            .unwrap();
        node.persist_snapshot().unwrap();
    }

    let node = VigilNode::with_submodule(
        config,
        Arc::new(NullSubmodule::accepting(submodule_id())),
    )
    .unwrap();
    let err = node
        .engine
        .verify(b"", b"msg", Timestamp::new(u64::MAX - 1))
        .unwrap_err();
    assert!(matches!(err, EngineError::FraudThresholdReached { .. }));
}

#[test]
fn dispute_scenario_with_manual_clock() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.fraud_window_secs = 7 * 24 * HOUR_SECS;
    let node = VigilNode::with_submodule(
        config,
        Arc::new(NullSubmodule::accepting(submodule_id())),
    )
    .unwrap();
    let clock = NullClock::new(0);

    node.engine.pre_verify(b"", b"msg", clock.now()).unwrap();

    clock.advance(1);
    node.engine
        .mark_fraudulent(&watcher(0xA1), &submodule_id(), clock.now())
        .unwrap();

    // One second past the seven-day window, one flag below quorum.
    clock.set(7 * 24 * HOUR_SECS + 1);
    assert!(node.engine.verify(b"", b"msg", clock.now()).unwrap());

    clock.advance(1);
    node.engine
        .mark_fraudulent(&watcher(0xB2), &submodule_id(), clock.now())
        .unwrap();

    clock.advance(1);
    assert!(matches!(
        node.engine.verify(b"", b"msg", clock.now()),
        Err(EngineError::FraudThresholdReached { .. })
    ));
}

#[tokio::test]
async fn run_loop_exits_on_shutdown_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.event_interval_ms = 10;

    let node = Arc::new(
        VigilNode::with_submodule(
            config,
            Arc::new(NullSubmodule::accepting(submodule_id())),
        )
        .unwrap(),
    );
    node.engine.pre_verify(b"", b"msg", Timestamp::new(100)).unwrap();

    let handle = tokio::spawn(Arc::clone(&node).run());
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    node.shutdown.shutdown();
    handle.await.unwrap().unwrap();

    assert!(node.snapshot_path().exists());
    assert_eq!(node.metrics.pre_verifications.get(), 1);
}

#[test]
fn config_file_drives_node() {
    let dir = tempfile::tempdir().unwrap();
    let toml = format!(
        r#"
        data_dir = "{}"
        submodule_id = "{}"
        watchers = ["{}", "{}"]
        watcher_threshold = 2
        fraud_window_secs = 3600
        "#,
        dir.path().display(),
        submodule_id(),
        watcher(0x01),
        watcher(0x02),
    );
    let config_path = dir.path().join("vigil.toml");
    std::fs::write(&config_path, toml).unwrap();

    let config = NodeConfig::from_toml_file(&config_path).unwrap();
    let node = VigilNode::new(config).unwrap();
    assert!(node.engine.is_watcher(&watcher(0x01)));
    assert!(!node.engine.is_watcher(&watcher(0x03)));
}
