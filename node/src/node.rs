//! The main Vigil node struct — wires configuration, engine, metrics, and
//! snapshot persistence together.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use vigil_engine::{
    EngineEvent, StaticRouting, Submodule, VerificationEngine, WatcherSet,
};
use vigil_ledger::LedgerSnapshot;
use vigil_types::{FraudWindow, SubmoduleId, Timestamp, WatcherId};

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::metrics::NodeMetrics;
use crate::shutdown::ShutdownController;
use crate::submodule::DigestSubmodule;

/// File under the data directory holding the persisted ledger snapshot.
const SNAPSHOT_FILE: &str = "engine.snapshot";

/// A running Vigil node.
///
/// Owns the verification engine and everything around it. Construction
/// resolves the configured routing, restores any persisted ledger snapshot,
/// and leaves the node ready to serve; [`run`](Self::run) drives the event
/// drain loop until shutdown.
pub struct VigilNode {
    pub config: NodeConfig,
    pub engine: Arc<VerificationEngine>,
    pub metrics: Arc<NodeMetrics>,
    pub shutdown: Arc<ShutdownController>,
}

impl std::fmt::Debug for VigilNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VigilNode")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl VigilNode {
    /// Create a node with the built-in digest submodule.
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        let id = SubmoduleId::from_hex(&config.submodule_id)?;
        let submodule = Arc::new(DigestSubmodule::new(id));
        Self::with_submodule(config, submodule)
    }

    /// Create a node delegating pre-verification to a caller-supplied
    /// submodule.
    pub fn with_submodule(
        config: NodeConfig,
        submodule: Arc<dyn Submodule>,
    ) -> Result<Self, NodeError> {
        let watchers = build_watcher_set(&config)?;
        let window = FraudWindow::new(config.fraud_window_secs)?;
        let routing = Arc::new(StaticRouting::new(submodule, watchers.clone(), window));

        let snapshot_path = config.data_dir.join(SNAPSHOT_FILE);
        let engine = match load_snapshot(&snapshot_path)? {
            Some(snapshot) => {
                tracing::info!(
                    path = %snapshot_path.display(),
                    pre_verifications = snapshot.pre_verification_count(),
                    fraud_records = snapshot.fraud_record_count(),
                    "restored ledger snapshot"
                );
                VerificationEngine::restore(routing, &snapshot)
            }
            None => VerificationEngine::new(routing),
        };

        tracing::info!(
            watchers = watchers.len(),
            threshold = watchers.threshold(),
            window_secs = window.as_secs(),
            "vigil node initialized"
        );

        Ok(Self {
            config,
            engine: Arc::new(engine),
            metrics: Arc::new(NodeMetrics::new()),
            shutdown: Arc::new(ShutdownController::new()),
        })
    }

    /// Path of the persisted ledger snapshot.
    pub fn snapshot_path(&self) -> PathBuf {
        self.config.data_dir.join(SNAPSHOT_FILE)
    }

    /// Drain pending engine events into logs and metrics.
    pub fn process_events(&self) {
        for event in self.engine.drain_events() {
            match event {
                EngineEvent::MessagePreVerified {
                    submodule,
                    key,
                    recorded_at,
                } => {
                    self.metrics.pre_verifications.inc();
                    self.metrics
                        .pre_verification_records
                        .set(self.engine.pre_verification_count() as i64);
                    tracing::info!(%submodule, %key, %recorded_at, "message pre-verified");
                }
                EngineEvent::MessageVerified {
                    submodule,
                    key,
                    verified_at,
                } => {
                    self.metrics.verifications.inc();
                    tracing::info!(%submodule, %key, %verified_at, "message verified");
                }
                EngineEvent::SubmoduleFlagged {
                    submodule,
                    watcher,
                    flag_count,
                } => {
                    self.metrics.fraud_flags.inc();
                    tracing::warn!(%submodule, %watcher, flag_count, "submodule flagged as fraudulent");
                }
                EngineEvent::FraudQuorumReached {
                    submodule,
                    flag_count,
                    threshold,
                } => {
                    self.metrics.fraud_quorums.inc();
                    tracing::error!(
                        %submodule,
                        flag_count,
                        threshold,
                        "fraud quorum reached — submodule verifications are void"
                    );
                }
            }
        }
        self.metrics
            .flagged_submodules
            .set(self.engine.flagged_submodule_count() as i64);
    }

    /// Persist the current ledger state under the data directory.
    pub fn persist_snapshot(&self) -> Result<PathBuf, NodeError> {
        std::fs::create_dir_all(&self.config.data_dir)?;
        let snapshot = self.engine.snapshot(Timestamp::now());
        let path = self.snapshot_path();
        std::fs::write(&path, snapshot.to_bytes())?;
        tracing::info!(
            path = %path.display(),
            pre_verifications = snapshot.pre_verification_count(),
            fraud_records = snapshot.fraud_record_count(),
            "persisted ledger snapshot"
        );
        Ok(path)
    }

    /// Drive the event drain loop until shutdown, then persist a final
    /// snapshot.
    pub async fn run(self: Arc<Self>) -> Result<(), NodeError> {
        let mut shutdown_rx = self.shutdown.subscribe();
        let mut interval =
            tokio::time::interval(Duration::from_millis(self.config.event_interval_ms.max(1)));

        loop {
            tokio::select! {
                _ = interval.tick() => self.process_events(),
                _ = shutdown_rx.recv() => break,
            }
        }

        self.process_events();
        self.persist_snapshot()?;
        Ok(())
    }
}

fn build_watcher_set(config: &NodeConfig) -> Result<WatcherSet, NodeError> {
    let mut members = std::collections::HashSet::new();
    for hex in &config.watchers {
        members.insert(WatcherId::from_hex(hex)?);
    }
    Ok(WatcherSet::new(members, config.watcher_threshold)?)
}

fn load_snapshot(path: &std::path::Path) -> Result<Option<LedgerSnapshot>, NodeError> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = std::fs::read(path)?;
    let snapshot = LedgerSnapshot::from_bytes(&bytes)
        .map_err(|e| NodeError::Snapshot(format!("{}: {e}", path.display())))?;
    if !snapshot.verify() {
        return Err(NodeError::Snapshot(format!(
            "{}: hash mismatch, snapshot is corrupt",
            path.display()
        )));
    }
    Ok(Some(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watcher_hex(byte: u8) -> String {
        format!("{:02x}", byte).repeat(32)
    }

    fn test_config(dir: &std::path::Path) -> NodeConfig {
        NodeConfig {
            data_dir: dir.to_path_buf(),
            watchers: vec![watcher_hex(0xA1), watcher_hex(0xB2), watcher_hex(0xC3)],
            watcher_threshold: 2,
            fraud_window_secs: 3_600,
            ..NodeConfig::default()
        }
    }

    #[test]
    fn node_builds_from_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let node = VigilNode::new(test_config(dir.path())).unwrap();
        assert!(node.engine.is_watcher(&WatcherId::new([0xA1; 32])));
        assert!(!node.engine.is_watcher(&WatcherId::new([0xFF; 32])));
    }

    #[test]
    fn bad_watcher_hex_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.watchers.push("not-hex".to_string());
        assert!(matches!(
            VigilNode::new(config).unwrap_err(),
            NodeError::Identity(_)
        ));
    }

    #[test]
    fn threshold_above_membership_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.watcher_threshold = 9;
        assert!(matches!(
            VigilNode::new(config).unwrap_err(),
            NodeError::Engine(vigil_engine::EngineError::InvalidWatcherSet { .. })
        ));
    }

    #[test]
    fn window_out_of_bounds_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.fraud_window_secs = 1;
        assert!(matches!(
            VigilNode::new(config).unwrap_err(),
            NodeError::Identity(vigil_types::VigilError::WindowOutOfBounds { .. })
        ));
    }

    #[test]
    fn corrupt_snapshot_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        std::fs::write(dir.path().join(SNAPSHOT_FILE), b"garbage").unwrap();
        assert!(matches!(
            VigilNode::new(config).unwrap_err(),
            NodeError::Snapshot(_)
        ));
    }
}
