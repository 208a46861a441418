//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use vigil_types::FraudWindow;

use crate::NodeError;

/// Configuration for a Vigil node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Data directory for ledger snapshots.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Identity of the configured underlying verification submodule (hex).
    #[serde(default = "default_submodule_id")]
    pub submodule_id: String,

    /// Watcher identities authorized to flag the submodule (hex).
    #[serde(default)]
    pub watchers: Vec<String>,

    /// Number of distinct watcher flags that void the submodule's trust.
    #[serde(default = "default_watcher_threshold")]
    pub watcher_threshold: u32,

    /// Fraud window in seconds. A pre-verified message becomes verifiable
    /// one second after this window closes.
    #[serde(default = "default_fraud_window_secs")]
    pub fraud_window_secs: u64,

    /// Whether to enable the RPC server.
    #[serde(default = "default_true")]
    pub enable_rpc: bool,

    /// Address the RPC server binds to.
    #[serde(default = "default_rpc_listen")]
    pub rpc_listen: String,

    /// RPC port (if enabled).
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Whether to expose the Prometheus metrics endpoint.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Interval between engine event drains, in milliseconds.
    #[serde(default = "default_event_interval_ms")]
    pub event_interval_ms: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./vigil_data")
}

fn default_submodule_id() -> String {
    "00".repeat(32)
}

fn default_watcher_threshold() -> u32 {
    1
}

fn default_fraud_window_secs() -> u64 {
    FraudWindow::DEFAULT_SECS
}

fn default_true() -> bool {
    true
}

fn default_rpc_listen() -> String {
    "127.0.0.1".to_string()
}

fn default_rpc_port() -> u16 {
    7177
}

fn default_event_interval_ms() -> u64 {
    1_000
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("NodeConfig is always serializable to TOML")
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            submodule_id: default_submodule_id(),
            watchers: Vec::new(),
            watcher_threshold: default_watcher_threshold(),
            fraud_window_secs: default_fraud_window_secs(),
            enable_rpc: default_true(),
            rpc_listen: default_rpc_listen(),
            rpc_port: default_rpc_port(),
            enable_metrics: false,
            event_interval_ms: default_event_interval_ms(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
