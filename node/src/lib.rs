//! Vigil node — wires the verification engine into a running service.
//!
//! The node owns the engine, its configuration, and the ambient concerns
//! around it:
//! - TOML configuration ([`NodeConfig`])
//! - structured logging ([`init_logging`])
//! - Prometheus metrics ([`NodeMetrics`])
//! - graceful shutdown ([`ShutdownController`])
//! - ledger snapshot persistence under the data directory

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod node;
pub mod shutdown;
pub mod submodule;

pub use config::NodeConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use metrics::NodeMetrics;
pub use node::VigilNode;
pub use shutdown::ShutdownController;
pub use submodule::DigestSubmodule;
