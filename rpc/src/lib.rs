//! HTTP/JSON API for the Vigil node.
//!
//! Provides endpoints for:
//! - Relayers: `pre_verify` and `verify`
//! - Watchers: `mark_fraudulent`
//! - Read-only queries: watcher membership, fraud counts, pre-verification
//!   timestamps
//! - Operations: `/health` and Prometheus `/metrics`

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use server::{RpcServer, RpcState};
