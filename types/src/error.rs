//! Top-level error type shared across crates.

use thiserror::Error;

/// Common error type for the Vigil protocol.
#[derive(Debug, Error)]
pub enum VigilError {
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("fraud window of {secs}s out of bounds ({min}s..={max}s)")]
    WindowOutOfBounds { secs: u64, min: u64, max: u64 },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("{0}")]
    Other(String),
}
