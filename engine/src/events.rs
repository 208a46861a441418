//! Events emitted by the engine for the node to process.

use vigil_types::{SubmoduleId, Timestamp, VerificationKey, WatcherId};

/// Buffered engine events, drained by the node tick loop.
#[derive(Clone, Debug)]
pub enum EngineEvent {
    /// A message passed pre-verification and its timestamp was recorded.
    MessagePreVerified {
        submodule: SubmoduleId,
        key: VerificationKey,
        recorded_at: Timestamp,
    },
    /// A watcher flagged a submodule as fraudulent.
    SubmoduleFlagged {
        submodule: SubmoduleId,
        watcher: WatcherId,
        flag_count: u32,
    },
    /// Flags against a submodule reached the configured threshold.
    FraudQuorumReached {
        submodule: SubmoduleId,
        flag_count: u32,
        threshold: u32,
    },
    /// A message passed final verification.
    MessageVerified {
        submodule: SubmoduleId,
        key: VerificationKey,
        verified_at: Timestamp,
    },
}
