use thiserror::Error;

use vigil_ledger::LedgerError;
use vigil_types::{SubmoduleId, Timestamp, WatcherId};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no submodule configured for this message")]
    NoSubmodule,

    #[error("message already pre-verified at {0}")]
    AlreadyPreVerified(Timestamp),

    #[error("message has not been pre-verified")]
    NotPreVerified,

    #[error("fraud window open until {elapses_at}, now {now}")]
    NotElapsed {
        elapses_at: Timestamp,
        now: Timestamp,
    },

    #[error("submodule {submodule} flagged by {count} watchers, threshold {threshold}")]
    FraudThresholdReached {
        submodule: SubmoduleId,
        count: u32,
        threshold: u32,
    },

    #[error("identity {0} is not a configured watcher")]
    NotAWatcher(WatcherId),

    #[error("watcher {watcher} has already marked submodule {submodule} as fraudulent")]
    AlreadyMarked {
        submodule: SubmoduleId,
        watcher: WatcherId,
    },

    #[error("underlying verification failed: {0}")]
    UnderlyingVerificationFailed(String),

    #[error("invalid watcher set: threshold {threshold} with {members} members")]
    InvalidWatcherSet { threshold: u32, members: u32 },

    #[error("{0}")]
    Other(String),
}

impl From<LedgerError> for EngineError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AlreadyMarked { submodule, watcher } => {
                EngineError::AlreadyMarked { submodule, watcher }
            }
            LedgerError::SnapshotDecode(msg) => EngineError::Other(msg),
        }
    }
}
