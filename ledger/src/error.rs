use thiserror::Error;

use vigil_types::{SubmoduleId, WatcherId};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("watcher {watcher} has already marked submodule {submodule} as fraudulent")]
    AlreadyMarked {
        submodule: SubmoduleId,
        watcher: WatcherId,
    },

    #[error("snapshot decode failed: {0}")]
    SnapshotDecode(String),
}
