//! Watcher set configuration.

use std::collections::HashSet;

use vigil_types::WatcherId;

use crate::error::EngineError;

/// The set of identities allowed to flag submodules, plus the quorum
/// threshold at which flags void verification.
///
/// Invariant, enforced at construction: `0 < threshold <= members.len()`.
#[derive(Clone, Debug)]
pub struct WatcherSet {
    members: HashSet<WatcherId>,
    threshold: u32,
}

impl WatcherSet {
    pub fn new(members: HashSet<WatcherId>, threshold: u32) -> Result<Self, EngineError> {
        if threshold == 0 || threshold as usize > members.len() {
            return Err(EngineError::InvalidWatcherSet {
                threshold,
                members: members.len() as u32,
            });
        }
        Ok(Self { members, threshold })
    }

    pub fn contains(&self, watcher: &WatcherId) -> bool {
        self.members.contains(watcher)
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> impl Iterator<Item = &WatcherId> {
        self.members.iter()
    }
}
