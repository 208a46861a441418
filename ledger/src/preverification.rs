//! Pre-verification ledger.
//!
//! Maps derived verification keys to the timestamp of their first successful
//! pre-verification. Entries are written once and never updated: a second
//! attempt for the same key reports [`RecordOutcome::AlreadyRecorded`] and
//! leaves the original timestamp in place.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

use vigil_types::{Timestamp, VerificationKey};

/// Result of attempting to record a pre-verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    /// First pre-verification for this key; the timestamp was stored.
    Recorded,
    /// The key was already present; nothing was written.
    AlreadyRecorded { recorded_at: Timestamp },
}

/// A single pre-verification entry, as exported in snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreVerificationEntry {
    pub key: VerificationKey,
    pub recorded_at: Timestamp,
}

/// Thread-safe write-once map from verification key to recording time.
///
/// The lock is held across the whole check-and-insert so two writers racing
/// on the same key serialize: exactly one observes `Recorded`.
pub struct PreVerificationLedger {
    entries: Mutex<HashMap<VerificationKey, Timestamp>>,
}

impl PreVerificationLedger {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Record `key` at `now` unless it is already present.
    pub fn record_if_absent(&self, key: VerificationKey, now: Timestamp) -> RecordOutcome {
        use std::collections::hash_map::Entry;

        let mut entries = self.entries.lock().unwrap();
        match entries.entry(key) {
            Entry::Occupied(occupied) => RecordOutcome::AlreadyRecorded {
                recorded_at: *occupied.get(),
            },
            Entry::Vacant(vacant) => {
                vacant.insert(now);
                RecordOutcome::Recorded
            }
        }
    }

    /// Timestamp at which `key` was first recorded, if it has been.
    pub fn recorded_at(&self, key: &VerificationKey) -> Option<Timestamp> {
        self.entries.lock().unwrap().get(key).copied()
    }

    pub fn contains(&self, key: &VerificationKey) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Export all entries, sorted by key for deterministic snapshots.
    pub fn entries(&self) -> Vec<PreVerificationEntry> {
        let entries = self.entries.lock().unwrap();
        let mut out: Vec<_> = entries
            .iter()
            .map(|(key, recorded_at)| PreVerificationEntry {
                key: *key,
                recorded_at: *recorded_at,
            })
            .collect();
        out.sort_by_key(|e| e.key);
        out
    }

    /// Replace the ledger contents with the given entries.
    pub fn restore(&self, entries: &[PreVerificationEntry]) {
        let mut map = self.entries.lock().unwrap();
        map.clear();
        for entry in entries {
            map.insert(entry.key, entry.recorded_at);
        }
    }
}

impl Default for PreVerificationLedger {
    fn default() -> Self {
        Self::new()
    }
}
