//! Fraud flag ledger.
//!
//! Tracks which watchers have marked each submodule as fraudulent. Flags are
//! append-only: a watcher can flag a submodule once, flags are never removed,
//! and the per-submodule count only grows.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

use vigil_types::{SubmoduleId, Timestamp, WatcherId};

use crate::error::LedgerError;

/// All fraud flags raised against one submodule.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FraudRecord {
    flagged_by: HashMap<WatcherId, Timestamp>,
}

impl FraudRecord {
    /// Number of distinct watchers that have flagged this submodule.
    pub fn flag_count(&self) -> u32 {
        self.flagged_by.len() as u32
    }

    pub fn is_flagged_by(&self, watcher: &WatcherId) -> bool {
        self.flagged_by.contains_key(watcher)
    }

    pub fn flagged_at(&self, watcher: &WatcherId) -> Option<Timestamp> {
        self.flagged_by.get(watcher).copied()
    }

    /// Flags sorted by watcher id for deterministic export.
    pub fn flags(&self) -> Vec<FraudFlag> {
        let mut out: Vec<_> = self
            .flagged_by
            .iter()
            .map(|(watcher, flagged_at)| FraudFlag {
                watcher: *watcher,
                flagged_at: *flagged_at,
            })
            .collect();
        out.sort_by_key(|f| f.watcher);
        out
    }
}

/// A single fraud flag, as exported in snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudFlag {
    pub watcher: WatcherId,
    pub flagged_at: Timestamp,
}

/// Fraud flags for one submodule, as exported in snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudEntry {
    pub submodule: SubmoduleId,
    pub flags: Vec<FraudFlag>,
}

/// Thread-safe append-only map from submodule to its fraud record.
///
/// The lock is held across the duplicate check and the insert, so two racing
/// flags from the same watcher serialize: exactly one succeeds.
pub struct FraudLedger {
    records: Mutex<HashMap<SubmoduleId, FraudRecord>>,
}

impl FraudLedger {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Append a fraud flag from `watcher` against `submodule`.
    ///
    /// Returns the flag count after the insert. Fails without writing when
    /// the watcher has already flagged this submodule.
    pub fn mark(
        &self,
        submodule: SubmoduleId,
        watcher: WatcherId,
        now: Timestamp,
    ) -> Result<u32, LedgerError> {
        let mut records = self.records.lock().unwrap();
        let record = records.entry(submodule).or_default();
        if record.flagged_by.contains_key(&watcher) {
            return Err(LedgerError::AlreadyMarked { submodule, watcher });
        }
        record.flagged_by.insert(watcher, now);
        Ok(record.flagged_by.len() as u32)
    }

    /// Number of distinct watchers that have flagged `submodule`.
    pub fn flag_count(&self, submodule: &SubmoduleId) -> u32 {
        self.records
            .lock()
            .unwrap()
            .get(submodule)
            .map_or(0, FraudRecord::flag_count)
    }

    /// Whether `watcher` has flagged `submodule`.
    pub fn has_flagged(&self, submodule: &SubmoduleId, watcher: &WatcherId) -> bool {
        self.records
            .lock()
            .unwrap()
            .get(submodule)
            .is_some_and(|r| r.flagged_by.contains_key(watcher))
    }

    /// The full fraud record for `submodule`, if any flags exist.
    pub fn record(&self, submodule: &SubmoduleId) -> Option<FraudRecord> {
        self.records.lock().unwrap().get(submodule).cloned()
    }

    /// Number of submodules with at least one flag.
    pub fn flagged_submodule_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Export all records, sorted by submodule for deterministic snapshots.
    pub fn entries(&self) -> Vec<FraudEntry> {
        let records = self.records.lock().unwrap();
        let mut out: Vec<_> = records
            .iter()
            .map(|(submodule, record)| FraudEntry {
                submodule: *submodule,
                flags: record.flags(),
            })
            .collect();
        out.sort_by_key(|e| e.submodule);
        out
    }

    /// Replace the ledger contents with the given entries.
    pub fn restore(&self, entries: &[FraudEntry]) {
        let mut records = self.records.lock().unwrap();
        records.clear();
        for entry in entries {
            let record = records.entry(entry.submodule).or_default();
            for flag in &entry.flags {
                record.flagged_by.insert(flag.watcher, flag.flagged_at);
            }
        }
    }
}

impl Default for FraudLedger {
    fn default() -> Self {
        Self::new()
    }
}
