//! The verification engine — connects routing, the two ledgers, and the
//! fraud quorum rule into the two-phase verification workflow.

use std::sync::{Arc, Mutex};

use vigil_crypto::verification_key;
use vigil_ledger::{FraudLedger, LedgerSnapshot, PreVerificationLedger, RecordOutcome};
use vigil_types::{SubmoduleId, Timestamp, WatcherId};

use crate::error::EngineError;
use crate::events::EngineEvent;
use crate::routing::MessageRouting;

/// Two-phase optimistic verification.
///
/// `pre_verify` delegates to the routed submodule and records when it first
/// vouched for a message. `verify` succeeds only once the fraud window has
/// strictly elapsed and fewer than threshold watchers have flagged the
/// submodule. All methods take `&self`; one `Arc<VerificationEngine>` serves
/// every caller.
pub struct VerificationEngine {
    routing: Arc<dyn MessageRouting>,
    pre_verifications: PreVerificationLedger,
    fraud: FraudLedger,
    pending_events: Mutex<Vec<EngineEvent>>,
}

impl VerificationEngine {
    pub fn new(routing: Arc<dyn MessageRouting>) -> Self {
        Self {
            routing,
            pre_verifications: PreVerificationLedger::new(),
            fraud: FraudLedger::new(),
            pending_events: Mutex::new(Vec::new()),
        }
    }

    /// Rebuild an engine from a persisted ledger snapshot.
    pub fn restore(routing: Arc<dyn MessageRouting>, snapshot: &LedgerSnapshot) -> Self {
        let engine = Self::new(routing);
        engine.pre_verifications.restore(&snapshot.pre_verifications);
        engine.fraud.restore(&snapshot.fraud_records);
        engine
    }

    /// Phase one: delegate to the routed submodule and record the time.
    ///
    /// The timestamp is written before delegation and is not rolled back if
    /// the submodule rejects or fails: a pair gets exactly one attempt, and
    /// a failed attempt consumes it.
    pub fn pre_verify(
        &self,
        metadata: &[u8],
        message: &[u8],
        now: Timestamp,
    ) -> Result<bool, EngineError> {
        let submodule = self
            .routing
            .submodule_for(message)
            .ok_or(EngineError::NoSubmodule)?;
        let submodule_id = submodule.id();
        let key = verification_key(message, &submodule_id);

        match self.pre_verifications.record_if_absent(key, now) {
            RecordOutcome::Recorded => {}
            RecordOutcome::AlreadyRecorded { recorded_at } => {
                return Err(EngineError::AlreadyPreVerified(recorded_at));
            }
        }

        match submodule.verify(metadata, message) {
            Ok(true) => {}
            Ok(false) => {
                return Err(EngineError::UnderlyingVerificationFailed(
                    "submodule rejected the message".into(),
                ));
            }
            Err(e) => return Err(EngineError::UnderlyingVerificationFailed(e.to_string())),
        }

        self.push_event(EngineEvent::MessagePreVerified {
            submodule: submodule_id,
            key,
            recorded_at: now,
        });
        Ok(true)
    }

    /// Phase two: final, fraud-aware verification.
    ///
    /// Pure with respect to the ledgers — no writes, so the call is
    /// idempotent and freely retriable.
    pub fn verify(
        &self,
        _metadata: &[u8],
        message: &[u8],
        now: Timestamp,
    ) -> Result<bool, EngineError> {
        let submodule = self
            .routing
            .submodule_for(message)
            .ok_or(EngineError::NoSubmodule)?;
        let submodule_id = submodule.id();
        let key = verification_key(message, &submodule_id);

        let recorded_at = self
            .pre_verifications
            .recorded_at(&key)
            .ok_or(EngineError::NotPreVerified)?;

        let window = self.routing.fraud_window_for(message);
        if !window.has_elapsed(recorded_at, now) {
            return Err(EngineError::NotElapsed {
                elapses_at: Timestamp::new(
                    recorded_at.as_secs().saturating_add(window.as_secs()),
                ),
                now,
            });
        }

        let watchers = self.routing.watchers_for(message);
        let count = self.fraud.flag_count(&submodule_id);
        if count >= watchers.threshold() {
            return Err(EngineError::FraudThresholdReached {
                submodule: submodule_id,
                count,
                threshold: watchers.threshold(),
            });
        }

        self.push_event(EngineEvent::MessageVerified {
            submodule: submodule_id,
            key,
            verified_at: now,
        });
        Ok(true)
    }

    /// Record a fraud flag from `watcher` against `submodule`.
    ///
    /// Flags are append-only and keep accumulating past the threshold; only
    /// a duplicate from the same watcher fails.
    pub fn mark_fraudulent(
        &self,
        watcher: &WatcherId,
        submodule: &SubmoduleId,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        let watchers = self.routing.watcher_set();
        if !watchers.contains(watcher) {
            return Err(EngineError::NotAWatcher(*watcher));
        }

        let count = self.fraud.mark(*submodule, *watcher, now)?;

        self.push_event(EngineEvent::SubmoduleFlagged {
            submodule: *submodule,
            watcher: *watcher,
            flag_count: count,
        });
        if count == watchers.threshold() {
            self.push_event(EngineEvent::FraudQuorumReached {
                submodule: *submodule,
                flag_count: count,
                threshold: watchers.threshold(),
            });
        }
        Ok(())
    }

    // ── Read-only queries ───────────────────────────────────────────────

    /// Whether `watcher` belongs to the configured watcher set.
    pub fn is_watcher(&self, watcher: &WatcherId) -> bool {
        self.routing.watcher_set().contains(watcher)
    }

    /// Distinct watchers that have flagged `submodule`.
    pub fn fraud_count(&self, submodule: &SubmoduleId) -> u32 {
        self.fraud.flag_count(submodule)
    }

    /// Whether `watcher` has flagged `submodule`.
    pub fn has_flagged(&self, submodule: &SubmoduleId, watcher: &WatcherId) -> bool {
        self.fraud.has_flagged(submodule, watcher)
    }

    /// When `(message, submodule)` was pre-verified, if it has been.
    pub fn pre_verified_at(&self, message: &[u8], submodule: &SubmoduleId) -> Option<Timestamp> {
        self.pre_verifications
            .recorded_at(&verification_key(message, submodule))
    }

    /// Number of pre-verification records held.
    pub fn pre_verification_count(&self) -> usize {
        self.pre_verifications.len()
    }

    /// Number of submodules with at least one fraud flag.
    pub fn flagged_submodule_count(&self) -> usize {
        self.fraud.flagged_submodule_count()
    }

    // ── Events and persistence ──────────────────────────────────────────

    /// Drain pending events for the node to process.
    pub fn drain_events(&self) -> Vec<EngineEvent> {
        std::mem::take(&mut *self.pending_events.lock().unwrap())
    }

    /// Capture both ledgers for persistence.
    pub fn snapshot(&self, now: Timestamp) -> LedgerSnapshot {
        LedgerSnapshot::create(self.pre_verifications.entries(), self.fraud.entries(), now)
    }

    fn push_event(&self, event: EngineEvent) {
        self.pending_events.lock().unwrap().push(event);
    }
}
