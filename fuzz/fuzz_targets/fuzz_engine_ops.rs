#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;

use vigil_engine::{
    StaticRouting, Submodule, SubmoduleError, VerificationEngine, WatcherSet,
};
use vigil_types::{FraudWindow, SubmoduleId, Timestamp, WatcherId};

const MEMBERS: u8 = 5;

struct AcceptAll {
    id: SubmoduleId,
}

impl Submodule for AcceptAll {
    fn id(&self) -> SubmoduleId {
        self.id
    }

    fn verify(&self, _metadata: &[u8], _message: &[u8]) -> Result<bool, SubmoduleError> {
        Ok(true)
    }
}

fn watcher(byte: u8) -> WatcherId {
    WatcherId::new([byte; 32])
}

// Drive the engine with an arbitrary operation stream. No input may panic,
// and the fraud count can never exceed the watcher membership.
fuzz_target!(|data: &[u8]| {
    let sub_id = SubmoduleId::new([0x77; 32]);
    let submodule = Arc::new(AcceptAll { id: sub_id });
    let watchers = WatcherSet::new((1..=MEMBERS).map(watcher).collect(), 2)
        .expect("valid fixed watcher set");
    let routing = StaticRouting::new(
        submodule,
        watchers,
        FraudWindow::new(FraudWindow::MIN_SECS).expect("valid fixed window"),
    );
    let engine = VerificationEngine::new(Arc::new(routing));

    // Each op: selector byte, timestamp byte, payload byte.
    for chunk in data.chunks(3) {
        let op = chunk[0];
        let now = Timestamp::new(chunk.get(1).copied().unwrap_or(0) as u64 * 37);
        let payload = [chunk.get(2).copied().unwrap_or(0)];

        match op % 4 {
            0 => {
                let _ = engine.pre_verify(&payload, &payload, now);
            }
            1 => {
                let _ = engine.verify(&[], &payload, now);
            }
            2 => {
                // Bytes past MEMBERS exercise the NotAWatcher path.
                let _ = engine.mark_fraudulent(&watcher(payload[0] % 8), &sub_id, now);
            }
            _ => {
                let _ = engine.pre_verified_at(&payload, &sub_id);
                let _ = engine.fraud_count(&sub_id);
                let _ = engine.drain_events();
            }
        }
    }

    assert!(engine.fraud_count(&sub_id) <= MEMBERS as u32);
    let snapshot = engine.snapshot(Timestamp::new(0));
    assert!(snapshot.verify());
});
