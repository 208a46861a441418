#![no_main]

use libfuzzer_sys::fuzz_target;

use vigil_ledger::LedgerSnapshot;

// Deserializing arbitrary bytes as a ledger snapshot must never panic, and
// anything that does decode must survive hash verification and re-encoding.
fuzz_target!(|data: &[u8]| {
    if let Ok(snapshot) = LedgerSnapshot::from_bytes(data) {
        let _ = snapshot.verify();
        let _ = snapshot.pre_verification_count();
        let _ = snapshot.fraud_record_count();
        let _ = snapshot.to_bytes();
    }
});
