#![no_main]

use libfuzzer_sys::fuzz_target;

use vigil_types::{SubmoduleId, WatcherId};

// Hex parsing of identities must never panic, and any string that parses
// must round-trip through Display.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(id) = SubmoduleId::from_hex(s) {
            let reparsed = SubmoduleId::from_hex(&id.to_string()).unwrap();
            assert_eq!(id, reparsed);
        }
        if let Ok(id) = WatcherId::from_hex(s) {
            let reparsed = WatcherId::from_hex(&id.to_string()).unwrap();
            assert_eq!(id, reparsed);
        }
    }

    // Raw bytes as bincode input for the identity types.
    let _ = bincode::deserialize::<SubmoduleId>(data);
    let _ = bincode::deserialize::<vigil_types::VerificationKey>(data);
    let _ = bincode::deserialize::<vigil_types::Timestamp>(data);
});
