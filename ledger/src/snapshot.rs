//! Ledger snapshots — capture both ledgers at a point in time.
//!
//! Snapshots let a node restart without losing pre-verification timestamps
//! or fraud flags. The snapshot hash is computed deterministically from the
//! entries so a restored snapshot can be checked for corruption.

use serde::{Deserialize, Serialize};

use vigil_types::Timestamp;

use crate::error::LedgerError;
use crate::fraud::FraudEntry;
use crate::preverification::PreVerificationEntry;

/// A snapshot of the pre-verification and fraud ledgers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Hash of this snapshot (Blake2b of the entries).
    pub hash: [u8; 32],
    /// Timestamp when the snapshot was created.
    pub created_at: Timestamp,
    /// Pre-verification entries, sorted by key.
    pub pre_verifications: Vec<PreVerificationEntry>,
    /// Fraud records, sorted by submodule.
    pub fraud_records: Vec<FraudEntry>,
    /// Snapshot version for compatibility.
    pub version: u32,
}

impl LedgerSnapshot {
    /// Create a snapshot from exported ledger entries.
    pub fn create(
        pre_verifications: Vec<PreVerificationEntry>,
        fraud_records: Vec<FraudEntry>,
        created_at: Timestamp,
    ) -> Self {
        let mut snap = Self {
            hash: [0u8; 32],
            created_at,
            pre_verifications,
            fraud_records,
            version: 1,
        };
        snap.hash = snap.compute_hash();
        snap
    }

    /// Compute the Blake2b-256 hash of this snapshot deterministically.
    ///
    /// The hash covers the entries only, not `created_at`, so two snapshots
    /// of identical state taken at different times hash the same.
    fn compute_hash(&self) -> [u8; 32] {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        let mut hasher = Blake2b::<U32>::new();
        for entry in &self.pre_verifications {
            hasher.update(entry.key.as_bytes());
            hasher.update(entry.recorded_at.as_secs().to_le_bytes());
        }
        for record in &self.fraud_records {
            hasher.update(record.submodule.as_bytes());
            hasher.update((record.flags.len() as u64).to_le_bytes());
            for flag in &record.flags {
                hasher.update(flag.watcher.as_bytes());
                hasher.update(flag.flagged_at.as_secs().to_le_bytes());
            }
        }

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Verify the snapshot hash matches the entry data.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Serialize the snapshot to bytes (bincode).
    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("snapshot serialization should not fail")
    }

    /// Deserialize a snapshot from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        bincode::deserialize(bytes).map_err(|e| LedgerError::SnapshotDecode(e.to_string()))
    }

    pub fn pre_verification_count(&self) -> usize {
        self.pre_verifications.len()
    }

    pub fn fraud_record_count(&self) -> usize {
        self.fraud_records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fraud::FraudFlag;
    use vigil_types::{SubmoduleId, VerificationKey, WatcherId};

    fn sample_pre(byte: u8, secs: u64) -> PreVerificationEntry {
        PreVerificationEntry {
            key: VerificationKey::new([byte; 32]),
            recorded_at: Timestamp::new(secs),
        }
    }

    fn sample_fraud(byte: u8) -> FraudEntry {
        FraudEntry {
            submodule: SubmoduleId::new([byte; 32]),
            flags: vec![FraudFlag {
                watcher: WatcherId::new([0xAA; 32]),
                flagged_at: Timestamp::new(500),
            }],
        }
    }

    #[test]
    fn test_create_and_verify() {
        let snap = LedgerSnapshot::create(
            vec![sample_pre(1, 100), sample_pre(2, 200)],
            vec![sample_fraud(3)],
            Timestamp::new(1_000),
        );
        assert!(snap.verify());
        assert_eq!(snap.version, 1);
        assert_eq!(snap.pre_verification_count(), 2);
        assert_eq!(snap.fraud_record_count(), 1);
    }

    #[test]
    fn test_tampered_snapshot_fails_verify() {
        let mut snap = LedgerSnapshot::create(
            vec![sample_pre(1, 100)],
            vec![],
            Timestamp::new(1_000),
        );
        assert!(snap.verify());

        snap.pre_verifications[0].recorded_at = Timestamp::new(999);
        assert!(!snap.verify());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let snap = LedgerSnapshot::create(
            vec![sample_pre(1, 100)],
            vec![sample_fraud(2)],
            Timestamp::new(1_000),
        );

        let bytes = snap.to_bytes();
        let restored = LedgerSnapshot::from_bytes(&bytes).expect("deserialization failed");

        assert_eq!(snap.hash, restored.hash);
        assert_eq!(snap.pre_verifications, restored.pre_verifications);
        assert_eq!(snap.fraud_records, restored.fraud_records);
        assert!(restored.verify());
    }

    #[test]
    fn test_empty_snapshot() {
        let snap = LedgerSnapshot::create(vec![], vec![], Timestamp::new(0));
        assert!(snap.verify());
        assert_eq!(snap.pre_verification_count(), 0);
    }

    #[test]
    fn test_hash_ignores_created_at() {
        let a = LedgerSnapshot::create(vec![sample_pre(1, 100)], vec![], Timestamp::new(1_000));
        let b = LedgerSnapshot::create(vec![sample_pre(1, 100)], vec![], Timestamp::new(2_000));
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        assert!(LedgerSnapshot::from_bytes(&[0xFF, 0x01, 0x02]).is_err());
    }
}
