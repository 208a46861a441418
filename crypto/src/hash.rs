//! Blake2b hashing and pre-verification key derivation.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use vigil_types::{SubmoduleId, VerificationKey};

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Derive the ledger key for a (message, submodule) pair.
///
/// The message is length-prefixed (u64 little-endian) before the submodule
/// id is appended, so no two distinct pairs can produce the same preimage.
pub fn verification_key(message: &[u8], submodule: &SubmoduleId) -> VerificationKey {
    let len = (message.len() as u64).to_le_bytes();
    VerificationKey::new(blake2b_256_multi(&[&len, message, submodule.as_bytes()]))
}
