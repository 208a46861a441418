//! Built-in underlying verifier.
//!
//! The engine treats submodules as opaque capabilities; deployments with
//! their own verification backend implement [`Submodule`] themselves and
//! hand it to [`VigilNode::with_submodule`](crate::VigilNode::with_submodule).
//! This module provides the default used when nothing is injected.

use vigil_crypto::blake2b_256;
use vigil_engine::{Submodule, SubmoduleError};
use vigil_types::SubmoduleId;

/// Verifier that accepts a message when the metadata carries its
/// Blake2b-256 digest.
///
/// Relayers compute the digest off-node and submit it as metadata, so the
/// expensive part of verification (obtaining a correct digest from the
/// origin system) happens once, upstream.
pub struct DigestSubmodule {
    id: SubmoduleId,
}

impl DigestSubmodule {
    pub fn new(id: SubmoduleId) -> Self {
        Self { id }
    }
}

impl Submodule for DigestSubmodule {
    fn id(&self) -> SubmoduleId {
        self.id
    }

    fn verify(&self, metadata: &[u8], message: &[u8]) -> Result<bool, SubmoduleError> {
        if metadata.len() != 32 {
            return Err(SubmoduleError::new(format!(
                "metadata must be a 32-byte digest, got {} bytes",
                metadata.len()
            )));
        }
        Ok(metadata == blake2b_256(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submodule() -> DigestSubmodule {
        DigestSubmodule::new(SubmoduleId::new([0x42; 32]))
    }

    #[test]
    fn accepts_matching_digest() {
        let digest = blake2b_256(b"payload");
        assert!(submodule().verify(&digest, b"payload").unwrap());
    }

    #[test]
    fn rejects_wrong_digest() {
        let digest = blake2b_256(b"other");
        assert!(!submodule().verify(&digest, b"payload").unwrap());
    }

    #[test]
    fn malformed_metadata_is_an_error() {
        let err = submodule().verify(b"short", b"payload").unwrap_err();
        assert!(err.to_string().contains("32-byte"));
    }
}
