//! Pre-verification keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key under which a pre-verification record is stored.
///
/// Derived from a message and the submodule that verified it, so the same
/// message passed to two submodules produces two distinct ledger entries.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VerificationKey([u8; 32]);

impl VerificationKey {
    pub const ZERO: VerificationKey = VerificationKey([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerificationKey(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "\u{2026})")
    }
}

impl fmt::Display for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl Default for VerificationKey {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<[u8; 32]> for VerificationKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}
