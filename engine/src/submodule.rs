//! The underlying verifier seam.

use thiserror::Error;

use vigil_types::SubmoduleId;

/// Failure inside an underlying verifier.
///
/// Opaque to the engine: whatever the submodule reports is surfaced to the
/// caller as a failed delegation, never interpreted.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SubmoduleError(String);

impl SubmoduleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// An underlying verifier the engine delegates pre-verification to.
///
/// How a submodule decides validity is its own business. The engine only
/// cares about the verdict and the identity under which verdicts are
/// ledgered.
pub trait Submodule: Send + Sync {
    /// Identity under which this submodule's verifications are ledgered.
    fn id(&self) -> SubmoduleId;

    /// Check a message against this verifier's own rules.
    ///
    /// `Ok(false)` is a clean rejection, `Err` an operational failure. The
    /// engine treats both as a failed delegation.
    fn verify(&self, metadata: &[u8], message: &[u8]) -> Result<bool, SubmoduleError>;
}
