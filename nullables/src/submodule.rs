//! Nullable submodule — programmable underlying verifier for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use vigil_engine::{Submodule, SubmoduleError};
use vigil_types::SubmoduleId;

/// Verdict a [`NullSubmodule`] returns for one verification call.
#[derive(Clone, Debug)]
pub enum NullVerdict {
    Accept,
    Reject,
    Fail(String),
}

/// A programmable underlying verifier.
///
/// Consumes its configured verdicts front to back, then keeps returning the
/// last one. Counts calls and records every message it was shown.
pub struct NullSubmodule {
    id: SubmoduleId,
    verdicts: Mutex<Vec<NullVerdict>>,
    calls: AtomicU32,
    seen: Mutex<Vec<Vec<u8>>>,
}

impl NullSubmodule {
    pub fn with_verdicts(id: SubmoduleId, verdicts: Vec<NullVerdict>) -> Self {
        assert!(!verdicts.is_empty(), "at least one verdict required");
        Self {
            id,
            verdicts: Mutex::new(verdicts),
            calls: AtomicU32::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// A submodule that accepts everything.
    pub fn accepting(id: SubmoduleId) -> Self {
        Self::with_verdicts(id, vec![NullVerdict::Accept])
    }

    /// A submodule that rejects everything.
    pub fn rejecting(id: SubmoduleId) -> Self {
        Self::with_verdicts(id, vec![NullVerdict::Reject])
    }

    /// A submodule whose verification calls fail operationally.
    pub fn failing(id: SubmoduleId, reason: impl Into<String>) -> Self {
        Self::with_verdicts(id, vec![NullVerdict::Fail(reason.into())])
    }

    /// How many times `verify` has been called.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every message shown to this submodule, in call order.
    pub fn seen_messages(&self) -> Vec<Vec<u8>> {
        self.seen.lock().unwrap().clone()
    }
}

impl Submodule for NullSubmodule {
    fn id(&self) -> SubmoduleId {
        self.id
    }

    fn verify(&self, _metadata: &[u8], message: &[u8]) -> Result<bool, SubmoduleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(message.to_vec());

        let mut verdicts = self.verdicts.lock().unwrap();
        let verdict = if verdicts.len() > 1 {
            verdicts.remove(0)
        } else {
            verdicts[0].clone()
        };
        match verdict {
            NullVerdict::Accept => Ok(true),
            NullVerdict::Reject => Ok(false),
            NullVerdict::Fail(reason) => Err(SubmoduleError::new(reason)),
        }
    }
}
