//! Append-only ledgers backing the verification engine.
//!
//! Two ledgers, both write-once per key:
//! - the pre-verification ledger maps `(message, submodule)` keys to the
//!   timestamp of their first successful pre-verification;
//! - the fraud ledger maps submodules to the set of watchers that have
//!   flagged them.

pub mod error;
pub mod fraud;
pub mod preverification;
pub mod snapshot;

pub use error::LedgerError;
pub use fraud::{FraudEntry, FraudFlag, FraudLedger, FraudRecord};
pub use preverification::{PreVerificationEntry, PreVerificationLedger, RecordOutcome};
pub use snapshot::LedgerSnapshot;
