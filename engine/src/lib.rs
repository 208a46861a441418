//! Optimistic verification engine.
//!
//! Two-phase process:
//! 1. **Pre-verification**: the routed submodule vouches for a message and
//!    the time is recorded, once per (message, submodule) pair.
//! 2. **Verification**: succeeds only after the fraud window has strictly
//!    elapsed and fewer than threshold watchers have flagged the submodule.
//!
//! In between, watchers may flag a submodule as fraudulent; reaching the
//! m-of-n quorum permanently voids verification for everything it vouched
//! for.
//!
//! *How* a submodule validates a message is modular — the engine specifies
//! *that* pre-verification must happen, not *how*.

pub mod engine;
pub mod error;
pub mod events;
pub mod routing;
pub mod submodule;
pub mod watchers;

pub use engine::VerificationEngine;
pub use error::EngineError;
pub use events::EngineEvent;
pub use routing::{MessageRouting, StaticRouting};
pub use submodule::{Submodule, SubmoduleError};
pub use watchers::WatcherSet;
