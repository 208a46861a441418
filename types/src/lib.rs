//! Fundamental types for the Vigil protocol.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: submodule and watcher identities, pre-verification keys,
//! timestamps, and the fraud window.

pub mod error;
pub mod id;
pub mod key;
pub mod time;
pub mod window;

pub use error::VigilError;
pub use id::{SubmoduleId, WatcherId};
pub use key::VerificationKey;
pub use time::Timestamp;
pub use window::FraudWindow;
