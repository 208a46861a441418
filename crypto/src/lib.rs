//! Cryptographic primitives for the Vigil protocol.
//!
//! - **Blake2b** for hashing (pre-verification key derivation)

pub mod hash;

pub use hash::{blake2b_256, blake2b_256_multi, verification_key};
