//! Opaque identities for submodules and watchers.
//!
//! Both are 32-byte values with no internal structure. The engine never
//! interprets them — a [`SubmoduleId`] is a lookup key into the fraud ledger
//! and an input to pre-verification key derivation, a [`WatcherId`] is a
//! membership test against the configured watcher set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::VigilError;

/// Identity of an underlying verification submodule.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubmoduleId([u8; 32]);

impl SubmoduleId {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse from a 64-character hex string (an optional `0x` prefix is accepted).
    pub fn from_hex(s: &str) -> Result<Self, VigilError> {
        Ok(Self(decode_hex32(s)?))
    }
}

impl fmt::Debug for SubmoduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubmoduleId(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "\u{2026})")
    }
}

impl fmt::Display for SubmoduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl FromStr for SubmoduleId {
    type Err = VigilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Identity of a watcher authorized to flag submodules as fraudulent.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WatcherId([u8; 32]);

impl WatcherId {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse from a 64-character hex string (an optional `0x` prefix is accepted).
    pub fn from_hex(s: &str) -> Result<Self, VigilError> {
        Ok(Self(decode_hex32(s)?))
    }
}

impl fmt::Debug for WatcherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WatcherId(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "\u{2026})")
    }
}

impl fmt::Display for WatcherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl FromStr for WatcherId {
    type Err = VigilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Decode a 64-character hex string into 32 bytes.
///
/// Inline to keep this crate free of the `hex` dependency.
fn decode_hex32(s: &str) -> Result<[u8; 32], VigilError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.len() != 64 {
        return Err(VigilError::InvalidIdentity(format!(
            "expected 64 hex characters, got {}",
            s.len()
        )));
    }
    let mut out = [0u8; 32];
    for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
        let hi = hex_digit(chunk[0])?;
        let lo = hex_digit(chunk[1])?;
        out[i] = (hi << 4) | lo;
    }
    Ok(out)
}

fn hex_digit(c: u8) -> Result<u8, VigilError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(VigilError::InvalidIdentity(format!(
            "invalid hex character {:?}",
            c as char
        ))),
    }
}
