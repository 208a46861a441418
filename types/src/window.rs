//! Fraud window configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::VigilError;
use crate::time::Timestamp;

/// Duration a pre-verified message must wait before final verification.
///
/// The window is half-open at the far end: verification requires
/// `now > pre_verified_at + window`, so a check at the exact boundary
/// second still fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudWindow {
    secs: u64,
}

impl FraudWindow {
    /// Shortest accepted window: one minute.
    pub const MIN_SECS: u64 = 60;
    /// Longest accepted window: thirty days.
    pub const MAX_SECS: u64 = 2_592_000;
    /// Default window: seven days.
    pub const DEFAULT_SECS: u64 = 604_800;

    pub fn new(secs: u64) -> Result<Self, VigilError> {
        if !(Self::MIN_SECS..=Self::MAX_SECS).contains(&secs) {
            return Err(VigilError::WindowOutOfBounds {
                secs,
                min: Self::MIN_SECS,
                max: Self::MAX_SECS,
            });
        }
        Ok(Self { secs })
    }

    pub fn as_secs(&self) -> u64 {
        self.secs
    }

    /// Whether the window opened at `pre_verified_at` has strictly elapsed.
    ///
    /// `now == pre_verified_at + window` is NOT elapsed. The deadline
    /// saturates at `u64::MAX`, so a window ending past the representable
    /// range never elapses.
    pub fn has_elapsed(&self, pre_verified_at: Timestamp, now: Timestamp) -> bool {
        now.as_secs() > pre_verified_at.as_secs().saturating_add(self.secs)
    }
}

impl Default for FraudWindow {
    fn default() -> Self {
        Self {
            secs: Self::DEFAULT_SECS,
        }
    }
}

impl fmt::Display for FraudWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_bounds() {
        assert!(FraudWindow::new(0).is_err());
        assert!(FraudWindow::new(FraudWindow::MIN_SECS - 1).is_err());
        assert!(FraudWindow::new(FraudWindow::MAX_SECS + 1).is_err());
    }

    #[test]
    fn accepts_bounds() {
        assert!(FraudWindow::new(FraudWindow::MIN_SECS).is_ok());
        assert!(FraudWindow::new(FraudWindow::MAX_SECS).is_ok());
    }

    #[test]
    fn default_is_seven_days() {
        assert_eq!(FraudWindow::default().as_secs(), 604_800);
    }

    #[test]
    fn boundary_second_has_not_elapsed() {
        let window = FraudWindow::new(60).unwrap();
        let start = Timestamp::new(1_000);
        assert!(!window.has_elapsed(start, Timestamp::new(1_059)));
        assert!(!window.has_elapsed(start, Timestamp::new(1_060)));
        assert!(window.has_elapsed(start, Timestamp::new(1_061)));
    }

    #[test]
    fn now_before_start_has_not_elapsed() {
        let window = FraudWindow::default();
        let start = Timestamp::new(5_000);
        assert!(!window.has_elapsed(start, Timestamp::new(100)));
    }

    #[test]
    fn deadline_saturates_instead_of_wrapping() {
        let window = FraudWindow::new(FraudWindow::MAX_SECS).unwrap();
        let start = Timestamp::new(u64::MAX - 10);
        assert!(!window.has_elapsed(start, Timestamp::new(u64::MAX)));
    }
}
