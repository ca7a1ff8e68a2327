//! Logical clock with overflow rebasing.
//!
//! The clock advances once per code (or raw escape byte) sent or received.
//! Long before the signed counter could overflow, the counter and every
//! timestamp in the live dictionary are shifted down by the same amount.
//! Encoder and decoder tick at the same moments, so they rebase together.

use crate::dictionary::Dictionary;
use tracing::debug;

/// Counter value above which the clock rebases.
pub const REBASE_THRESHOLD: i64 = i64::MAX / 2;

/// Smallest shift applied by a rebase.
pub const REBASE_FLOOR: i64 = i64::MAX / 10;

/// Logical clock shared by one encoder or decoder run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    now: i64,
    threshold: i64,
    floor: i64,
}

impl Clock {
    /// Create a clock at time 0 with the standard rebase limits.
    pub fn new() -> Self {
        Self::with_limits(REBASE_THRESHOLD, REBASE_FLOOR)
    }

    /// Create a clock with custom rebase limits.
    ///
    /// Both ends of a stream must use the same limits.
    pub fn with_limits(threshold: i64, floor: i64) -> Self {
        Self {
            now: 0,
            threshold,
            floor,
        }
    }

    /// Current time.
    pub fn now(&self) -> i64 {
        self.now
    }

    /// Return to time 0, keeping the rebase limits.
    pub fn reset(&mut self) {
        self.now = 0;
    }

    /// Advance by one tick, rebasing `dict` if the threshold is crossed.
    pub fn tick(&mut self, dict: &mut Dictionary) -> i64 {
        self.now += 1;

        if self.now > self.threshold {
            let shift = dict.config().window.max(self.floor);
            dict.rebase(shift);
            self.now -= shift;
            debug!(shift, now = self.now, "rebased logical clock");
        }

        self.now
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
