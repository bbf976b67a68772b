// SPDX-License-Identifier: MPL-2.0
//! Capture countdown value object.

/// Countdown bounds in seconds.
pub mod countdown_bounds {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const DEFAULT: u8 = 4;
}

/// A visible once-per-second countdown that reaches zero exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u8,
}

impl Countdown {
    /// Starts a countdown from `seconds`, clamped to the supported range.
    #[must_use]
    pub fn start(seconds: u8) -> Self {
        Self {
            remaining: seconds.clamp(countdown_bounds::MIN, countdown_bounds::MAX),
        }
    }

    #[must_use]
    pub fn remaining(self) -> u8 {
        self.remaining
    }

    #[must_use]
    pub fn is_finished(self) -> bool {
        self.remaining == 0
    }

    /// Advances by one second. Returns `true` only on the tick that reaches
    /// zero; ticks after that are ignored.
    pub fn tick(&mut self) -> bool {
        match self.remaining {
            0 => false,
            1 => {
                self.remaining = 0;
                true
            }
            _ => {
                self.remaining -= 1;
                false
            }
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::start(countdown_bounds::DEFAULT)
    }
}
