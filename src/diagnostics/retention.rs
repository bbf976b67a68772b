// SPDX-License-Identifier: MPL-2.0
//! Retention of diagnostic events.
//!
//! The log keeps a bounded, time-limited window of recent activity:
//! - events older than the retention window (measured from the newest
//!   event) are dropped first
//! - when the log is full, the oldest non-error event makes room, so a
//!   burst of face found/lost changes cannot push the errors out of a report

use std::collections::VecDeque;
use std::time::Duration;

use chrono::TimeDelta;

use super::{DiagnosticEvent, DiagnosticEventKind};

/// Buffer capacity bounds (100 to 10000 events).
pub mod buffer_capacity_bounds {
    pub const MIN: usize = 100;
    pub const MAX: usize = 10000;
    pub const DEFAULT: usize = 1000;
}

/// Maximum number of retained events, always within
/// [`buffer_capacity_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacity(usize);

impl BufferCapacity {
    /// Creates a new buffer capacity, clamping to valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(buffer_capacity_bounds::MIN, buffer_capacity_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for BufferCapacity {
    fn default() -> Self {
        Self(buffer_capacity_bounds::DEFAULT)
    }
}

/// Default retention window: the last half hour of a session.
pub const DEFAULT_RETENTION_WINDOW: Duration = Duration::from_secs(30 * 60);

/// How many events are kept, and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    capacity: BufferCapacity,
    window: TimeDelta,
}

impl RetentionPolicy {
    /// A window too large for a timestamp delta keeps everything.
    #[must_use]
    pub fn new(capacity: BufferCapacity, window: Duration) -> Self {
        Self {
            capacity,
            window: TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> BufferCapacity {
        self.capacity
    }

    #[must_use]
    pub fn window(&self) -> TimeDelta {
        self.window
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new(BufferCapacity::default(), DEFAULT_RETENTION_WINDOW)
    }
}

/// Diagnostic events in chronological order (oldest first).
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<DiagnosticEvent>,
    policy: RetentionPolicy,
}

impl EventLog {
    #[must_use]
    pub fn new(policy: RetentionPolicy) -> Self {
        Self {
            events: VecDeque::with_capacity(policy.capacity.value()),
            policy,
        }
    }

    /// Records `event`, then applies the retention policy.
    pub fn push(&mut self, event: DiagnosticEvent) {
        let cutoff = event.at.checked_sub_signed(self.policy.window);
        self.events.push_back(event);

        if let Some(cutoff) = cutoff {
            while self.events.front().is_some_and(|e| e.at < cutoff) {
                self.events.pop_front();
            }
        }

        while self.events.len() > self.policy.capacity.value() {
            let victim = self
                .events
                .iter()
                .position(|e| !is_error(e))
                .unwrap_or(0);
            self.events.remove(victim);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.events.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }
}

fn is_error(event: &DiagnosticEvent) -> bool {
    matches!(event.kind, DiagnosticEventKind::Error { .. })
}
