// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for collecting and exporting activity reports.
//!
//! This module provides infrastructure for capturing diagnostic events during
//! application usage, retaining a bounded window of recent activity, and
//! exporting it as JSON reports.
//!
//! # Architecture
//!
//! - [`EventLog`]: Recent events under a [`RetentionPolicy`] (count and age)
//! - [`DiagnosticEvent`]: Timestamped user action, state change, warning or error
//! - [`DiagnosticsHandle`]: Cloneable, non-blocking sender usable from any thread
//! - [`DiagnosticsCollector`]: Owns the buffer and writes reports

mod collector;
mod events;
mod retention;

pub use collector::{DiagnosticsCollector, DiagnosticsHandle};
pub use events::{AppStateEvent, DiagnosticEvent, DiagnosticEventKind, UserAction};
pub use retention::{
    buffer_capacity_bounds, BufferCapacity, EventLog, RetentionPolicy, DEFAULT_RETENTION_WINDOW,
};
