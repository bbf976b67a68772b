// SPDX-License-Identifier: MPL-2.0
//! Diagnostics collector for aggregating and storing diagnostic events.
//!
//! This module provides the central collector that receives events from
//! various parts of the application and keeps them in an [`EventLog`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};
use serde::Serialize;

use super::{
    AppStateEvent, DiagnosticEvent, DiagnosticEventKind, EventLog, RetentionPolicy, UserAction,
};
use crate::error::{Error, ErrorCategory};

/// Handle for sending diagnostic events to the collector.
///
/// This handle is cheap to clone and can be shared across threads.
/// Events are sent via a bounded channel to avoid blocking the UI thread.
#[derive(Clone, Debug)]
pub struct DiagnosticsHandle {
    event_tx: Sender<DiagnosticEvent>,
}

impl DiagnosticsHandle {
    /// Logs a user action event.
    ///
    /// This method is non-blocking and will drop the event if the
    /// internal channel is full (backpressure protection).
    pub fn log_action(&self, action: UserAction) {
        self.send(DiagnosticEventKind::UserAction { action });
    }

    pub fn log_state(&self, state: AppStateEvent) {
        self.send(DiagnosticEventKind::AppState { state });
    }

    pub fn log_warning(&self, message: impl Into<String>) {
        self.send(DiagnosticEventKind::Warning {
            message: message.into(),
        });
    }

    /// Logs an error under its user-facing category.
    pub fn log_error(&self, error: &Error) {
        self.send(DiagnosticEventKind::Error {
            category: error.category(),
            message: error.to_string(),
        });
    }

    fn send(&self, kind: DiagnosticEventKind) {
        // Non-blocking send - drop if channel is full
        let _ = self.event_tx.try_send(DiagnosticEvent::new(kind));
    }
}

/// Serialized form of an exported report.
#[derive(Debug, Serialize)]
struct DiagnosticReport<'a> {
    app: &'static str,
    version: &'static str,
    os: &'static str,
    collection_started_at: DateTime<Utc>,
    exported_at: DateTime<Utc>,
    event_count: usize,
    error_count: usize,
    events: Vec<&'a DiagnosticEvent>,
}

/// Central collector for diagnostic events.
///
/// The collector receives events through a channel and retains them
/// according to its [`RetentionPolicy`].
pub struct DiagnosticsCollector {
    log: EventLog,
    event_rx: Receiver<DiagnosticEvent>,
    /// Sender stored to create handles.
    event_tx: Sender<DiagnosticEvent>,
    collection_started_at: DateTime<Utc>,
}

/// Default channel capacity for event buffering.
const DEFAULT_CHANNEL_CAPACITY: usize = 100;

impl DiagnosticsCollector {
    #[must_use]
    pub fn new(policy: RetentionPolicy) -> Self {
        let (event_tx, event_rx) = bounded(DEFAULT_CHANNEL_CAPACITY);

        Self {
            log: EventLog::new(policy),
            event_rx,
            event_tx,
            collection_started_at: Utc::now(),
        }
    }

    /// Creates a handle for sending events to this collector.
    #[must_use]
    pub fn handle(&self) -> DiagnosticsHandle {
        DiagnosticsHandle {
            event_tx: self.event_tx.clone(),
        }
    }

    /// Drains the event channel into the log.
    ///
    /// Call this periodically (e.g., on each UI tick).
    pub fn process_pending(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.log.push(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.log.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Returns an iterator over all stored events (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.log.iter()
    }

    /// Number of stored events in `category`.
    #[must_use]
    pub fn count_errors(&self, category: ErrorCategory) -> usize {
        self.log
            .iter()
            .filter(|e| {
                matches!(&e.kind, DiagnosticEventKind::Error { category: c, .. } if *c == category)
            })
            .count()
    }

    /// Exports all collected events as a pretty-printed JSON report.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn export_json(&self) -> serde_json::Result<String> {
        let events: Vec<&DiagnosticEvent> = self.log.iter().collect();
        let report = DiagnosticReport {
            app: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            os: std::env::consts::OS,
            collection_started_at: self.collection_started_at,
            exported_at: Utc::now(),
            event_count: events.len(),
            error_count: events
                .iter()
                .filter(|e| matches!(e.kind, DiagnosticEventKind::Error { .. }))
                .count(),
            events,
        };
        serde_json::to_string_pretty(&report)
    }

    /// Writes the JSON report into `dir` under a timestamped filename.
    ///
    /// The file is written to a temporary sibling first and renamed into
    /// place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory or file cannot be written.
    pub fn export_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf, Error> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let json = self
            .export_json()
            .map_err(|e| Error::Io(format!("Serialization failed: {e}")))?;

        let path = dir.join(default_filename());
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        Ok(path)
    }
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new(RetentionPolicy::default())
    }
}

fn default_filename() -> String {
    format!(
        "iris_lens-diagnostics-{}.json",
        Utc::now().format("%Y%m%d-%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::CatalogError;
    use tempfile::tempdir;

    #[test]
    fn handle_events_reach_buffer_after_processing() {
        let mut collector = DiagnosticsCollector::default();
        let handle = collector.handle();

        handle.log_action(UserAction::StartCapture);
        handle.log_state(AppStateEvent::FaceFound);
        assert!(collector.is_empty());

        collector.process_pending();
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn full_channel_drops_events_without_blocking() {
        let mut collector = DiagnosticsCollector::default();
        let handle = collector.handle();

        for _ in 0..(DEFAULT_CHANNEL_CAPACITY + 50) {
            handle.log_warning("spam");
        }
        collector.process_pending();

        assert_eq!(collector.len(), DEFAULT_CHANNEL_CAPACITY);
    }

    #[test]
    fn errors_are_counted_by_category() {
        let mut collector = DiagnosticsCollector::default();
        let handle = collector.handle();

        handle.log_error(&CatalogError::Rejected.into());
        handle.log_error(&CatalogError::Empty.into());
        collector.process_pending();

        assert_eq!(collector.count_errors(ErrorCategory::CatalogFetch), 2);
        assert_eq!(collector.count_errors(ErrorCategory::Camera), 0);
    }

    #[test]
    fn export_writes_json_report() {
        let dir = tempdir().expect("tempdir");
        let mut collector = DiagnosticsCollector::default();
        collector.handle().log_action(UserAction::ToggleInfo);
        collector.process_pending();

        let path = collector.export_to_dir(dir.path()).expect("export");

        let content = std::fs::read_to_string(&path).expect("read report");
        let json: serde_json::Value = serde_json::from_str(&content).expect("valid json");
        assert_eq!(json["event_count"], 1);
        assert_eq!(json["events"][0]["action"]["action"], "toggle_info");
        assert!(!path.with_extension("json.tmp").exists());
    }
}
