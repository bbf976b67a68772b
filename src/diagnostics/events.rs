// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types for activity tracking.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ErrorCategory;

/// User-initiated actions that can be captured for diagnostics.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAction {
    SelectTexture { id: String },
    SetDensity { density: String },
    StartCapture,
    ShareSnapshot,
    CloseSnapshot,
    ToggleInfo,
    ExportDiagnostics,
}

/// Session phase changes.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AppStateEvent {
    CatalogReady { textures: usize },
    CameraStarted { width: u32, height: u32 },
    CameraEnded,
    FaceFound,
    FaceLost,
    SnapshotTaken { width: u32, height: u32 },
    ScreenshotShown,
    SnapshotSaved,
}

/// A single diagnostic event.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticEvent {
    /// Wall-clock time of the event.
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    /// Creates a new diagnostic event stamped with the current time.
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            at: Utc::now(),
            kind,
        }
    }
}

/// The type and associated data for a diagnostic event.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    UserAction {
        action: UserAction,
    },
    AppState {
        state: AppStateEvent,
    },
    Warning {
        message: String,
    },
    Error {
        category: ErrorCategory,
        message: String,
    },
}
