// SPDX-License-Identifier: MPL-2.0
//! Landmark detector port definition.
//!
//! A detector turns one camera frame into zero or one face landmark sets.
//! It may keep state between calls (e.g. the tracked face region), which is
//! why `detect` takes `&mut self`.

use crate::domain::frame::Frame;
use crate::domain::landmark::LandmarkSet;
use std::fmt;

/// Errors raised by a landmark detector.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectorError {
    /// The landmark model file is missing.
    ModelNotFound(String),
    /// The model file could not be downloaded.
    DownloadFailed(String),
    /// The model file does not match its expected checksum.
    ChecksumMismatch { expected: String, actual: String },
    /// The model could not be loaded into an inference session.
    ModelLoadFailed(String),
    /// Running the model on a frame failed.
    InferenceFailed(String),
    /// The model produced tensors of an unexpected shape.
    UnexpectedOutput(String),
}

impl fmt::Display for DetectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectorError::ModelNotFound(path) => write!(f, "Landmark model not found: {path}"),
            DetectorError::DownloadFailed(msg) => write!(f, "Model download failed: {msg}"),
            DetectorError::ChecksumMismatch { expected, actual } => {
                write!(f, "Checksum mismatch: expected {expected}, got {actual}")
            }
            DetectorError::ModelLoadFailed(msg) => write!(f, "Failed to load model: {msg}"),
            DetectorError::InferenceFailed(msg) => write!(f, "Inference failed: {msg}"),
            DetectorError::UnexpectedOutput(msg) => write!(f, "Unexpected model output: {msg}"),
        }
    }
}

impl std::error::Error for DetectorError {}

/// Port for face landmark detection.
///
/// Implementations must be `Send` so they can run on the tracking thread.
pub trait LandmarkDetector: Send {
    /// Detects the landmarks of at most one face in `frame`.
    ///
    /// Returns `Ok(None)` when no face passes the confidence thresholds.
    ///
    /// # Errors
    ///
    /// Returns a [`DetectorError`] if inference itself fails.
    fn detect(&mut self, frame: &Frame) -> Result<Option<LandmarkSet>, DetectorError>;

    /// Forgets any tracked face, forcing a fresh detection on the next frame.
    fn reset(&mut self) {}
}
