// SPDX-License-Identifier: MPL-2.0
//! Camera frame source port definition.

use crate::domain::frame::Frame;
use std::fmt;

/// Errors raised while acquiring camera frames.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraError {
    /// The device or file could not be opened (missing, busy, no permission).
    OpenFailed(String),
    /// The input has no video stream.
    NoVideoStream,
    /// A frame could not be decoded or converted.
    DecodingFailed(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::OpenFailed(msg) => write!(f, "Could not open camera: {msg}"),
            CameraError::NoVideoStream => write!(f, "No video stream found"),
            CameraError::DecodingFailed(msg) => write!(f, "Decoding failed: {msg}"),
        }
    }
}

impl std::error::Error for CameraError {}

/// Port for a sequential source of camera frames.
///
/// Sources are created and consumed on the tracking thread, so they are not
/// required to be `Send`.
pub trait FrameSource {
    /// Frame dimensions delivered by this source.
    fn resolution(&self) -> (u32, u32);

    /// Blocks until the next frame is available.
    ///
    /// Returns `Ok(None)` at end of stream.
    ///
    /// # Errors
    ///
    /// Returns a [`CameraError`] if the frame cannot be read.
    fn next_frame(&mut self) -> Result<Option<Frame>, CameraError>;
}
