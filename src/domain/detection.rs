// SPDX-License-Identifier: MPL-2.0
//! Landmark detector settings and the tracking region of interest.

use super::landmark::LandmarkSet;

/// A confidence threshold in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Confidence(f32);

impl Confidence {
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(0.0, 1.0))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns `true` if `score` meets this threshold.
    #[must_use]
    pub fn accepts(self, score: f32) -> bool {
        score >= self.0
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self(0.5)
    }
}

/// Landmark detector configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorOptions {
    /// Maximum number of faces to report. Only the first face is used.
    pub max_faces: u8,
    /// Whether to keep the refined iris points (478 instead of 468).
    pub refine_landmarks: bool,
    /// Score required to accept a face found without a prior track.
    pub min_detection_confidence: Confidence,
    /// Score required to keep following a face from the previous frame.
    pub min_tracking_confidence: Confidence,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            max_faces: 1,
            refine_landmarks: true,
            min_detection_confidence: Confidence::default(),
            min_tracking_confidence: Confidence::default(),
        }
    }
}

/// Square region of a frame fed to the landmark model, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roi {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl Roi {
    /// Enlargement applied to a face's bounding box when tracking it into
    /// the next frame.
    pub const TRACKING_SCALE: f32 = 1.5;

    /// The centred square spanning the frame's shorter side.
    #[must_use]
    pub fn centered(frame_width: u32, frame_height: u32) -> Self {
        let (w, h) = (frame_width as f32, frame_height as f32);
        let size = w.min(h);
        Self {
            x: (w - size) / 2.0,
            y: (h - size) / 2.0,
            size,
        }
    }

    /// Square around the face described by `landmarks`, enlarged by
    /// [`Self::TRACKING_SCALE`] and kept inside the frame where possible.
    #[must_use]
    pub fn around(landmarks: &LandmarkSet, frame_width: u32, frame_height: u32) -> Option<Self> {
        let (x0, y0, x1, y1) = landmarks.bounds()?;
        let (w, h) = (frame_width as f32, frame_height as f32);
        let face_w = (x1 - x0) * w;
        let face_h = (y1 - y0) * h;
        let size = (face_w.max(face_h) * Self::TRACKING_SCALE).min(w.min(h));
        if size < 1.0 {
            return None;
        }
        let cx = (x0 + x1) / 2.0 * w;
        let cy = (y0 + y1) / 2.0 * h;
        Some(
            Self {
                x: cx - size / 2.0,
                y: cy - size / 2.0,
                size,
            }
            .clamped(frame_width, frame_height),
        )
    }

    /// Shifts the square so it lies inside the frame.
    #[must_use]
    pub fn clamped(self, frame_width: u32, frame_height: u32) -> Self {
        let (w, h) = (frame_width as f32, frame_height as f32);
        let size = self.size.min(w.min(h));
        Self {
            x: self.x.clamp(0.0, (w - size).max(0.0)),
            y: self.y.clamp(0.0, (h - size).max(0.0)),
            size,
        }
    }
}
