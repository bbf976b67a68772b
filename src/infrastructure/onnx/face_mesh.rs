// SPDX-License-Identifier: MPL-2.0
//! Face mesh adapter implementing the [`LandmarkDetector`] trait.
//!
//! [`LandmarkDetector`]: crate::application::port::LandmarkDetector

use crate::application::port::{DetectorError, LandmarkDetector};
use crate::domain::detection::DetectorOptions;
use crate::domain::frame::Frame;
use crate::domain::landmark::{LandmarkSet, FACE_MESH_POINT_COUNT};
use crate::media::face_mesh::{project_to_frame, FaceMeshModel, RoiTracker};
use std::path::PathBuf;

/// ONNX-based landmark detector for a single face.
///
/// Wraps a loaded [`FaceMeshModel`] and a [`RoiTracker`] that decides, per
/// frame, which square of the image to feed the model and which confidence
/// threshold the result must meet.
///
/// # Example
///
/// ```ignore
/// use iris_lens::infrastructure::onnx::OnnxFaceMeshDetector;
/// use iris_lens::application::port::LandmarkDetector;
///
/// let mut detector = OnnxFaceMeshDetector::load(model_path, 256, options)?;
/// if let Some(face) = detector.detect(&frame)? {
///     println!("{} landmarks", face.len());
/// }
/// ```
pub struct OnnxFaceMeshDetector {
    model: FaceMeshModel,
    tracker: RoiTracker,
}

impl OnnxFaceMeshDetector {
    /// Loads the model session and prepares the tracker.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is missing or cannot be loaded.
    pub fn load(
        model_path: PathBuf,
        input_size: u32,
        options: DetectorOptions,
    ) -> Result<Self, DetectorError> {
        let mut model = FaceMeshModel::new(model_path, input_size);
        model.load_session()?;
        Ok(Self {
            model,
            tracker: RoiTracker::new(options),
        })
    }
}

impl LandmarkDetector for OnnxFaceMeshDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Option<LandmarkSet>, DetectorError> {
        let options = *self.tracker.options();
        if options.max_faces == 0 {
            return Ok(None);
        }

        let (width, height) = (frame.width(), frame.height());
        let (roi, threshold) = self.tracker.next_roi(width, height);
        let output = self.model.infer(frame, roi)?;

        if !threshold.accepts(output.score) {
            self.tracker.observe(None, width, height);
            return Ok(None);
        }

        let mut points = output.points;
        if !options.refine_landmarks {
            points.truncate(FACE_MESH_POINT_COUNT);
        }
        let face = project_to_frame(&points, roi, self.model.input_size(), width, height);

        self.tracker.observe(Some(&face), width, height);
        Ok(Some(face))
    }

    fn reset(&mut self) {
        self.tracker.reset();
    }
}
