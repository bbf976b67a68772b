// SPDX-License-Identifier: MPL-2.0
//! ONNX Runtime adapters implementing the [`LandmarkDetector`] port trait.
//!
//! - [`OnnxFaceMeshDetector`]: face mesh with refined iris landmarks
//!
//! The underlying [`FaceMeshModel`] handles model loading and inference;
//! the adapter adds region-of-interest tracking between frames.
//!
//! [`LandmarkDetector`]: crate::application::port::LandmarkDetector
//! [`FaceMeshModel`]: crate::media::face_mesh::FaceMeshModel

mod face_mesh;

pub use face_mesh::OnnxFaceMeshDetector;
