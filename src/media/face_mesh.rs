// SPDX-License-Identifier: MPL-2.0
//! Face landmark model (face mesh with refined irises) on ONNX Runtime.
//!
//! This module provides functionality for:
//! - Locating, downloading and BLAKE3-verifying the landmark model
//! - Cropping a square region of interest and turning it into an NHWC tensor
//! - Running inference and mapping the mesh back to normalized frame coordinates
//! - Choosing the region of interest for the next frame (detect vs. track)
//!
//! The model takes a `[1, S, S, 3]` RGB tensor in `0..1` and returns the mesh
//! as `N * 3` floats in input pixel units (`N` = 478 with irises, 468
//! without) plus a single face-presence logit.

use crate::app::paths;
use crate::application::port::DetectorError;
use crate::domain::detection::{Confidence, DetectorOptions, Roi};
use crate::domain::frame::Frame;
use crate::domain::landmark::{Landmark, LandmarkSet, FACE_MESH_POINT_COUNT, REFINED_POINT_COUNT};
use image_rs::imageops::{self, FilterType};
use image_rs::{ImageBuffer, Rgba};
use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::{Path, PathBuf};

/// Filename for the landmark model in the data directory.
pub const MODEL_FILENAME: &str = "face_landmark.onnx";

/// Default square input size of the landmark model.
pub const DEFAULT_INPUT_SIZE: u32 = 256;

/// Smallest plausible model file; anything below is an error page or a
/// truncated download.
const MIN_MODEL_SIZE_BYTES: u64 = 100_000;

/// Returns the path where the landmark model is stored by default.
#[must_use]
pub fn default_model_path() -> PathBuf {
    paths::get_app_data_dir().map_or_else(
        || PathBuf::from(MODEL_FILENAME),
        |mut p| {
            p.push(MODEL_FILENAME);
            p
        },
    )
}

// =============================================================================
// Model Lifecycle
// =============================================================================

/// Raw model output for one region of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshOutput {
    /// Mesh points in input pixel units.
    pub points: Vec<[f32; 3]>,
    /// Face presence probability in `0..=1`.
    pub score: f32,
}

/// Owns the landmark model file and its inference session.
pub struct FaceMeshModel {
    model_path: PathBuf,
    input_size: u32,
    session: Option<Session>,
}

impl FaceMeshModel {
    #[must_use]
    pub fn new(model_path: PathBuf, input_size: u32) -> Self {
        Self {
            model_path,
            input_size: input_size.max(1),
            session: None,
        }
    }

    #[must_use]
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    #[must_use]
    pub fn input_size(&self) -> u32 {
        self.input_size
    }

    #[must_use]
    pub fn is_model_present(&self) -> bool {
        self.model_path.exists()
    }

    #[must_use]
    pub fn is_session_ready(&self) -> bool {
        self.session.is_some()
    }

    /// Loads the ONNX session from the model file.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::ModelNotFound`] if the file is missing, or
    /// [`DetectorError::ModelLoadFailed`] if ONNX Runtime rejects it. A
    /// rejected file is deleted.
    pub fn load_session(&mut self) -> Result<(), DetectorError> {
        if !self.model_path.exists() {
            return Err(DetectorError::ModelNotFound(
                self.model_path.display().to_string(),
            ));
        }

        let session = Session::builder()
            .map_err(|e| DetectorError::ModelLoadFailed(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| DetectorError::ModelLoadFailed(e.to_string()))?
            .commit_from_file(&self.model_path);

        match session {
            Ok(session) => {
                self.session = Some(session);
                Ok(())
            }
            Err(e) => {
                // An unreadable model is dropped so it is downloaded again.
                discard_model(&self.model_path);
                Err(DetectorError::ModelLoadFailed(e.to_string()))
            }
        }
    }

    /// Runs the model on the `roi` crop of `frame`.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::ModelLoadFailed`] if no session is loaded,
    /// [`DetectorError::InferenceFailed`] if the run fails, or
    /// [`DetectorError::UnexpectedOutput`] if no mesh tensor is produced.
    pub fn infer(&mut self, frame: &Frame, roi: Roi) -> Result<MeshOutput, DetectorError> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| DetectorError::ModelLoadFailed("Session not loaded".to_string()))?;

        let input_tensor = preprocess(frame, roi, self.input_size);
        let input_tensor = input_tensor.as_standard_layout().into_owned();

        let input_name = session
            .inputs
            .first()
            .map_or_else(|| "input_12".to_string(), |i| i.name.clone());

        let input_ref = ort::value::TensorRef::from_array_view(&input_tensor)
            .map_err(|e| DetectorError::InferenceFailed(e.to_string()))?;

        let outputs = session
            .run(ort::inputs![input_name.as_str() => input_ref])
            .map_err(|e| DetectorError::InferenceFailed(e.to_string()))?;

        let mut tensors = Vec::new();
        for (_, value) in outputs.iter() {
            let (_, data) = value
                .try_extract_tensor::<f32>()
                .map_err(|e: ort::Error| DetectorError::UnexpectedOutput(e.to_string()))?;
            tensors.push(data.to_vec());
        }

        interpret_outputs(&tensors)
    }
}

// =============================================================================
// Pre/Post-processing
// =============================================================================

/// Crops `roi` out of `frame` and resizes it to an NHWC tensor
/// `[1, size, size, 3]`, RGB, normalized to `0..1`.
///
/// The crop is clamped to the frame first.
#[must_use]
pub fn preprocess(frame: &Frame, roi: Roi, size: u32) -> Array4<f32> {
    let roi = roi.clamped(frame.width(), frame.height());
    let side = size as usize;
    let mut tensor = Array4::<f32>::zeros((1, side, side, 3));

    let Some(view) = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(
        frame.width(),
        frame.height(),
        frame.rgba_bytes().to_vec(),
    ) else {
        return tensor;
    };

    let crop_size = (roi.size.round() as u32).max(1);
    let cropped = imageops::crop_imm(
        &view,
        roi.x.round() as u32,
        roi.y.round() as u32,
        crop_size,
        crop_size,
    )
    .to_image();
    let resized = imageops::resize(&cropped, size, size, FilterType::Triangle);

    for (x, y, pixel) in resized.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;
        tensor[[0, y as usize, x as usize, 0]] = f32::from(r) / 255.0;
        tensor[[0, y as usize, x as usize, 1]] = f32::from(g) / 255.0;
        tensor[[0, y as usize, x as usize, 2]] = f32::from(b) / 255.0;
    }

    tensor
}

/// Picks the mesh and score tensors out of the flattened model outputs.
///
/// The mesh is the first tensor holding 478 or 468 points; the score is the
/// first single-value tensor, passed through a sigmoid. A model without a
/// score output is treated as always confident.
///
/// # Errors
///
/// Returns [`DetectorError::UnexpectedOutput`] if no mesh tensor is present.
pub fn interpret_outputs(tensors: &[Vec<f32>]) -> Result<MeshOutput, DetectorError> {
    let mesh = tensors
        .iter()
        .find(|t| t.len() == REFINED_POINT_COUNT * 3)
        .or_else(|| tensors.iter().find(|t| t.len() == FACE_MESH_POINT_COUNT * 3))
        .ok_or_else(|| {
            let lens: Vec<usize> = tensors.iter().map(Vec::len).collect();
            DetectorError::UnexpectedOutput(format!("No landmark tensor among outputs {lens:?}"))
        })?;

    let score = tensors
        .iter()
        .find(|t| t.len() == 1)
        .map_or(1.0, |t| sigmoid(t[0]));

    Ok(MeshOutput {
        points: mesh.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect(),
        score,
    })
}

/// Maps mesh points from model input space back to normalized frame
/// coordinates.
///
/// Depth is scaled like `x` so it stays comparable across frames.
#[must_use]
pub fn project_to_frame(
    points: &[[f32; 3]],
    roi: Roi,
    input_size: u32,
    frame_width: u32,
    frame_height: u32,
) -> LandmarkSet {
    let scale = roi.size / input_size.max(1) as f32;
    let (w, h) = (frame_width.max(1) as f32, frame_height.max(1) as f32);
    points
        .iter()
        .map(|&[x, y, z]| {
            Landmark::new(
                (roi.x + x * scale) / w,
                (roi.y + y * scale) / h,
                z * scale / w,
            )
        })
        .collect::<Vec<_>>()
        .into()
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

// =============================================================================
// Region Tracking
// =============================================================================

/// Chooses where to look for the face in the next frame.
///
/// Without a tracked face the centred square of the frame is searched and a
/// result must reach the detection confidence. Once a face is found, the
/// next frame searches around it and only needs the tracking confidence.
#[derive(Debug, Clone, Default)]
pub struct RoiTracker {
    options: DetectorOptions,
    tracked: Option<Roi>,
}

impl RoiTracker {
    #[must_use]
    pub fn new(options: DetectorOptions) -> Self {
        Self {
            options,
            tracked: None,
        }
    }

    #[must_use]
    pub fn options(&self) -> &DetectorOptions {
        &self.options
    }

    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.tracked.is_some()
    }

    /// Region and confidence threshold for the next frame.
    #[must_use]
    pub fn next_roi(&self, frame_width: u32, frame_height: u32) -> (Roi, Confidence) {
        match self.tracked {
            Some(roi) => (
                roi.clamped(frame_width, frame_height),
                self.options.min_tracking_confidence,
            ),
            None => (
                Roi::centered(frame_width, frame_height),
                self.options.min_detection_confidence,
            ),
        }
    }

    /// Records the outcome of the last frame.
    pub fn observe(&mut self, face: Option<&LandmarkSet>, frame_width: u32, frame_height: u32) {
        self.tracked = face.and_then(|f| Roi::around(f, frame_width, frame_height));
    }

    pub fn reset(&mut self) {
        self.tracked = None;
    }
}

// =============================================================================
// Download and Verification
// =============================================================================

/// Downloads the model from `url` into `dest`.
///
/// The body is streamed into a `.part` sibling and only renamed to `dest`
/// once it passes the size check and, if `expected_hash` is given, the
/// BLAKE3 check. Any failure removes the partial file, so `dest` either
/// holds a complete model or does not exist.
///
/// Returns the number of bytes downloaded.
///
/// # Errors
///
/// Returns [`DetectorError::DownloadFailed`] on network or HTTP failure or
/// when the body is implausibly small, and
/// [`DetectorError::ChecksumMismatch`] when the digest differs.
pub async fn download_model(
    url: &str,
    dest: &Path,
    expected_hash: Option<&str>,
    progress_callback: impl FnMut(f32) + Send,
) -> Result<u64, DetectorError> {
    let partial = partial_path(dest);
    match stream_to_file(url, &partial, progress_callback).await {
        Ok(downloaded) => finish_download(&partial, dest, downloaded, expected_hash),
        Err(e) => {
            let _ = std::fs::remove_file(&partial);
            Err(e)
        }
    }
}

/// Path the download is written to before it is validated.
#[must_use]
pub fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map_or_else(|| MODEL_FILENAME.into(), std::ffi::OsStr::to_os_string);
    name.push(".part");
    dest.with_file_name(name)
}

async fn stream_to_file(
    url: &str,
    partial: &Path,
    mut progress_callback: impl FnMut(f32) + Send,
) -> Result<u64, DetectorError> {
    use futures_util::StreamExt;

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(concat!("IrisLens/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| DetectorError::DownloadFailed(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DetectorError::DownloadFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(DetectorError::DownloadFailed(format!(
            "HTTP status: {}",
            response.status()
        )));
    }

    let total_size = response.content_length().unwrap_or(0);

    if let Some(parent) = partial.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| DetectorError::DownloadFailed(e.to_string()))?;
    }

    let mut file = std::fs::File::create(partial)
        .map_err(|e| DetectorError::DownloadFailed(e.to_string()))?;

    let mut downloaded: u64 = 0;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DetectorError::DownloadFailed(e.to_string()))?;
        std::io::Write::write_all(&mut file, &chunk)
            .map_err(|e| DetectorError::DownloadFailed(e.to_string()))?;

        downloaded += chunk.len() as u64;

        if total_size > 0 {
            progress_callback(downloaded as f32 / total_size as f32);
        }
    }

    file.sync_all()
        .map_err(|e| DetectorError::DownloadFailed(e.to_string()))?;
    Ok(downloaded)
}

/// Validates a finished download and moves it into place.
///
/// The partial file is removed on every failure.
fn finish_download(
    partial: &Path,
    dest: &Path,
    downloaded: u64,
    expected_hash: Option<&str>,
) -> Result<u64, DetectorError> {
    let result = validate_download(partial, downloaded, expected_hash).and_then(|()| {
        std::fs::rename(partial, dest).map_err(|e| DetectorError::DownloadFailed(e.to_string()))
    });
    if result.is_err() {
        let _ = std::fs::remove_file(partial);
    }
    result.map(|()| downloaded)
}

fn validate_download(
    partial: &Path,
    downloaded: u64,
    expected_hash: Option<&str>,
) -> Result<(), DetectorError> {
    if downloaded < MIN_MODEL_SIZE_BYTES {
        return Err(DetectorError::DownloadFailed(format!(
            "Downloaded file too small ({downloaded} bytes)"
        )));
    }
    match expected_hash {
        Some(expected) => verify_checksum(partial, expected),
        None => Ok(()),
    }
}

/// Deletes a model file that failed validation so the next start fetches
/// it again.
pub fn discard_model(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            eprintln!("Failed to remove invalid model {}: {e}", path.display());
        }
    }
}

/// Verifies the model file against a BLAKE3 hex digest.
///
/// # Errors
///
/// Returns [`DetectorError::ModelNotFound`] if the file cannot be read, or
/// [`DetectorError::ChecksumMismatch`] if the digest differs.
pub fn verify_checksum(path: &Path, expected_hash: &str) -> Result<(), DetectorError> {
    let file_data =
        std::fs::read(path).map_err(|_| DetectorError::ModelNotFound(path.display().to_string()))?;
    let actual_hash = blake3::hash(&file_data).to_hex().to_string();

    if !actual_hash.eq_ignore_ascii_case(expected_hash.trim()) {
        return Err(DetectorError::ChecksumMismatch {
            expected: expected_hash.to_string(),
            actual: actual_hash,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;
    use tempfile::tempdir;

    #[test]
    fn default_model_path_ends_with_filename() {
        assert!(default_model_path().ends_with(MODEL_FILENAME));
    }

    #[test]
    fn session_is_not_ready_before_load() {
        let model = FaceMeshModel::new(PathBuf::from("missing.onnx"), DEFAULT_INPUT_SIZE);
        assert!(!model.is_session_ready());
    }

    #[test]
    fn loading_missing_model_fails() {
        let dir = tempdir().expect("tempdir");
        let mut model = FaceMeshModel::new(dir.path().join("absent.onnx"), DEFAULT_INPUT_SIZE);
        assert!(matches!(
            model.load_session(),
            Err(DetectorError::ModelNotFound(_))
        ));
    }

    #[test]
    fn partial_path_is_a_sibling() {
        let dest = Path::new("/data/face_landmark.onnx");
        assert_eq!(
            partial_path(dest),
            PathBuf::from("/data/face_landmark.onnx.part")
        );
    }

    #[test]
    fn finished_download_is_moved_into_place() {
        let dir = tempdir().expect("tempdir");
        let dest = dir.path().join(MODEL_FILENAME);
        let partial = partial_path(&dest);
        let body = vec![7_u8; MIN_MODEL_SIZE_BYTES as usize];
        std::fs::write(&partial, &body).expect("write");
        let digest = blake3::hash(&body).to_hex().to_string();

        let size = finish_download(&partial, &dest, body.len() as u64, Some(&digest))
            .expect("valid download");

        assert_eq!(size, MIN_MODEL_SIZE_BYTES);
        assert!(dest.is_file());
        assert!(!partial.exists());
    }

    #[test]
    fn truncated_download_leaves_no_model_behind() {
        let dir = tempdir().expect("tempdir");
        let dest = dir.path().join(MODEL_FILENAME);
        let partial = partial_path(&dest);
        std::fs::write(&partial, b"<html>503</html>").expect("write");

        let result = finish_download(&partial, &dest, 16, None);

        assert!(matches!(result, Err(DetectorError::DownloadFailed(_))));
        assert!(!partial.exists());
        assert!(!dest.exists());
    }

    #[test]
    fn download_with_wrong_digest_leaves_no_model_behind() {
        let dir = tempdir().expect("tempdir");
        let dest = dir.path().join(MODEL_FILENAME);
        let partial = partial_path(&dest);
        let body = vec![7_u8; MIN_MODEL_SIZE_BYTES as usize];
        std::fs::write(&partial, &body).expect("write");

        let result = finish_download(&partial, &dest, body.len() as u64, Some("00ff"));

        assert!(matches!(result, Err(DetectorError::ChecksumMismatch { .. })));
        assert!(!partial.exists());
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn failed_request_leaves_no_model_behind() {
        let dir = tempdir().expect("tempdir");
        let dest = dir.path().join(MODEL_FILENAME);

        // Port 9 on loopback refuses the connection.
        let result = download_model("http://127.0.0.1:9/face_landmark.onnx", &dest, None, |_| {})
            .await;

        assert!(matches!(result, Err(DetectorError::DownloadFailed(_))));
        assert!(!partial_path(&dest).exists());
        assert!(!dest.exists());
    }

    #[test]
    fn discarding_a_missing_model_is_silent() {
        let dir = tempdir().expect("tempdir");
        discard_model(&dir.path().join(MODEL_FILENAME));
    }

    #[test]
    fn preprocess_produces_nhwc_tensor() {
        let frame = Frame::filled(64, 48, [255, 128, 0, 255]);
        let tensor = preprocess(&frame, Roi::centered(64, 48), 16);

        assert_eq!(tensor.shape(), &[1, 16, 16, 3]);
        assert_abs_diff_eq!(tensor[[0, 5, 5, 0]], 1.0, epsilon = 0.01);
        assert_abs_diff_eq!(tensor[[0, 5, 5, 1]], 0.502, epsilon = 0.01);
        assert_abs_diff_eq!(tensor[[0, 5, 5, 2]], 0.0, epsilon = 0.01);
    }

    #[test]
    fn interpret_finds_mesh_and_score() {
        let mesh = vec![1.0; REFINED_POINT_COUNT * 3];
        let output = interpret_outputs(&[vec![0.0], mesh]).expect("mesh present");

        assert_eq!(output.points.len(), REFINED_POINT_COUNT);
        assert_abs_diff_eq!(output.score, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn interpret_accepts_unrefined_mesh() {
        let output =
            interpret_outputs(&[vec![0.0; FACE_MESH_POINT_COUNT * 3]]).expect("mesh present");
        assert_eq!(output.points.len(), FACE_MESH_POINT_COUNT);
        assert_abs_diff_eq!(output.score, 1.0);
    }

    #[test]
    fn interpret_rejects_unknown_outputs() {
        assert!(matches!(
            interpret_outputs(&[vec![0.0; 10]]),
            Err(DetectorError::UnexpectedOutput(_))
        ));
    }

    #[test]
    fn projection_maps_roi_back_to_frame() {
        let roi = Roi {
            x: 100.0,
            y: 50.0,
            size: 200.0,
        };
        let set = project_to_frame(&[[128.0, 64.0, 10.0]], roi, 256, 400, 300);

        let p = set.points()[0];
        assert_abs_diff_eq!(p.x, (100.0 + 100.0) / 400.0, epsilon = 1e-5);
        assert_abs_diff_eq!(p.y, (50.0 + 50.0) / 300.0, epsilon = 1e-5);
    }

    #[test]
    fn tracker_switches_threshold_once_face_is_seen() {
        let options = DetectorOptions {
            min_detection_confidence: Confidence::new(0.8),
            min_tracking_confidence: Confidence::new(0.3),
            ..DetectorOptions::default()
        };
        let mut tracker = RoiTracker::new(options);

        let (roi, threshold) = tracker.next_roi(640, 480);
        assert_eq!(roi, Roi::centered(640, 480));
        assert_abs_diff_eq!(threshold.value(), 0.8);

        let face: LandmarkSet = vec![
            Landmark::new(0.4, 0.4, 0.0),
            Landmark::new(0.6, 0.6, 0.0),
        ]
        .into();
        tracker.observe(Some(&face), 640, 480);
        assert!(tracker.is_tracking());
        let (_, threshold) = tracker.next_roi(640, 480);
        assert_abs_diff_eq!(threshold.value(), 0.3);

        tracker.observe(None, 640, 480);
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn checksum_verification() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(MODEL_FILENAME);
        std::fs::write(&path, b"model bytes").expect("write");
        let expected = blake3::hash(b"model bytes").to_hex().to_string();

        assert!(verify_checksum(&path, &expected).is_ok());
        assert!(matches!(
            verify_checksum(&path, "00"),
            Err(DetectorError::ChecksumMismatch { .. })
        ));
    }
}
