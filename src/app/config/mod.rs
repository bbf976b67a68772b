// SPDX-License-Identifier: MPL-2.0
//! Loading and saving user preferences in a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[catalog]` - Texture catalog endpoint and image storage prefix
//! - `[camera]` - Capture device, requested resolution, polling rate
//! - `[detector]` - Landmark model location and detection thresholds
//! - `[overlay]` - Iris enlargement and density
//! - `[capture]` - Countdown, snapshot delay and file name
//!
//! Every field is optional; missing values fall back to [`defaults`].
//!
//! # Examples
//!
//! ```no_run
//! use iris_lens::app::config;
//! use iris_lens::domain::render::Density;
//!
//! let (mut config, _warning) = config::load();
//! config.overlay.density = Some(Density::High);
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::domain::capture::Countdown;
use crate::domain::detection::{Confidence, DetectorOptions};
use crate::domain::render::{Density, EnlargementFactor, RenderConfig};
use crate::error::{Error, Result};
use crate::media::face_mesh;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// Texture catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Prefix for catalog image paths that are not absolute URLs.
    #[serde(
        default = "default_storage_base_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub storage_base_url: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            storage_base_url: default_storage_base_url(),
        }
    }
}

/// Camera settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraConfig {
    /// Capture device, or a video file replayed as a camera.
    #[serde(default = "default_camera_device", skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,

    #[serde(default = "default_camera_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default = "default_camera_height", skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Milliseconds between two polls of the tracking worker.
    #[serde(default = "default_poll_interval", skip_serializing_if = "Option::is_none")]
    pub poll_interval_ms: Option<u64>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: default_camera_device(),
            width: default_camera_width(),
            height: default_camera_height(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

/// Landmark detector settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectorConfig {
    /// Model file; defaults to the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<PathBuf>,

    /// Where to download the model from when it is missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,

    /// Expected BLAKE3 hex digest of the model file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_checksum: Option<String>,

    #[serde(default = "default_max_faces", skip_serializing_if = "Option::is_none")]
    pub max_faces: Option<u8>,

    #[serde(
        default = "default_refine_landmarks",
        skip_serializing_if = "Option::is_none"
    )]
    pub refine_landmarks: Option<bool>,

    #[serde(
        default = "default_min_detection_confidence",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_detection_confidence: Option<f32>,

    #[serde(
        default = "default_min_tracking_confidence",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_tracking_confidence: Option<f32>,

    #[serde(default = "default_input_size", skip_serializing_if = "Option::is_none")]
    pub input_size: Option<u32>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            model_url: None,
            model_checksum: None,
            max_faces: default_max_faces(),
            refine_landmarks: default_refine_landmarks(),
            min_detection_confidence: default_min_detection_confidence(),
            min_tracking_confidence: default_min_tracking_confidence(),
            input_size: default_input_size(),
        }
    }
}

/// Overlay rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayConfig {
    #[serde(
        default = "default_enlargement_factor",
        skip_serializing_if = "Option::is_none"
    )]
    pub enlargement_factor: Option<f32>,

    /// Last density picked by the user.
    #[serde(
        default = "default_density",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_density",
        deserialize_with = "deserialize_density"
    )]
    pub density: Option<Density>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enlargement_factor: default_enlargement_factor(),
            density: default_density(),
        }
    }
}

/// Snapshot capture settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureConfig {
    #[serde(default = "default_countdown_secs", skip_serializing_if = "Option::is_none")]
    pub countdown_secs: Option<u8>,

    #[serde(
        default = "default_capture_delay_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub capture_delay_ms: Option<u64>,

    #[serde(default = "default_file_name", skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            countdown_secs: default_countdown_secs(),
            capture_delay_ms: default_capture_delay_ms(),
            file_name: default_file_name(),
        }
    }
}

// =============================================================================
// Main Config Struct
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub detector: DetectorConfig,

    #[serde(default)]
    pub overlay: OverlayConfig,

    #[serde(default)]
    pub capture: CaptureConfig,
}

// =============================================================================
// Resolved Values
// =============================================================================

impl Config {
    #[must_use]
    pub fn catalog_url(&self) -> &str {
        self.catalog.url.as_deref().unwrap_or(DEFAULT_CATALOG_URL)
    }

    #[must_use]
    pub fn storage_base_url(&self) -> &str {
        self.catalog
            .storage_base_url
            .as_deref()
            .unwrap_or(DEFAULT_STORAGE_BASE_URL)
    }

    #[must_use]
    pub fn camera_device(&self) -> &str {
        self.camera.device.as_deref().unwrap_or(DEFAULT_CAMERA_DEVICE)
    }

    #[must_use]
    pub fn camera_resolution(&self) -> (u32, u32) {
        (
            self.camera.width.unwrap_or(DEFAULT_CAMERA_WIDTH).max(1),
            self.camera.height.unwrap_or(DEFAULT_CAMERA_HEIGHT).max(1),
        )
    }

    /// Polling interval, clamped so the preview stays fluid.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        let ms = self
            .camera
            .poll_interval_ms
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS)
            .clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS);
        Duration::from_millis(ms)
    }

    #[must_use]
    pub fn model_path(&self) -> PathBuf {
        self.detector
            .model_path
            .clone()
            .unwrap_or_else(face_mesh::default_model_path)
    }

    #[must_use]
    pub fn model_input_size(&self) -> u32 {
        self.detector
            .input_size
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_MODEL_INPUT_SIZE)
    }

    #[must_use]
    pub fn detector_options(&self) -> DetectorOptions {
        let d = &self.detector;
        DetectorOptions {
            max_faces: d.max_faces.unwrap_or(DEFAULT_MAX_FACES).min(DEFAULT_MAX_FACES),
            refine_landmarks: d.refine_landmarks.unwrap_or(DEFAULT_REFINE_LANDMARKS),
            min_detection_confidence: Confidence::new(
                d.min_detection_confidence
                    .unwrap_or(DEFAULT_MIN_DETECTION_CONFIDENCE),
            ),
            min_tracking_confidence: Confidence::new(
                d.min_tracking_confidence
                    .unwrap_or(DEFAULT_MIN_TRACKING_CONFIDENCE),
            ),
        }
    }

    /// Initial render settings; the texture is chosen once the catalog loads.
    #[must_use]
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            texture: None,
            density: self.overlay.density.unwrap_or_default(),
            enlargement: EnlargementFactor::new(
                self.overlay
                    .enlargement_factor
                    .unwrap_or(DEFAULT_ENLARGEMENT_FACTOR),
            ),
        }
    }

    #[must_use]
    pub fn countdown(&self) -> Countdown {
        Countdown::start(self.capture.countdown_secs.unwrap_or(DEFAULT_COUNTDOWN_SECS))
    }

    #[must_use]
    pub fn capture_delay(&self) -> Duration {
        Duration::from_millis(
            self.capture
                .capture_delay_ms
                .unwrap_or(DEFAULT_CAPTURE_DELAY_MS),
        )
    }

    #[must_use]
    pub fn snapshot_file_name(&self) -> &str {
        self.capture
            .file_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_SNAPSHOT_FILE_NAME)
    }
}

// =============================================================================
// Default Value Functions (for serde)
// =============================================================================

fn default_catalog_url() -> Option<String> {
    Some(DEFAULT_CATALOG_URL.to_string())
}

fn default_storage_base_url() -> Option<String> {
    Some(DEFAULT_STORAGE_BASE_URL.to_string())
}

fn default_camera_device() -> Option<String> {
    Some(DEFAULT_CAMERA_DEVICE.to_string())
}

fn default_camera_width() -> Option<u32> {
    Some(DEFAULT_CAMERA_WIDTH)
}

fn default_camera_height() -> Option<u32> {
    Some(DEFAULT_CAMERA_HEIGHT)
}

fn default_poll_interval() -> Option<u64> {
    Some(DEFAULT_POLL_INTERVAL_MS)
}

fn default_max_faces() -> Option<u8> {
    Some(DEFAULT_MAX_FACES)
}

fn default_refine_landmarks() -> Option<bool> {
    Some(DEFAULT_REFINE_LANDMARKS)
}

fn default_min_detection_confidence() -> Option<f32> {
    Some(DEFAULT_MIN_DETECTION_CONFIDENCE)
}

fn default_min_tracking_confidence() -> Option<f32> {
    Some(DEFAULT_MIN_TRACKING_CONFIDENCE)
}

fn default_input_size() -> Option<u32> {
    Some(DEFAULT_MODEL_INPUT_SIZE)
}

fn default_enlargement_factor() -> Option<f32> {
    Some(DEFAULT_ENLARGEMENT_FACTOR)
}

fn default_density() -> Option<Density> {
    Density::from_key(DEFAULT_DENSITY)
}

fn default_countdown_secs() -> Option<u8> {
    Some(DEFAULT_COUNTDOWN_SECS)
}

fn default_capture_delay_ms() -> Option<u64> {
    Some(DEFAULT_CAPTURE_DELAY_MS)
}

fn default_file_name() -> Option<String> {
    Some(DEFAULT_SNAPSHOT_FILE_NAME.to_string())
}

fn serialize_density<S>(density: &Option<Density>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match density {
        Some(density) => serializer.serialize_str(density.key()),
        None => serializer.serialize_none(),
    }
}

fn deserialize_density<'de, D>(deserializer: D) -> std::result::Result<Option<Density>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    /// Either the level key or the raw opacity value behind it.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDensity {
        Key(String),
        Value(f32),
    }

    match RawDensity::deserialize(deserializer)? {
        RawDensity::Key(key) => Density::from_key(&key)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid density: {}", key))),
        RawDensity::Value(value) => Ok(Some(Density::from_value(value))),
    }
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load / Save
// =============================================================================

/// Loads the configuration from the default location.
///
/// Returns a tuple of `(config, optional_warning)`. A file that exists but
/// cannot be parsed yields the defaults together with a warning message.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    return (
                        Config::default(),
                        Some(format!(
                            "Settings could not be read, defaults are used ({})",
                            err
                        )),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Saves the configuration to the default location.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
