// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::application::port::{ExportError, ShareOutcome};
use crate::domain::render::{Density, TextureId};
use crate::domain::texture::{Texture, TextureCatalog};
use crate::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

/// Messages consumed by `App::update`.
#[derive(Debug, Clone)]
pub enum Message {
    /// Catalog listing and every texture finished loading, or one failed.
    CatalogLoaded(Result<TextureCatalog, Error>),
    /// Progress of the landmark model download (0.0 - 1.0).
    ModelDownloadProgress(f32),
    /// The landmark model is on disk and verified, or could not be.
    ModelReady(Result<PathBuf, Error>),
    /// Periodic drain of the tracking worker.
    Poll(Instant),
    SelectTexture(TextureChoice),
    SetDensity(Density),
    Capture,
    /// One second of the capture countdown elapsed.
    CountdownTick,
    /// The capture delay elapsed; the current canvas becomes the snapshot.
    SnapshotDue,
    Share,
    ShareCompleted(Result<ShareOutcome, ExportError>),
    CloseScreenshot,
    ToggleInfo,
    ExportDiagnostics,
    DismissMessage,
}

/// Entry of the texture picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureChoice {
    pub id: TextureId,
    pub title: String,
}

impl From<&Texture> for TextureChoice {
    fn from(texture: &Texture) -> Self {
        Self {
            id: texture.id().clone(),
            title: texture.title().to_string(),
        }
    }
}

impl fmt::Display for TextureChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Capture device or video file, overriding `[camera] device`.
    pub camera: Option<String>,
    /// Catalog endpoint, overriding `[catalog] url`.
    pub catalog_url: Option<String>,
    /// Takes precedence over the `IRIS_LENS_DATA_DIR` environment variable.
    pub data_dir: Option<String>,
    /// Takes precedence over the `IRIS_LENS_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
}
