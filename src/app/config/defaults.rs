// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! Constants are organized by the `settings.toml` section they back.

// ==========================================================================
// Catalog Defaults
// ==========================================================================

/// Endpoint listing the available iris textures.
pub const DEFAULT_CATALOG_URL: &str = "https://saglamgoz.az/api/irises";

/// Prefix joined with relative catalog image paths.
pub const DEFAULT_STORAGE_BASE_URL: &str = "https://saglamgoz.az/storage/";

// ==========================================================================
// Camera Defaults
// ==========================================================================

/// Default capture device.
#[cfg(target_os = "linux")]
pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";

/// Default capture device.
#[cfg(target_os = "macos")]
pub const DEFAULT_CAMERA_DEVICE: &str = "0";

/// Default capture device.
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub const DEFAULT_CAMERA_DEVICE: &str = "video=Integrated Camera";

/// Requested capture width in pixels.
pub const DEFAULT_CAMERA_WIDTH: u32 = 1280;

/// Requested capture height in pixels.
pub const DEFAULT_CAMERA_HEIGHT: u32 = 720;

/// Interval between two polls of the tracking worker (about 30 polls/s).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 33;

/// Fastest allowed polling.
pub const MIN_POLL_INTERVAL_MS: u64 = 10;

/// Slowest allowed polling (keeps the preview at 15 fps or better).
pub const MAX_POLL_INTERVAL_MS: u64 = 66;

// ==========================================================================
// Detector Defaults
// ==========================================================================

/// Side length of the square model input.
pub const DEFAULT_MODEL_INPUT_SIZE: u32 = 256;

/// Only the first face is ever used.
pub const DEFAULT_MAX_FACES: u8 = 1;

/// Iris points are needed for the overlay.
pub const DEFAULT_REFINE_LANDMARKS: bool = true;

pub const DEFAULT_MIN_DETECTION_CONFIDENCE: f32 = 0.5;

pub const DEFAULT_MIN_TRACKING_CONFIDENCE: f32 = 0.5;

// ==========================================================================
// Overlay Defaults
// ==========================================================================

/// Iris radius multiplier (see `domain::render::enlargement_bounds`).
pub const DEFAULT_ENLARGEMENT_FACTOR: f32 = 1.45;

/// Config spelling of the default density.
pub const DEFAULT_DENSITY: &str = "medium";

// ==========================================================================
// Capture Defaults
// ==========================================================================

/// Visible countdown length in seconds.
pub const DEFAULT_COUNTDOWN_SECS: u8 = 4;

/// Delay between pressing capture and taking the canvas snapshot.
pub const DEFAULT_CAPTURE_DELAY_MS: u64 = 500;

/// Name under which snapshots are shared or saved.
pub const DEFAULT_SNAPSHOT_FILE_NAME: &str = "saglamgoz.png";

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

/// Events kept by the diagnostics collector.
pub const DEFAULT_DIAGNOSTICS_CAPACITY: usize = 1000;

/// Minutes of activity kept by the diagnostics collector.
pub const DEFAULT_DIAGNOSTICS_RETENTION_MINS: u64 = 30;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{buffer_capacity_bounds, DEFAULT_RETENTION_WINDOW};
    use crate::domain::capture::countdown_bounds;
    use crate::domain::render::enlargement_bounds;

    #[test]
    fn defaults_match_domain_defaults() {
        assert_eq!(DEFAULT_ENLARGEMENT_FACTOR, enlargement_bounds::DEFAULT);
        assert_eq!(DEFAULT_COUNTDOWN_SECS, countdown_bounds::DEFAULT);
        assert_eq!(DEFAULT_DIAGNOSTICS_CAPACITY, buffer_capacity_bounds::DEFAULT);
        assert_eq!(
            DEFAULT_DIAGNOSTICS_RETENTION_MINS * 60,
            DEFAULT_RETENTION_WINDOW.as_secs()
        );
    }

    #[test]
    fn poll_interval_is_within_bounds() {
        assert!(DEFAULT_POLL_INTERVAL_MS >= MIN_POLL_INTERVAL_MS);
        assert!(DEFAULT_POLL_INTERVAL_MS <= MAX_POLL_INTERVAL_MS);
    }
}
