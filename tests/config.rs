// SPDX-License-Identifier: MPL-2.0
//! Settings file persistence.

use iris_lens::app::config::{self, Config};
use iris_lens::domain::render::Density;
use std::fs;
use std::time::Duration;

#[test]
fn settings_round_trip_through_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = Config::default();
    config.overlay.density = Some(Density::Low);
    config.camera.device = Some("/dev/video2".to_string());
    config.capture.countdown_secs = Some(6);

    config::save_with_override(&config, Some(dir.path().to_path_buf())).expect("save");
    let (loaded, warning) = config::load_with_override(Some(dir.path().to_path_buf()));

    assert!(warning.is_none());
    assert_eq!(loaded, config);
    assert_eq!(loaded.render_config().density, Density::Low);
    assert_eq!(loaded.countdown().remaining(), 6);
}

#[test]
fn unknown_keys_are_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("settings.toml"),
        "[camera]\npoll_interval_ms = 40\nmirror = true\n\n[legacy]\nzoom = 3\n",
    )
    .expect("write");

    let (loaded, warning) = config::load_with_override(Some(dir.path().to_path_buf()));

    assert!(warning.is_none());
    assert_eq!(loaded.poll_interval(), Duration::from_millis(40));
}

#[test]
fn corrupt_file_falls_back_to_defaults_with_warning() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("settings.toml"), "[overlay\ndensity = ").expect("write");

    let (loaded, warning) = config::load_with_override(Some(dir.path().to_path_buf()));

    assert!(warning.is_some());
    assert_eq!(loaded, Config::default());
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");

    let (loaded, warning) = config::load_with_override(Some(dir.path().join("absent")));

    assert!(warning.is_none());
    assert_eq!(loaded.catalog_url(), config::DEFAULT_CATALOG_URL);
}
