// SPDX-License-Identifier: MPL-2.0
use crate::application::port::{CameraError, CatalogError, DetectorError, ExportError};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Io(String),
    Config(String),
    Catalog(CatalogError),
    Camera(CameraError),
    Detector(DetectorError),
    Export(ExportError),
}

/// User-facing failure categories. Each maps to one fixed message shown in
/// the app's message area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    CatalogFetch,
    TexturePreload,
    Camera,
    Detector,
    Export,
    /// Local I/O or configuration trouble.
    Internal,
}

impl ErrorCategory {
    /// The sentence shown to the user for this category.
    #[must_use]
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorCategory::CatalogFetch => {
                "Failed to load iris data. Please check your internet connection and try again."
            }
            ErrorCategory::TexturePreload => {
                "Failed to load iris images. Please refresh and try again."
            }
            ErrorCategory::Camera => {
                "Could not access camera. Please allow permissions or check your device settings."
            }
            ErrorCategory::Detector => {
                "Could not start face tracking. Please check the landmark model and try again."
            }
            ErrorCategory::Export => "Could not save or share the snapshot. Please try again.",
            ErrorCategory::Internal => "Something went wrong. Please try again.",
        }
    }
}

impl Error {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Catalog(e) if e.is_texture_failure() => ErrorCategory::TexturePreload,
            Error::Catalog(_) => ErrorCategory::CatalogFetch,
            Error::Camera(_) => ErrorCategory::Camera,
            Error::Detector(_) => ErrorCategory::Detector,
            Error::Export(_) => ErrorCategory::Export,
            Error::Io(_) | Error::Config(_) => ErrorCategory::Internal,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> &'static str {
        self.category().user_message()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Catalog(e) => write!(f, "Catalog Error: {}", e),
            Error::Camera(e) => write!(f, "Camera Error: {}", e),
            Error::Detector(e) => write!(f, "Detector Error: {}", e),
            Error::Export(e) => write!(f, "Export Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        Error::Catalog(err)
    }
}

impl From<CameraError> for Error {
    fn from(err: CameraError) -> Self {
        Error::Camera(err)
    }
}

impl From<DetectorError> for Error {
    fn from(err: DetectorError) -> Self {
        Error::Detector(err)
    }
}

impl From<ExportError> for Error {
    fn from(err: ExportError) -> Self {
        Error::Export(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn catalog_request_failures_are_fetch_errors() {
        let err: Error = CatalogError::FetchFailed("timeout".into()).into();
        assert_eq!(err.category(), ErrorCategory::CatalogFetch);
        assert_eq!(
            err.user_message(),
            "Failed to load iris data. Please check your internet connection and try again."
        );

        let err: Error = CatalogError::Rejected.into();
        assert_eq!(err.category(), ErrorCategory::CatalogFetch);
    }

    #[test]
    fn image_failures_are_preload_errors() {
        let err: Error = CatalogError::TextureLoadFailed {
            url: "https://example.test/a.png".into(),
            reason: "404".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::TexturePreload);
        assert_eq!(
            err.user_message(),
            "Failed to load iris images. Please refresh and try again."
        );
    }

    #[test]
    fn camera_detector_and_export_categories() {
        let camera: Error = CameraError::NoVideoStream.into();
        let detector: Error = DetectorError::ModelNotFound("m.onnx".into()).into();
        let export: Error = ExportError::NoDestination.into();

        assert_eq!(camera.category(), ErrorCategory::Camera);
        assert!(camera.user_message().starts_with("Could not access camera"));
        assert_eq!(detector.category(), ErrorCategory::Detector);
        assert_eq!(export.category(), ErrorCategory::Export);
    }
}
