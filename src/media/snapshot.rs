// SPDX-License-Identifier: MPL-2.0
//! Still snapshots of the composited canvas.

use crate::application::port::ExportError;
use crate::domain::frame::Frame;
use image_rs::{ImageBuffer, ImageFormat, Rgba};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

/// Fixed filename used when the snapshot is downloaded without a dialog.
pub const DEFAULT_FILE_NAME: &str = "saglamgoz.png";

/// A frozen copy of the canvas, kept both as pixels (for display) and as a
/// PNG blob (for sharing).
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    frame: Frame,
    png: Arc<Vec<u8>>,
}

impl Snapshot {
    /// Freezes `canvas` into a PNG snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::EncodingFailed`] if PNG encoding fails.
    pub fn capture(canvas: &Frame) -> Result<Self, ExportError> {
        let png = encode_png(canvas)?;
        Ok(Self {
            frame: canvas.clone(),
            png: Arc::new(png),
        })
    }

    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    /// Encoded PNG bytes.
    #[must_use]
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    #[must_use]
    pub fn png_arc(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.png)
    }

    /// Writes the PNG blob to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] if the file cannot be written.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        std::fs::write(path, self.png.as_slice()).map_err(|e| ExportError::Io(e.to_string()))
    }
}

/// Encodes an RGBA frame as PNG.
///
/// # Errors
///
/// Returns [`ExportError::EncodingFailed`] if the buffer is inconsistent or
/// the encoder fails.
pub fn encode_png(frame: &Frame) -> Result<Vec<u8>, ExportError> {
    let buffer = ImageBuffer::<Rgba<u8>, _>::from_raw(
        frame.width(),
        frame.height(),
        frame.rgba_bytes().to_vec(),
    )
    .ok_or_else(|| ExportError::EncodingFailed("Invalid frame buffer".to_string()))?;

    let mut bytes = Cursor::new(Vec::new());
    buffer
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(|e| ExportError::EncodingFailed(e.to_string()))?;
    Ok(bytes.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn capture_produces_decodable_png() {
        let canvas = Frame::filled(8, 6, [200, 100, 50, 255]);

        let snapshot = Snapshot::capture(&canvas).expect("encode");

        assert!(snapshot.png_bytes().starts_with(b"\x89PNG"));
        let decoded = image_rs::load_from_memory(snapshot.png_bytes())
            .expect("decode")
            .to_rgba8();
        assert_eq!(decoded.dimensions(), (8, 6));
        assert_eq!(decoded.get_pixel(3, 3).0, [200, 100, 50, 255]);
    }

    #[test]
    fn save_writes_png_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(DEFAULT_FILE_NAME);
        let snapshot = Snapshot::capture(&Frame::filled(2, 2, [0, 0, 0, 255])).expect("encode");

        snapshot.save_to_file(&path).expect("save");

        let written = std::fs::read(&path).expect("read back");
        assert_eq!(written, snapshot.png_bytes());
    }
}
