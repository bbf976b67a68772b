// SPDX-License-Identifier: MPL-2.0
//! Raw video frame type.

use std::sync::Arc;

/// One camera frame as tightly packed RGBA bytes.
///
/// Camera frames are opaque, so the bytes are valid both as straight and as
/// premultiplied RGBA.
///
/// # Example
///
/// ```
/// use iris_lens::domain::frame::Frame;
///
/// let frame = Frame::filled(4, 2, [10, 20, 30, 255]);
/// assert_eq!(frame.rgba_bytes().len(), 4 * 2 * 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    rgba_bytes: Arc<Vec<u8>>,
}

impl Frame {
    /// Creates a frame from shared RGBA data.
    ///
    /// Returns `None` if the data length doesn't match `width * height * 4`.
    #[must_use]
    pub fn new(width: u32, height: u32, rgba_bytes: Arc<Vec<u8>>) -> Option<Self> {
        let expected_len = (width as usize) * (height as usize) * 4;
        (rgba_bytes.len() == expected_len).then_some(Self {
            width,
            height,
            rgba_bytes,
        })
    }

    /// Creates a frame from owned RGBA data.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, rgba_bytes: Vec<u8>) -> Option<Self> {
        Self::new(width, height, Arc::new(rgba_bytes))
    }

    /// Creates a frame where every pixel has the same colour.
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = (width as usize) * (height as usize);
        let data = rgba.repeat(pixels);
        Self {
            width,
            height,
            rgba_bytes: Arc::new(data),
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }

    #[must_use]
    pub fn rgba_bytes_arc(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.rgba_bytes)
    }

    /// RGBA value of the pixel at `(x, y)`, if inside the frame.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let px = &self.rgba_bytes[offset..offset + 4];
        Some([px[0], px[1], px[2], px[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_length() {
        assert!(Frame::from_rgba(2, 2, vec![0; 15]).is_none());
        assert!(Frame::from_rgba(2, 2, vec![0; 16]).is_some());
    }

    #[test]
    fn pixel_lookup_is_row_major() {
        let mut data = vec![0u8; 3 * 2 * 4];
        data[(1 * 3 + 2) * 4] = 99;
        let frame = Frame::from_rgba(3, 2, data).unwrap();
        assert_eq!(frame.pixel(2, 1).map(|p| p[0]), Some(99));
        assert_eq!(frame.pixel(3, 0), None);
    }
}
