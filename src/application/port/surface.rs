// SPDX-License-Identifier: MPL-2.0
//! Drawing surface port definition.
//!
//! The compositor talks to a canvas-like surface with a save/restore state
//! stack. Clips accumulate (each new clip intersects the current one) and
//! the global alpha applies to image draws, until the matching `restore`.

use crate::domain::frame::Frame;
use crate::domain::geometry::PixelPoint;
use crate::domain::texture::Texture;

/// Port for a 2D drawing surface.
///
/// # Contract
///
/// - `save` pushes the current clip and alpha; `restore` pops them. A
///   `restore` without matching `save` is ignored.
/// - `clip_polygon` and `clip_circle` narrow the current clip region to its
///   intersection with the given shape.
/// - `draw_texture` paints `texture` scaled into the square
///   `(x, y, size, size)` using the current alpha and clip.
pub trait DrawSurface {
    /// Surface width in pixels.
    fn width(&self) -> u32;

    /// Surface height in pixels.
    fn height(&self) -> u32;

    /// Clears every pixel to transparent.
    fn clear(&mut self);

    /// Draws `frame` stretched over the whole surface, ignoring clip and alpha.
    fn draw_frame(&mut self, frame: &Frame);

    fn save(&mut self);

    fn restore(&mut self);

    /// Intersects the clip with the closed polygon through `points`.
    fn clip_polygon(&mut self, points: &[PixelPoint]);

    /// Intersects the clip with a circle.
    fn clip_circle(&mut self, center: PixelPoint, radius: f32);

    /// Sets the alpha multiplier for subsequent image draws.
    fn set_global_alpha(&mut self, alpha: f32);

    fn draw_texture(&mut self, texture: &Texture, x: f32, y: f32, size: f32);
}
