// SPDX-License-Identifier: MPL-2.0
//! `tiny-skia` adapter implementing the [`DrawSurface`] port trait.
//!
//! Clipping is done with an alpha [`Mask`]: the first clip fills a fresh
//! mask with the path, later clips intersect it. `save`/`restore` keep a
//! stack of `(mask, alpha)` pairs.
//!
//! [`DrawSurface`]: crate::application::port::DrawSurface

use crate::application::port::DrawSurface;
use crate::domain::frame::Frame;
use crate::domain::geometry::PixelPoint;
use crate::domain::landmark::LandmarkSet;
use crate::domain::texture::Texture;
use crate::media::compositor::{compose_frame, CompositeOutcome, Overlay};
use tiny_skia::{
    BlendMode, Color, FillRule, FilterQuality, Mask, Path, PathBuilder, Pixmap, PixmapPaint,
    PixmapRef, Transform,
};

#[derive(Clone)]
struct DrawState {
    clip: Option<Mask>,
    alpha: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            clip: None,
            alpha: 1.0,
        }
    }
}

/// Software canvas backed by a [`Pixmap`].
pub struct SkiaSurface {
    pixmap: Pixmap,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl SkiaSurface {
    /// Creates a transparent surface. Returns `None` for zero dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            pixmap: Pixmap::new(width, height)?,
            state: DrawState::default(),
            stack: Vec::new(),
        })
    }

    /// Reads the canvas back as straight RGBA.
    #[must_use]
    pub fn to_frame(&self) -> Frame {
        let mut rgba = Vec::with_capacity(self.pixmap.data().len());
        for pixel in self.pixmap.pixels() {
            let c = pixel.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Frame::from_rgba(self.pixmap.width(), self.pixmap.height(), rgba)
            .unwrap_or_else(|| Frame::filled(self.pixmap.width(), self.pixmap.height(), [0; 4]))
    }

    /// Depth of the save stack.
    #[must_use]
    pub fn saved_states(&self) -> usize {
        self.stack.len()
    }

    fn apply_clip(&mut self, path: Option<Path>) {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let Some(path) = path else {
            // Degenerate shape: nothing stays visible.
            self.state.clip = Mask::new(width, height);
            return;
        };

        match self.state.clip.as_mut() {
            Some(mask) => mask.intersect_path(&path, FillRule::Winding, true, Transform::identity()),
            None => {
                if let Some(mut mask) = Mask::new(width, height) {
                    mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
                    self.state.clip = Some(mask);
                }
            }
        }
    }
}

impl DrawSurface for SkiaSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    fn draw_frame(&mut self, frame: &Frame) {
        let Some(source) = PixmapRef::from_bytes(frame.rgba_bytes(), frame.width(), frame.height())
        else {
            return;
        };
        let sx = self.pixmap.width() as f32 / frame.width() as f32;
        let sy = self.pixmap.height() as f32 / frame.height() as f32;
        let paint = PixmapPaint {
            opacity: 1.0,
            blend_mode: BlendMode::Source,
            quality: FilterQuality::Nearest,
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            source,
            &paint,
            Transform::from_scale(sx, sy),
            None,
        );
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn clip_polygon(&mut self, points: &[PixelPoint]) {
        let path = (points.len() >= 3)
            .then(|| {
                let mut pb = PathBuilder::new();
                pb.move_to(points[0].x, points[0].y);
                for p in &points[1..] {
                    pb.line_to(p.x, p.y);
                }
                pb.close();
                pb.finish()
            })
            .flatten();
        self.apply_clip(path);
    }

    fn clip_circle(&mut self, center: PixelPoint, radius: f32) {
        self.apply_clip(PathBuilder::from_circle(center.x, center.y, radius));
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn draw_texture(&mut self, texture: &Texture, x: f32, y: f32, size: f32) {
        if size <= 0.0 {
            return;
        }
        let Some(source) = PixmapRef::from_bytes(
            texture.premultiplied_bytes(),
            texture.width(),
            texture.height(),
        ) else {
            return;
        };
        let transform = Transform::from_row(
            size / texture.width() as f32,
            0.0,
            0.0,
            size / texture.height() as f32,
            x,
            y,
        );
        let paint = PixmapPaint {
            opacity: self.state.alpha,
            blend_mode: BlendMode::SourceOver,
            quality: FilterQuality::Bilinear,
        };
        self.pixmap
            .draw_pixmap(0, 0, source, &paint, transform, self.state.clip.as_ref());
    }
}

/// Composites one frame on a fresh canvas of the frame's own size.
///
/// Returns `None` only for a zero-sized frame.
#[must_use]
pub fn render_composite(
    frame: &Frame,
    face: Option<&LandmarkSet>,
    overlay: &Overlay<'_>,
) -> Option<(Frame, CompositeOutcome)> {
    let mut surface = SkiaSurface::new(frame.width(), frame.height())?;
    let outcome = compose_frame(&mut surface, frame, face, overlay);
    Some((surface.to_frame(), outcome))
}
