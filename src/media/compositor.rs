// SPDX-License-Identifier: MPL-2.0
//! Per-frame iris overlay compositing.
//!
//! [`compose_frame`] is a pure function of its inputs: it draws the camera
//! frame onto a [`DrawSurface`] and, when a face and a texture are both
//! available, paints the texture over each iris. Everything it reads comes in
//! through its parameters; nothing is captured between calls.
//!
//! Per eye the overlay is clipped to the intersection of the eyelid contour
//! and the iris circle, so the texture never bleeds onto the lids when the
//! estimated circle is larger than the visible opening.

use crate::application::port::DrawSurface;
use crate::domain::frame::Frame;
use crate::domain::geometry::{to_pixels, IrisCircle};
use crate::domain::landmark::{EyeSide, LandmarkSet};
use crate::domain::render::{EnlargementFactor, Opacity};
use crate::domain::texture::Texture;

/// Overlay parameters read by value for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Overlay<'a> {
    /// The selected texture, if it is loaded.
    pub texture: Option<&'a Texture>,
    pub opacity: Opacity,
    pub enlargement: EnlargementFactor,
}

impl<'a> Overlay<'a> {
    #[must_use]
    pub fn new(texture: Option<&'a Texture>, opacity: Opacity, enlargement: EnlargementFactor) -> Self {
        Self {
            texture,
            opacity,
            enlargement,
        }
    }
}

/// What a call to [`compose_frame`] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompositeOutcome {
    /// A face was detected and a texture was available to overlay it.
    pub face_found: bool,
    /// Number of eyes the texture was actually painted on (0 to 2).
    pub eyes_drawn: u8,
}

/// Draws `frame` and the iris overlay for `face` onto `surface`.
///
/// The raw frame is always drawn. The overlay is skipped entirely when there
/// is no face or no texture, and per eye when fewer than five iris points
/// or an incomplete eyelid contour are available.
pub fn compose_frame<S: DrawSurface + ?Sized>(
    surface: &mut S,
    frame: &Frame,
    face: Option<&LandmarkSet>,
    overlay: &Overlay<'_>,
) -> CompositeOutcome {
    surface.clear();
    surface.draw_frame(frame);

    let (Some(face), Some(texture)) = (face, overlay.texture) else {
        return CompositeOutcome::default();
    };

    let eyes_drawn = EyeSide::BOTH
        .into_iter()
        .filter(|&side| draw_eye(surface, face, side, texture, overlay))
        .count();

    CompositeOutcome {
        face_found: true,
        eyes_drawn: eyes_drawn as u8,
    }
}

fn draw_eye<S: DrawSurface + ?Sized>(
    surface: &mut S,
    face: &LandmarkSet,
    side: EyeSide,
    texture: &Texture,
    overlay: &Overlay<'_>,
) -> bool {
    let width = surface.width() as f32;
    let height = surface.height() as f32;

    let Some(circle) = IrisCircle::from_boundary(
        face.iris_points(side),
        width,
        height,
        overlay.enlargement,
    ) else {
        return false;
    };
    let Some(contour) = face.eyelid_contour(side) else {
        return false;
    };
    let contour = to_pixels(&contour, width, height);
    let origin = circle.top_left();

    surface.save();
    surface.clip_polygon(&contour);
    surface.clip_circle(circle.center, circle.radius);
    surface.set_global_alpha(overlay.opacity.value());
    surface.draw_texture(texture, origin.x, origin.y, circle.diameter());
    surface.restore();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::PixelPoint;
    use crate::domain::landmark::{Landmark, REFINED_POINT_COUNT};
    use crate::domain::render::{Density, TextureId};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear,
        Frame,
        Save,
        Restore,
        ClipPolygon(usize),
        ClipCircle,
        Alpha(f32),
        Texture { size: f32 },
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn texture_draws(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Texture { .. }))
                .count()
        }
    }

    impl DrawSurface for Recorder {
        fn width(&self) -> u32 {
            640
        }
        fn height(&self) -> u32 {
            480
        }
        fn clear(&mut self) {
            self.calls.push(Call::Clear);
        }
        fn draw_frame(&mut self, _frame: &Frame) {
            self.calls.push(Call::Frame);
        }
        fn save(&mut self) {
            self.calls.push(Call::Save);
        }
        fn restore(&mut self) {
            self.calls.push(Call::Restore);
        }
        fn clip_polygon(&mut self, points: &[PixelPoint]) {
            self.calls.push(Call::ClipPolygon(points.len()));
        }
        fn clip_circle(&mut self, _center: PixelPoint, _radius: f32) {
            self.calls.push(Call::ClipCircle);
        }
        fn set_global_alpha(&mut self, alpha: f32) {
            self.calls.push(Call::Alpha(alpha));
        }
        fn draw_texture(&mut self, _texture: &Texture, _x: f32, _y: f32, size: f32) {
            self.calls.push(Call::Texture { size });
        }
    }

    fn texture() -> Texture {
        Texture::from_straight_rgba(TextureId::new("1"), "Blue", 2, 2, vec![0, 0, 255, 255].repeat(4))
            .expect("valid texture")
    }

    fn face(point_count: usize) -> LandmarkSet {
        (0..point_count)
            .map(|i| {
                let t = i as f32 * 0.37;
                Landmark::new(0.5 + 0.05 * t.cos(), 0.5 + 0.05 * t.sin(), 0.0)
            })
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn raw_frame_is_drawn_without_face() {
        let mut surface = Recorder::default();
        let tex = texture();
        let overlay = Overlay::new(Some(&tex), Density::Medium.opacity(), EnlargementFactor::default());

        let outcome = compose_frame(&mut surface, &Frame::filled(4, 4, [0, 0, 0, 255]), None, &overlay);

        assert_eq!(surface.calls, vec![Call::Clear, Call::Frame]);
        assert!(!outcome.face_found);
    }

    #[test]
    fn missing_texture_skips_overlay() {
        let mut surface = Recorder::default();
        let overlay = Overlay::new(None, Opacity::default(), EnlargementFactor::default());

        let outcome = compose_frame(
            &mut surface,
            &Frame::filled(4, 4, [0, 0, 0, 255]),
            Some(&face(REFINED_POINT_COUNT)),
            &overlay,
        );

        assert_eq!(surface.texture_draws(), 0);
        assert_eq!(outcome, CompositeOutcome::default());
    }

    #[test]
    fn both_eyes_follow_clip_then_draw_order() {
        let mut surface = Recorder::default();
        let tex = texture();
        let overlay = Overlay::new(Some(&tex), Density::High.opacity(), EnlargementFactor::default());

        let outcome = compose_frame(
            &mut surface,
            &Frame::filled(4, 4, [0, 0, 0, 255]),
            Some(&face(REFINED_POINT_COUNT)),
            &overlay,
        );

        assert_eq!(outcome.eyes_drawn, 2);
        assert!(outcome.face_found);
        let per_eye = &surface.calls[2..8];
        assert_eq!(per_eye[0], Call::Save);
        assert_eq!(per_eye[1], Call::ClipPolygon(16));
        assert_eq!(per_eye[2], Call::ClipCircle);
        assert_eq!(per_eye[3], Call::Alpha(0.7));
        assert!(matches!(per_eye[4], Call::Texture { size } if size > 0.0));
        assert_eq!(per_eye[5], Call::Restore);
        assert_eq!(surface.calls.len(), 2 + 2 * 6);
    }

    #[test]
    fn unrefined_landmarks_draw_nothing() {
        let mut surface = Recorder::default();
        let tex = texture();
        let overlay = Overlay::new(Some(&tex), Opacity::default(), EnlargementFactor::default());

        let outcome = compose_frame(
            &mut surface,
            &Frame::filled(4, 4, [0, 0, 0, 255]),
            Some(&face(468)),
            &overlay,
        );

        assert_eq!(surface.texture_draws(), 0);
        assert!(!surface.calls.contains(&Call::Save));
        assert!(outcome.face_found);
        assert_eq!(outcome.eyes_drawn, 0);
    }

    #[test]
    fn partial_second_iris_draws_only_first_eye() {
        let mut surface = Recorder::default();
        let tex = texture();
        let overlay = Overlay::new(Some(&tex), Opacity::default(), EnlargementFactor::default());

        let outcome = compose_frame(
            &mut surface,
            &Frame::filled(4, 4, [0, 0, 0, 255]),
            Some(&face(476)),
            &overlay,
        );

        assert_eq!(surface.texture_draws(), 1);
        assert_eq!(outcome.eyes_drawn, 1);
    }
}
