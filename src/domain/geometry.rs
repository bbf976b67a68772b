// SPDX-License-Identifier: MPL-2.0
//! Eye geometry in pixel space.
//!
//! Converts normalized landmarks into the pixel coordinates of a drawing
//! surface and estimates the circle used to paint an iris texture.

use super::landmark::{Landmark, IRIS_POINT_COUNT};
use super::render::EnlargementFactor;

/// A point in pixel coordinates of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

impl PixelPoint {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Projects a normalized landmark onto a `width` x `height` surface.
    #[must_use]
    pub fn from_landmark(landmark: &Landmark, width: f32, height: f32) -> Self {
        Self::new(landmark.x * width, landmark.y * height)
    }

    #[must_use]
    pub fn distance(self, other: PixelPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Circle covering one iris, in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrisCircle {
    pub center: PixelPoint,
    pub radius: f32,
}

impl IrisCircle {
    /// Side length of the square the texture is drawn into.
    #[must_use]
    pub fn diameter(&self) -> f32 {
        self.radius * 2.0
    }

    /// Top-left corner of the texture square.
    #[must_use]
    pub fn top_left(&self) -> PixelPoint {
        PixelPoint::new(self.center.x - self.radius, self.center.y - self.radius)
    }

    /// Estimates the iris circle from its boundary points.
    ///
    /// The centre is the centroid of the points, the radius the mean distance
    /// of each point to that centroid, both measured on a `width` x `height`
    /// surface, and the radius is then scaled by `enlargement`.
    ///
    /// Returns `None` when fewer than [`IRIS_POINT_COUNT`] points are given.
    #[must_use]
    pub fn from_boundary(
        points: &[Landmark],
        width: f32,
        height: f32,
        enlargement: EnlargementFactor,
    ) -> Option<Self> {
        if points.len() < IRIS_POINT_COUNT {
            return None;
        }

        let count = points.len() as f32;
        let (sum_x, sum_y) = points
            .iter()
            .fold((0.0_f32, 0.0_f32), |(sx, sy), p| (sx + p.x, sy + p.y));
        let center = PixelPoint::new(sum_x / count * width, sum_y / count * height);

        let mean_distance = points
            .iter()
            .map(|p| PixelPoint::from_landmark(p, width, height).distance(center))
            .sum::<f32>()
            / count;

        Some(Self {
            center,
            radius: mean_distance * enlargement.value(),
        })
    }
}

/// Projects a sequence of landmarks to pixel space.
#[must_use]
pub fn to_pixels(points: &[Landmark], width: f32, height: f32) -> Vec<PixelPoint> {
    points
        .iter()
        .map(|p| PixelPoint::from_landmark(p, width, height))
        .collect()
}
