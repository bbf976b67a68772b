// SPDX-License-Identifier: MPL-2.0
//! Facial landmark types.
//!
//! A landmark detector emits one [`LandmarkSet`] per detected face and frame:
//! an ordered sequence of points in normalized image coordinates, where
//! `(0.0, 0.0)` is the top-left corner and `(1.0, 1.0)` the bottom-right one.
//! The index layout follows the 478-point refined face mesh: 468 face points
//! followed by five points per iris.

use std::ops::Range;

/// Number of points in a face mesh without iris refinement.
pub const FACE_MESH_POINT_COUNT: usize = 468;

/// Number of points in a refined face mesh (face mesh plus both irises).
pub const REFINED_POINT_COUNT: usize = 478;

/// Number of points tracing one iris boundary.
pub const IRIS_POINT_COUNT: usize = 5;

/// Closed eyelid contour of the left eye, in drawing order.
pub const LEFT_EYELID_CONTOUR: [usize; 16] = [
    33, 246, 161, 160, 159, 158, 157, 173, 133, 155, 154, 153, 145, 144, 163, 7,
];

/// Closed eyelid contour of the right eye, in drawing order.
pub const RIGHT_EYELID_CONTOUR: [usize; 16] = [
    263, 466, 388, 387, 386, 385, 384, 398, 362, 382, 381, 380, 374, 373, 390, 249,
];

const LEFT_IRIS_RANGE: Range<usize> = 468..473;
const RIGHT_IRIS_RANGE: Range<usize> = 473..478;

/// A single landmark in normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Relative depth, roughly on the same scale as `x`.
    pub z: f32,
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Which eye a piece of geometry belongs to.
///
/// "Left" and "right" follow the face mesh convention (the subject's right
/// eye appears on the left of an unmirrored image).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EyeSide {
    Left,
    Right,
}

impl EyeSide {
    /// Both eyes, in drawing order.
    pub const BOTH: [EyeSide; 2] = [EyeSide::Left, EyeSide::Right];

    /// Landmark indices of the eyelid contour for this eye.
    #[must_use]
    pub fn eyelid_contour(self) -> &'static [usize; 16] {
        match self {
            EyeSide::Left => &LEFT_EYELID_CONTOUR,
            EyeSide::Right => &RIGHT_EYELID_CONTOUR,
        }
    }

    /// Landmark index range of the iris boundary for this eye.
    #[must_use]
    pub fn iris_range(self) -> Range<usize> {
        match self {
            EyeSide::Left => LEFT_IRIS_RANGE,
            EyeSide::Right => RIGHT_IRIS_RANGE,
        }
    }
}

/// The landmarks of one detected face for one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    #[must_use]
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Returns `true` if the set carries the refined iris points.
    #[must_use]
    pub fn has_irises(&self) -> bool {
        self.points.len() >= REFINED_POINT_COUNT
    }

    /// Iris boundary points for `side`.
    ///
    /// Returns whatever part of the iris range is present; a degraded
    /// detector may deliver fewer than [`IRIS_POINT_COUNT`] points.
    #[must_use]
    pub fn iris_points(&self, side: EyeSide) -> &[Landmark] {
        let range = side.iris_range();
        let end = range.end.min(self.points.len());
        let start = range.start.min(end);
        &self.points[start..end]
    }

    /// Eyelid contour points for `side`, or `None` if any index is missing.
    #[must_use]
    pub fn eyelid_contour(&self, side: EyeSide) -> Option<Vec<Landmark>> {
        side.eyelid_contour()
            .iter()
            .map(|&index| self.points.get(index).copied())
            .collect()
    }

    /// Normalized bounding box `(min_x, min_y, max_x, max_y)` of all points.
    #[must_use]
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        let first = self.points.first()?;
        let init = (first.x, first.y, first.x, first.y);
        Some(self.points.iter().fold(init, |(x0, y0, x1, y1), p| {
            (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y))
        }))
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(points: Vec<Landmark>) -> Self {
        Self::new(points)
    }
}
