// SPDX-License-Identifier: MPL-2.0
//! Shared helpers for unit tests.
//!
//! Re-exports the `approx` assertion macro for geometry and opacity checks,
//! where `assert_eq!` on `f32` is too strict.

pub use approx::assert_abs_diff_eq;

use crate::domain::landmark::{Landmark, LandmarkSet};

/// A landmark set of `count` points all placed at the same normalized spot.
#[must_use]
pub fn uniform_face(count: usize, x: f32, y: f32) -> LandmarkSet {
    LandmarkSet::new(vec![Landmark::new(x, y, 0.0); count])
}
