// SPDX-License-Identifier: MPL-2.0
//! Overlay pipeline: catalog loading, compositing, landmark model, tracking
//! and snapshots.
//!
//! - [`catalog`]: remote texture catalog with all-or-nothing preload
//! - [`compositor`]: per-frame iris overlay drawing
//! - [`face_mesh`]: face landmark model lifecycle and tensor conversion
//! - [`tracking`]: camera + detector worker thread
//! - [`snapshot`]: PNG snapshots of the composited canvas

pub mod catalog;
pub mod compositor;
pub mod face_mesh;
pub mod snapshot;
pub mod tracking;

pub use compositor::{compose_frame, CompositeOutcome, Overlay};
pub use snapshot::Snapshot;
pub use tracking::{TrackedFrame, TrackingEvent, TrackingHandle};
