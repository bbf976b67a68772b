// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only domain types, ensuring the application layer remains
//! independent of concrete implementations.
//!
//! # Available Ports
//!
//! - [`surface`]: 2D drawing surface used by the compositor
//! - [`detector`]: Face landmark detection
//! - [`camera`]: Sequential camera frames
//! - [`catalog`]: Remote bytes for the texture catalog
//! - [`share`]: Snapshot save/share targets
//!
//! # Design Notes
//!
//! - Traits use domain types only (no Iced handles, no `FFmpeg` or ONNX types)
//! - Blocking ports (`camera`, `detector`) run on the tracking thread
//! - Network and dialog ports return futures so callers can wrap them in
//!   Iced `Task`s

pub mod camera;
pub mod catalog;
pub mod detector;
pub mod share;
pub mod surface;

// Re-export main types for convenience
pub use camera::{CameraError, FrameSource};
pub use catalog::{BlobFetcher, CatalogError};
pub use detector::{DetectorError, LandmarkDetector};
pub use share::{ExportError, ShareOutcome, SnapshotSink};
pub use surface::DrawSurface;
