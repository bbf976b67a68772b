// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`. These adapters wrap external dependencies like `FFmpeg`,
//! ONNX Runtime, `tiny-skia`, `reqwest` and native dialogs.
//!
//! # Available Adapters
//!
//! - [`skia`]: Software canvas (implements [`DrawSurface`])
//! - [`ffmpeg`]: Camera or video file frames (implements [`FrameSource`])
//! - [`onnx`]: Face landmarks via ONNX Runtime (implements [`LandmarkDetector`])
//! - [`http`]: Catalog and image downloads (implements [`BlobFetcher`])
//! - [`share`]: Snapshot save dialog and download fallback (implements [`SnapshotSink`])
//!
//! [`DrawSurface`]: crate::application::port::DrawSurface
//! [`FrameSource`]: crate::application::port::FrameSource
//! [`LandmarkDetector`]: crate::application::port::LandmarkDetector
//! [`BlobFetcher`]: crate::application::port::BlobFetcher
//! [`SnapshotSink`]: crate::application::port::SnapshotSink

pub mod ffmpeg;
pub mod http;
pub mod onnx;
pub mod share;
pub mod skia;

// Re-export main types for convenience
pub use ffmpeg::FfmpegCamera;
pub use http::HttpFetcher;
pub use onnx::OnnxFaceMeshDetector;
pub use share::{DialogShare, DownloadShare, PlatformShare};
pub use skia::{render_composite, SkiaSurface};
