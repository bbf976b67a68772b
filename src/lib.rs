// SPDX-License-Identifier: MPL-2.0
//! `iris_lens` is a live webcam mirror that paints a selectable iris texture
//! over the user's eyes and lets them capture and share a snapshot.
//!
//! The crate follows a layered layout:
//!
//! - [`domain`]: landmarks, eye geometry and overlay value objects
//! - [`application`]: port traits for the drawing surface, camera, detector,
//!   catalog fetch and snapshot sharing
//! - [`media`]: the frame compositor, catalog loader, face mesh model,
//!   tracking worker and snapshot encoding
//! - [`infrastructure`]: `tiny-skia`, `FFmpeg`, ONNX Runtime, `reqwest` and
//!   `rfd` adapters
//! - [`diagnostics`]: bounded in-memory event log, exportable as JSON
//! - [`app`]: the Iced application and its session state machine

#![doc(html_root_url = "https://docs.rs/iris_lens/0.1.0")]

pub mod app;
pub mod application;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod media;

#[cfg(test)]
pub(crate) mod test_utils;
