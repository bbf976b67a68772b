// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core types with ZERO external dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! It has no dependencies on external crates (except `std`) to ensure
//! testability and architectural purity.
//!
//! # Modules
//!
//! - [`landmark`]: Face mesh points ([`Landmark`](landmark::Landmark),
//!   [`LandmarkSet`](landmark::LandmarkSet), [`EyeSide`](landmark::EyeSide))
//! - [`geometry`]: Pixel-space eye geometry ([`IrisCircle`](geometry::IrisCircle))
//! - [`render`]: Overlay settings ([`Density`](render::Density),
//!   [`Opacity`](render::Opacity), [`EnlargementFactor`](render::EnlargementFactor))
//! - [`detection`]: Detector thresholds and the tracking [`Roi`](detection::Roi)
//! - [`capture`]: The capture [`Countdown`](capture::Countdown)
//! - [`frame`]: Camera [`Frame`](frame::Frame)s
//! - [`texture`]: Iris [`Texture`](texture::Texture)s and their
//!   [`TextureCatalog`](texture::TextureCatalog)

pub mod capture;
pub mod detection;
pub mod frame;
pub mod geometry;
pub mod landmark;
pub mod render;
pub mod texture;
