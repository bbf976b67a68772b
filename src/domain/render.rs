// SPDX-License-Identifier: MPL-2.0
//! Render configuration value objects.
//!
//! These types describe what the compositor paints on every frame: which
//! texture, how opaque, and how far the iris circle is enlarged.

use std::fmt;

// =============================================================================
// Opacity
// =============================================================================

/// Alpha applied to the iris texture, always in `(0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opacity(f32);

impl Opacity {
    /// Smallest representable opacity; zero would make the overlay a no-op.
    pub const MIN: f32 = 0.01;

    /// Creates an opacity, clamping into `[MIN, 1.0]`. NaN becomes opaque.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(1.0);
        }
        Self(value.clamp(Self::MIN, 1.0))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Density::default().opacity()
    }
}

// =============================================================================
// Density
// =============================================================================

/// User-facing opacity level of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Density {
    Low,
    #[default]
    Medium,
    High,
}

impl Density {
    pub const ALL: [Density; 3] = [Density::Low, Density::Medium, Density::High];

    /// Raw opacity value behind each level.
    #[must_use]
    pub fn value(self) -> f32 {
        match self {
            Density::Low => 0.2,
            Density::Medium => 0.4,
            Density::High => 0.7,
        }
    }

    #[must_use]
    pub fn opacity(self) -> Opacity {
        Opacity::new(self.value())
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Density::Low => "Low",
            Density::Medium => "Medium",
            Density::High => "High",
        }
    }

    /// Maps a raw density value to its level: `0.2` is low, `0.4` is medium,
    /// anything else is high.
    #[must_use]
    pub fn from_value(value: f32) -> Self {
        const TOLERANCE: f32 = 1e-6;
        if (value - Density::Low.value()).abs() < TOLERANCE {
            Density::Low
        } else if (value - Density::Medium.value()).abs() < TOLERANCE {
            Density::Medium
        } else {
            Density::High
        }
    }

    /// Parses the lowercase config spelling (`low`, `medium`, `high`).
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Density::Low),
            "medium" => Some(Density::Medium),
            "high" => Some(Density::High),
            _ => None,
        }
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Density::Low => "low",
            Density::Medium => "medium",
            Density::High => "high",
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// EnlargementFactor
// =============================================================================

/// Enlargement factor bounds.
pub mod enlargement_bounds {
    pub const MIN: f32 = 1.0;
    pub const MAX: f32 = 3.0;
    pub const DEFAULT: f32 = 1.45;
}

/// Factor applied to the measured iris radius so the texture covers the
/// visible iris plus a margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnlargementFactor(f32);

impl EnlargementFactor {
    /// Creates a factor, clamping into the supported range.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(enlargement_bounds::MIN, enlargement_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for EnlargementFactor {
    fn default() -> Self {
        Self(enlargement_bounds::DEFAULT)
    }
}

// =============================================================================
// TextureId / RenderConfig
// =============================================================================

/// Identifier of a catalog texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(String);

impl TextureId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The user's current overlay choice, read by value on every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub texture: Option<TextureId>,
    pub density: Density,
    pub enlargement: EnlargementFactor,
}

impl RenderConfig {
    #[must_use]
    pub fn opacity(&self) -> Opacity {
        self.density.opacity()
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            texture: None,
            density: Density::default(),
            enlargement: EnlargementFactor::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_labels_follow_raw_values() {
        assert_eq!(Density::from_value(0.2).label(), "Low");
        assert_eq!(Density::from_value(0.4).label(), "Medium");
        assert_eq!(Density::from_value(0.7).label(), "High");
        assert_eq!(Density::from_value(0.55).label(), "High");
        assert_eq!(Density::from_value(1.0).label(), "High");
    }

    #[test]
    fn density_values_round_trip_through_labels() {
        for density in Density::ALL {
            assert_eq!(Density::from_value(density.value()), density);
            assert_eq!(Density::from_key(density.key()), Some(density));
        }
        assert_eq!(Density::from_key(" HIGH "), Some(Density::High));
        assert_eq!(Density::from_key("dense"), None);
    }

    #[test]
    fn default_density_is_medium() {
        assert_eq!(Density::default(), Density::Medium);
        assert_eq!(Opacity::default().value(), 0.4);
    }

    #[test]
    fn opacity_stays_in_open_unit_interval() {
        assert_eq!(Opacity::new(0.0).value(), Opacity::MIN);
        assert_eq!(Opacity::new(-3.0).value(), Opacity::MIN);
        assert_eq!(Opacity::new(2.0).value(), 1.0);
        assert_eq!(Opacity::new(f32::NAN).value(), 1.0);
    }

    #[test]
    fn enlargement_factor_is_clamped() {
        assert_eq!(EnlargementFactor::default().value(), 1.45);
        assert_eq!(EnlargementFactor::new(0.2).value(), enlargement_bounds::MIN);
        assert_eq!(EnlargementFactor::new(9.0).value(), enlargement_bounds::MAX);
    }

    #[test]
    fn render_config_opacity_tracks_density() {
        let config = RenderConfig {
            density: Density::High,
            ..RenderConfig::default()
        };
        assert_eq!(config.opacity().value(), 0.7);
    }
}
