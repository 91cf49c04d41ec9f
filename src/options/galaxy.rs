use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Procedural galaxy generation parameters.
///
/// Every field is tagged `on_finish` in the schema: the panel only sends
/// the value once a slider is released, since each change regenerates
/// the whole particle buffer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Galaxy", inline)]
#[serde(default)]
pub struct GalaxyOptions {
    /// Number of particles.
    #[schemars(
        title = "Particle Count",
        range(min = 100, max = 1_000_000),
        extend("step" = 100, "on_finish" = true)
    )]
    pub count: u32,
    /// Point size in world units (attenuated by distance).
    #[schemars(
        title = "Particle Size",
        range(min = 0.001, max = 0.1),
        extend("step" = 0.001, "on_finish" = true)
    )]
    pub size: f32,
    /// Outer radius of the disc.
    #[schemars(
        title = "Galaxy Radius",
        range(min = 0.01, max = 20.0),
        extend("step" = 0.01, "on_finish" = true)
    )]
    pub radius: f32,
    /// Number of spiral arms.
    #[schemars(
        title = "Branches",
        range(min = 2, max = 20),
        extend("step" = 1, "on_finish" = true)
    )]
    pub branches: u32,
    /// Extra angle per unit of radius; bends the arms into spirals.
    #[schemars(
        title = "Spin",
        range(min = -5.0, max = 5.0),
        extend("step" = 0.001, "on_finish" = true)
    )]
    pub spin: f32,
    /// Scatter of particles away from their arm.
    #[schemars(
        title = "Randomness",
        range(min = 0.0, max = 2.0),
        extend("step" = 0.001, "on_finish" = true)
    )]
    pub randomness: f32,
    /// Exponent shaping the scatter; higher keeps particles tighter to
    /// the arm.
    #[schemars(
        title = "Randomness Power",
        range(min = 1.0, max = 10.0),
        extend("step" = 0.001, "on_finish" = true)
    )]
    pub randomness_power: f32,
    /// Color at the galactic core.
    #[schemars(
        title = "Inside Color",
        extend("format" = "color", "on_finish" = true)
    )]
    pub inside_color: String,
    /// Color at the rim.
    #[schemars(
        title = "Outside Color",
        extend("format" = "color", "on_finish" = true)
    )]
    pub outside_color: String,
}

impl Default for GalaxyOptions {
    fn default() -> Self {
        Self {
            count: 100_000,
            size: 0.01,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 0.2,
            randomness_power: 3.0,
            inside_color: "#ff3000".to_owned(),
            outside_color: "#0b3cba".to_owned(),
        }
    }
}

impl GalaxyOptions {
    /// Copy of these options clamped into the ranges the panel allows.
    ///
    /// Values can come from a hand-edited preset file, so the generator
    /// never sees a zero count, radius or branch number.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            count: self.count.clamp(100, 1_000_000),
            size: self.size.clamp(0.001, 0.1),
            radius: self.radius.clamp(0.01, 20.0),
            branches: self.branches.clamp(2, 20),
            spin: self.spin.clamp(-5.0, 5.0),
            randomness: self.randomness.clamp(0.0, 2.0),
            randomness_power: self.randomness_power.clamp(1.0, 10.0),
            inside_color: self.inside_color.clone(),
            outside_color: self.outside_color.clone(),
        }
    }

    /// Parsed core color, falling back to the default on bad input.
    #[must_use]
    pub fn inside_rgb(&self) -> Rgb {
        parse_or_default(&self.inside_color, "#ff3000")
    }

    /// Parsed rim color, falling back to the default on bad input.
    #[must_use]
    pub fn outside_rgb(&self) -> Rgb {
        parse_or_default(&self.outside_color, "#0b3cba")
    }
}

fn parse_or_default(hex: &str, fallback: &str) -> Rgb {
    Rgb::from_hex(hex).unwrap_or_else(|| {
        log::warn!("invalid color '{hex}', using {fallback}");
        Rgb::from_hex(fallback).unwrap_or_default()
    })
}
