use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The textured sphere placed at half the galaxy radius.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Planet", inline)]
#[serde(default)]
pub struct PlanetOptions {
    /// Uniform scale applied to the unit sphere.
    #[schemars(title = "Scale", range(min = 0.05, max = 2.0), extend("step" = 0.01, "on_finish" = true))]
    pub scale: f32,
    /// Strength of the ambient-occlusion map.
    #[schemars(title = "AO Intensity", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub ao_intensity: f32,
    /// Vertex displacement along the normal, in unit-sphere units.
    #[schemars(title = "Displacement", range(min = 0.0, max = 0.5), extend("step" = 0.01))]
    pub displacement_scale: f32,
    /// Longitude/latitude segment count of the sphere mesh.
    #[schemars(title = "Segments", range(min = 8, max = 128), extend("step" = 1, "on_finish" = true))]
    pub segments: u32,
}

impl Default for PlanetOptions {
    fn default() -> Self {
        Self {
            scale: 0.3,
            ao_intensity: 0.1,
            displacement_scale: 0.0,
            segments: 32,
        }
    }
}
