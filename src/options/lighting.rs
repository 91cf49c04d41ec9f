use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ambient plus one directional light. The directional light is tinted
/// with the galaxy's inside color.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
pub struct LightingOptions {
    /// White ambient light intensity.
    #[schemars(title = "Ambient", range(min = 0.0, max = 2.0), extend("step" = 0.01))]
    pub ambient_intensity: f32,
    /// Directional light intensity.
    #[schemars(title = "Directional", range(min = 0.0, max = 3.0), extend("step" = 0.01))]
    pub directional_intensity: f32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.5,
            directional_intensity: 1.0,
        }
    }
}
