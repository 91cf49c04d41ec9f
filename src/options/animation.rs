use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-frame motion of the scene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Animation", inline)]
#[serde(default)]
pub struct AnimationOptions {
    /// Particle-system rotation about +Y, in radians per second.
    #[schemars(title = "Rotation Speed", range(min = -2.0, max = 2.0), extend("step" = 0.01))]
    pub rotation_speed: f32,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            rotation_speed: 0.1,
        }
    }
}
