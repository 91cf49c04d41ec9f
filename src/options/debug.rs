use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Debug overlay toggles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Debug", inline)]
#[serde(default)]
pub struct DebugOptions {
    /// Show frame rate and particle count in the panel.
    #[schemars(title = "Show Stats")]
    pub show_stats: bool,
}

impl Default for DebugOptions {
    fn default() -> Self {
        Self { show_stats: true }
    }
}
