//! Centralized generation/display options with TOML preset support.
//!
//! All tweakable settings (galaxy generation, planet, lighting, animation,
//! camera, keybindings, debug toggles) are consolidated here. Options
//! serialize to/from TOML, and their JSON schema drives the options panel.

mod animation;
mod camera;
mod debug;
pub mod fields;
mod galaxy;
mod lighting;
mod planet;

use std::path::Path;

pub use animation::AnimationOptions;
pub use camera::CameraOptions;
pub use debug::DebugOptions;
pub use fields::{FieldKind, FieldSpec, SectionSpec};
pub use galaxy::GalaxyOptions;
pub use lighting::LightingOptions;
pub use planet::PlanetOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::GalaxyError;
use crate::input::KeyBindings;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[galaxy]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Galaxy generation parameters.
    pub galaxy: GalaxyOptions,
    /// Planet sphere parameters.
    pub planet: PlanetOptions,
    /// Light intensities.
    pub lighting: LightingOptions,
    /// Scene motion.
    pub animation: AnimationOptions,
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeyBindings,
    /// Debug overlay options.
    pub debug: DebugOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GalaxyError::Io`] if the file cannot be read and
    /// [`GalaxyError::OptionsParse`] if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, GalaxyError> {
        let content = std::fs::read_to_string(path).map_err(GalaxyError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GalaxyError::OptionsParse`] on malformed TOML.
    pub fn from_toml(content: &str) -> Result<Self, GalaxyError> {
        toml::from_str(content)
            .map_err(|e| GalaxyError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`GalaxyError`] on serialization or I/O failure.
    pub fn save(&self, path: &Path) -> Result<(), GalaxyError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GalaxyError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(GalaxyError::Io)?;
        }
        std::fs::write(path, content).map_err(GalaxyError::Io)
    }

    /// The panel's view of the options: sections and their editable
    /// fields, read from [`Self::json_schema`].
    #[must_use]
    pub fn panel_sections() -> Vec<SectionSpec> {
        fields::sections(Self::json_schema().as_value())
    }

    /// Apply a single `section.field = value` edit coming from the options
    /// panel. Returns `None` if the field is not exposed in the schema, the
    /// value is outside the field's range, or it does not deserialize into
    /// the field's type.
    #[must_use]
    pub fn with_field(
        &self,
        section: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Option<Self> {
        let accepted = Self::panel_sections()
            .iter()
            .find(|s| s.key == section)
            .and_then(|s| s.field(field))
            .is_some_and(|spec| spec.accepts(&value));
        if !accepted {
            return None;
        }
        let mut root = serde_json::to_value(self).ok()?;
        let slot = root.get_mut(section)?.get_mut(field)?;
        *slot = value;
        serde_json::from_value(root).ok()
    }

    /// Whether switching from `self` to `other` requires regenerating the
    /// particle buffers and planet mesh. Planet scale only moves the
    /// planet's transform and does not count.
    #[must_use]
    pub fn needs_regeneration(&self, other: &Self) -> bool {
        self.galaxy != other.galaxy || self.planet.segments != other.planet.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r##"
[galaxy]
count = 5000
inside_color = "#00ff00"
"##;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.galaxy.count, 5000);
        assert_eq!(opts.galaxy.inside_color, "#00ff00");
        // Everything else should be default
        assert_eq!(opts.galaxy.branches, 3);
        assert_eq!(opts.galaxy.outside_color, "#0b3cba");
        assert_eq!(opts.camera.fovy, 75.0);
        assert_eq!(opts.animation.rotation_speed, 0.1);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[galaxy\ncount = ").unwrap_err();
        assert!(matches!(err, GalaxyError::OptionsParse(_)));
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!(
            "galaxy-options-test-{}",
            std::process::id()
        ));
        let path = dir.join("preset.toml");
        let mut opts = Options::default();
        opts.galaxy.spin = -2.5;
        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        assert_eq!(loaded, opts);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn with_field_edits_one_value() {
        let opts = Options::default();
        let edited = opts
            .with_field("galaxy", "branches", serde_json::json!(7))
            .unwrap();
        assert_eq!(edited.galaxy.branches, 7);
        assert_eq!(edited.galaxy.count, opts.galaxy.count);
        assert!(opts.needs_regeneration(&edited));
    }

    #[test]
    fn with_field_rejects_unknown_or_mistyped() {
        let opts = Options::default();
        assert!(opts
            .with_field("nope", "branches", serde_json::json!(7))
            .is_none());
        assert!(opts
            .with_field("galaxy", "nope", serde_json::json!(7))
            .is_none());
        assert!(opts
            .with_field("galaxy", "branches", serde_json::json!("many"))
            .is_none());
    }

    #[test]
    fn with_field_rejects_out_of_range() {
        let opts = Options::default();
        let edit = |section: &str, field: &str, value| {
            opts.with_field(section, field, value)
        };
        assert!(edit("galaxy", "count", serde_json::json!(0)).is_none());
        assert!(edit("galaxy", "branches", serde_json::json!(1)).is_none());
        assert!(edit("galaxy", "randomness", serde_json::json!(2.5)).is_none());
        assert!(edit("galaxy", "inside_color", serde_json::json!("red")).is_none());
        assert!(edit("planet", "segments", serde_json::json!(512)).is_none());
        // Not exposed in the panel.
        assert!(edit("camera", "znear", serde_json::json!(0.5)).is_none());

        let edited = edit("galaxy", "count", serde_json::json!(100)).unwrap();
        assert_eq!(edited.galaxy, edited.galaxy.sanitized());
    }

    #[test]
    fn planet_scale_does_not_regenerate() {
        let opts = Options::default();
        let edited = opts
            .with_field("planet", "scale", serde_json::json!(0.6))
            .unwrap();
        assert_eq!(edited.planet.scale, 0.6);
        assert!(!opts.needs_regeneration(&edited));

        let finer = opts
            .with_field("planet", "segments", serde_json::json!(64))
            .unwrap();
        assert!(opts.needs_regeneration(&finer));
    }

    #[test]
    fn lighting_change_does_not_regenerate() {
        let opts = Options::default();
        let edited = opts
            .with_field(
                "lighting",
                "ambient_intensity",
                serde_json::json!(1.2),
            )
            .unwrap();
        assert!(!opts.needs_regeneration(&edited));
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("galaxy"));
        assert!(props.contains_key("planet"));
        assert!(props.contains_key("lighting"));
        assert!(props.contains_key("camera"));
        assert!(!props.contains_key("keybindings"));

        let galaxy = &props["galaxy"]["properties"];
        assert_eq!(galaxy["count"]["minimum"], 100);
        assert_eq!(galaxy["count"]["maximum"], 1_000_000);
        assert_eq!(galaxy["branches"]["minimum"], 2);
        assert_eq!(galaxy["randomness_power"]["minimum"], 1.0);
        assert_eq!(galaxy["inside_color"]["format"], "color");
        assert_eq!(galaxy["spin"]["on_finish"], true);

        let camera = &props["camera"]["properties"];
        assert!(camera.get("fovy").is_some());
        assert!(camera.get("znear").is_none());
    }

    #[test]
    fn sanitized_clamps_degenerate_values() {
        let mut g = GalaxyOptions::default();
        g.count = 0;
        g.branches = 0;
        g.radius = 0.0;
        g.randomness_power = 0.0;
        let s = g.sanitized();
        assert_eq!(s.count, 100);
        assert_eq!(s.branches, 2);
        assert_eq!(s.radius, 0.01);
        assert_eq!(s.randomness_power, 1.0);
    }

    #[test]
    fn bad_color_falls_back() {
        let mut g = GalaxyOptions::default();
        g.inside_color = "not a color".to_owned();
        assert_eq!(g.inside_rgb().to_hex(), "#ff3000");
    }
}
