//! Options methods for GalaxyEngine

use super::GalaxyEngine;
use crate::options::Options;

impl GalaxyEngine {
    /// Replace options and apply all changes to subsystems. Galaxy or
    /// planet-geometry changes regenerate the scene.
    pub fn set_options(&mut self, new: Options) {
        let regenerate = self.options.needs_regeneration(&new);
        self.options = new;
        self.apply_options();
        if regenerate {
            self.regenerate();
        }
    }

    /// Apply one `section.field = value` edit from the options panel.
    /// Returns `false` (and logs) if the edit does not fit the options.
    pub fn set_option(
        &mut self,
        section: &str,
        field: &str,
        value: serde_json::Value,
    ) -> bool {
        match self.options.with_field(section, field, value) {
            Some(new) => {
                self.set_options(new);
                true
            }
            None => {
                log::warn!("rejected option edit {section}.{field}");
                false
            }
        }
    }

    /// Push current option values to the camera, lights, planet placement
    /// and key bindings.
    pub(super) fn apply_options(&mut self) {
        self.camera.apply_options(&self.options.camera);
        self.scene.refresh(&self.options);
        self.input
            .set_key_bindings(self.options.keybindings.clone());
    }
}
