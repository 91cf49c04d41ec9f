//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns all transient input state (cursor tracking,
//! held buttons, modifier keys) and the key-binding map. It sits between
//! raw window events and the engine's
//! [`execute`](crate::GalaxyEngine::execute) method.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::{InputEvent, MouseButton};
use crate::engine::command::GalaxyCommand;

/// Maps physical key strings to [`GalaxyCommand`] variants.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format, which
/// matches the DOM `KeyboardEvent.code` values: `"KeyR"`, `"KeyC"`, etc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → command tag.
    bindings: HashMap<String, KeyCommandTag>,
}

/// Serializable tag for the subset of [`GalaxyCommand`] that can be
/// key-bound (discrete, parameterless actions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Regenerate the galaxy with a fresh random seed.
    Regenerate,
    /// Put the camera back at its starting position.
    ResetCamera,
    /// Show or hide the options panel.
    TogglePanel,
}

impl KeyCommandTag {
    /// Convert to the corresponding parameterless [`GalaxyCommand`].
    fn to_command(self) -> GalaxyCommand {
        match self {
            Self::Regenerate => GalaxyCommand::Regenerate,
            Self::ResetCamera => GalaxyCommand::ResetCamera,
            Self::TogglePanel => GalaxyCommand::TogglePanel,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
        };
        bindings.bind("KeyR", KeyCommandTag::Regenerate);
        bindings.bind("KeyC", KeyCommandTag::ResetCamera);
        bindings.bind("Backslash", KeyCommandTag::TogglePanel);
        bindings
    }
}

impl KeyBindings {
    /// Look up the command for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<GalaxyCommand> {
        self.bindings.get(key).map(|tag| tag.to_command())
    }

    /// Bind `key` to `tag`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: impl Into<String>, tag: KeyCommandTag) {
        let _ = self.bindings.insert(key.into(), tag);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InputProcessor
// ─────────────────────────────────────────────────────────────────────────────

/// Converts raw window events into [`GalaxyCommand`]s.
///
/// Left drag orbits, right drag (or shift + left drag) pans, and the
/// wheel zooms.
pub struct InputProcessor {
    /// Last cursor position in physical pixels (`None` before the first
    /// move, so the first delta is zero).
    mouse_pos: Option<Vec2>,
    /// Whether the left button is held.
    left_pressed: bool,
    /// Whether the right button is held.
    right_pressed: bool,
    /// Whether the shift modifier is held.
    shift_pressed: bool,
    /// Key string → command mapping.
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_key_bindings(KeyBindings::default())
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            mouse_pos: None,
            left_pressed: false,
            right_pressed: false,
            shift_pressed: false,
            key_bindings,
        }
    }

    /// Replace the key bindings (e.g. after loading an options file).
    pub fn set_key_bindings(&mut self, key_bindings: KeyBindings) {
        self.key_bindings = key_bindings;
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<GalaxyCommand> {
        self.key_bindings.lookup(key)
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<GalaxyCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(x, y),
            InputEvent::MouseButton { button, pressed } => {
                match button {
                    MouseButton::Left => self.left_pressed = pressed,
                    MouseButton::Right => self.right_pressed = pressed,
                    MouseButton::Middle => {}
                }
                None
            }
            InputEvent::Scroll { delta } => Some(GalaxyCommand::Zoom { delta }),
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                None
            }
        }
    }

    /// Cursor moved: compute the delta and produce a camera command while
    /// a button is held.
    fn handle_cursor_moved(&mut self, x: f32, y: f32) -> Option<GalaxyCommand> {
        let pos = Vec2::new(x, y);
        let delta = self.mouse_pos.map_or(Vec2::ZERO, |last| pos - last);
        self.mouse_pos = Some(pos);

        if delta == Vec2::ZERO {
            return None;
        }
        if self.right_pressed || (self.left_pressed && self.shift_pressed) {
            return Some(GalaxyCommand::PanCamera { delta });
        }
        if self.left_pressed {
            return Some(GalaxyCommand::RotateCamera { delta });
        }
        None
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::CursorMoved { x, y }
    }

    #[test]
    fn hover_without_buttons_does_nothing() {
        let mut p = InputProcessor::new();
        assert_eq!(p.handle_event(moved(10.0, 10.0)), None);
        assert_eq!(p.handle_event(moved(20.0, 15.0)), None);
    }

    #[test]
    fn left_drag_rotates() {
        let mut p = InputProcessor::new();
        let _ = p.handle_event(moved(10.0, 10.0));
        let _ = p.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        assert_eq!(
            p.handle_event(moved(14.0, 7.0)),
            Some(GalaxyCommand::RotateCamera {
                delta: Vec2::new(4.0, -3.0)
            })
        );
    }

    #[test]
    fn shift_drag_and_right_drag_pan() {
        let mut p = InputProcessor::new();
        let _ = p.handle_event(moved(0.0, 0.0));
        let _ = p.handle_event(InputEvent::ModifiersChanged { shift: true });
        let _ = p.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        assert!(matches!(
            p.handle_event(moved(1.0, 0.0)),
            Some(GalaxyCommand::PanCamera { .. })
        ));

        let mut p = InputProcessor::new();
        let _ = p.handle_event(moved(0.0, 0.0));
        let _ = p.handle_event(InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed: true,
        });
        assert!(matches!(
            p.handle_event(moved(0.0, 2.0)),
            Some(GalaxyCommand::PanCamera { .. })
        ));
    }

    #[test]
    fn release_stops_drag() {
        let mut p = InputProcessor::new();
        let _ = p.handle_event(moved(0.0, 0.0));
        let _ = p.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        let _ = p.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        });
        assert_eq!(p.handle_event(moved(5.0, 5.0)), None);
    }

    #[test]
    fn scroll_zooms() {
        let mut p = InputProcessor::new();
        assert_eq!(
            p.handle_event(InputEvent::Scroll { delta: 1.5 }),
            Some(GalaxyCommand::Zoom { delta: 1.5 })
        );
    }

    #[test]
    fn default_key_bindings() {
        let p = InputProcessor::new();
        assert_eq!(p.handle_key_press("KeyR"), Some(GalaxyCommand::Regenerate));
        assert_eq!(p.handle_key_press("KeyC"), Some(GalaxyCommand::ResetCamera));
        assert_eq!(
            p.handle_key_press("Backslash"),
            Some(GalaxyCommand::TogglePanel)
        );
        assert_eq!(p.handle_key_press("KeyZ"), None);
    }

    #[test]
    fn panel_toggle_can_be_rebound_from_toml() {
        let options = crate::options::Options::from_toml(
            r#"
[keybindings.bindings]
KeyP = "toggle_panel"
KeyR = "regenerate"
"#,
        )
        .unwrap();
        let p = InputProcessor::with_key_bindings(options.keybindings);
        assert_eq!(p.handle_key_press("KeyP"), Some(GalaxyCommand::TogglePanel));
        assert_eq!(p.handle_key_press("Backslash"), None);
    }

    #[test]
    fn rebinding_replaces_key() {
        let mut bindings = KeyBindings::default();
        bindings.bind("KeyG", KeyCommandTag::Regenerate);
        assert_eq!(bindings.lookup("KeyG"), Some(GalaxyCommand::Regenerate));
    }
}
