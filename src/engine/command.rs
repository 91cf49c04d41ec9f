//! The engine's interactive vocabulary.
//!
//! Every user-facing operation, whether triggered by a key press, a mouse
//! gesture or a programmatic call, is a `GalaxyCommand` passed to
//! [`GalaxyEngine::execute`](super::GalaxyEngine::execute).

use glam::Vec2;

/// A discrete action the engine can perform.
///
/// ```ignore
/// engine.execute(GalaxyCommand::Regenerate);
/// engine.execute(GalaxyCommand::Zoom { delta: 1.0 });
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum GalaxyCommand {
    // ── Camera ──────────────────────────────────────────────────────
    /// Orbit the camera by `delta` pixels of mouse movement.
    RotateCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Pan the camera by `delta` pixels of mouse movement.
    PanCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Dolly the camera (positive = closer, negative = farther).
    Zoom {
        /// Scroll amount in wheel steps.
        delta: f32,
    },

    /// Return the camera to its starting view.
    ResetCamera,

    // ── Scene ───────────────────────────────────────────────────────
    /// Regenerate the galaxy with a fresh random seed.
    Regenerate,

    // ── Host ────────────────────────────────────────────────────────
    /// Show or hide the options panel. The engine has no panel; hosts act
    /// on this when [`GalaxyEngine::handle_key_press`](super::GalaxyEngine::handle_key_press)
    /// returns it.
    TogglePanel,
}
