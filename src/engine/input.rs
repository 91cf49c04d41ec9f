//! Input and command dispatch for GalaxyEngine

use super::command::GalaxyCommand;
use super::GalaxyEngine;
use crate::input::InputEvent;

impl GalaxyEngine {
    /// Process a platform-agnostic input event. Drags and wheel turns
    /// become camera commands.
    pub fn handle_input(&mut self, event: InputEvent) {
        if let Some(command) = self.input.handle_event(event) {
            self.execute(command);
        }
    }

    /// Run the command bound to `key` (a `KeyboardEvent.code` string) and
    /// return it, or `None` if the key is unbound. Hosts handle the
    /// commands the engine cannot, such as [`GalaxyCommand::TogglePanel`].
    pub fn handle_key_press(&mut self, key: &str) -> Option<GalaxyCommand> {
        let command = self.input.handle_key_press(key)?;
        self.execute(command.clone());
        Some(command)
    }

    /// Execute a command.
    pub fn execute(&mut self, command: GalaxyCommand) {
        match command {
            GalaxyCommand::RotateCamera { delta } => self.camera.rotate(delta),
            GalaxyCommand::PanCamera { delta } => self.camera.pan(delta),
            GalaxyCommand::Zoom { delta } => self.camera.zoom(delta),
            GalaxyCommand::ResetCamera => self.camera.reset(),
            GalaxyCommand::Regenerate => {
                self.regenerate_with_seed(rand::random());
            }
            GalaxyCommand::TogglePanel => {}
        }
    }
}
