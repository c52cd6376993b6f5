use std::collections::HashSet;

use winit::dpi::PhysicalPosition;

use super::types::{
    InputEvent, Key, KeyInput, KeyState, Modifiers, MouseButton, MouseButtonState, PointerButton,
};

/// Held keys/buttons, modifiers and pointer position for one window.
///
/// The winit runtime keeps one per window to stamp modifiers and pointer position onto
/// translated events; applications may keep their own and feed it `Input` events.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub pointer_pos: Option<PhysicalPosition<f64>>,
    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    pub fn apply(&mut self, event: &InputEvent) {
        match event {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::PointerMoved { position } => self.pointer_pos = Some(*position),
            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key(KeyInput {
                key,
                state,
                modifiers,
                ..
            }) => {
                self.modifiers = *modifiers;
                match state {
                    KeyState::Pressed => {
                        self.keys_down.insert(*key);
                    }
                    KeyState::Released => {
                        self.keys_down.remove(key);
                    }
                }
            }

            InputEvent::PointerButton(PointerButton { button, state, .. }) => match state {
                MouseButtonState::Pressed => {
                    self.buttons_down.insert(*button);
                }
                MouseButtonState::Released => {
                    self.buttons_down.remove(button);
                }
            },

            InputEvent::MouseWheel { .. } | InputEvent::Touch(_) | InputEvent::Text(_) => {}
        }
    }

    /// Drops held keys and buttons; called on focus loss so nothing stays stuck.
    pub fn release_all(&mut self) {
        self.keys_down.clear();
        self.buttons_down.clear();
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}
