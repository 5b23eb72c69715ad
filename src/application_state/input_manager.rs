//! # Input Manager
//!
//! Collects window and device events between frames and turns them into a
//! [`ProcessedInputState`] of press/hold/release transitions.

use std::collections::{HashMap, HashSet};

use winit::{
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{MouseInput, ProcessedInputState, RawInputState};

const KEY_CODES: [KeyCode; 10] = [
    KeyCode::KeyW,
    KeyCode::KeyS,
    KeyCode::KeyA,
    KeyCode::KeyD,
    KeyCode::Space,
    KeyCode::KeyZ,
    KeyCode::KeyJ,
    KeyCode::KeyN,
    KeyCode::KeyQ,
    KeyCode::Escape,
];

const MOUSE_BUTTONS: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Back];

/// Tracks the tracked keys and mouse buttons across frames.
pub struct InputManager {
    /// State of each tracked key at the end of the previous frame
    pub keyboard_inputs_old: HashMap<KeyCode, bool>,
    /// Current state of each tracked key
    pub keyboard_inputs_new: HashMap<KeyCode, bool>,
    /// Keys that went down since the last frame, so a tap shorter than a
    /// frame still registers
    pub keys_pressed: HashSet<KeyCode>,
    pub mouse_inputs: MouseInput,
}

impl InputManager {
    /// Creates a manager with every tracked key and button released.
    pub fn new() -> Self {
        let keyboard_inputs_old: HashMap<KeyCode, bool> = KEY_CODES.iter().map(|&key| (key, false)).collect();
        let keyboard_inputs_new = keyboard_inputs_old.clone();

        let mouse_button_inputs_old: HashMap<MouseButton, bool> =
            MOUSE_BUTTONS.iter().map(|&button| (button, false)).collect();
        let mouse_button_inputs_new = mouse_button_inputs_old.clone();

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
            keys_pressed: HashSet::new(),
            mouse_inputs: MouseInput {
                mouse_button_inputs_old,
                mouse_button_inputs_new,
                mouse_buttons_pressed: HashSet::new(),
                mouse_delta: None,
            },
        }
    }

    /// Copies current key and button states into the previous-frame maps.
    ///
    /// A key tapped within the frame counts as down, so its release shows
    /// up on the next frame.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state || self.keys_pressed.contains(key);
            }
        }

        let mouse = &mut self.mouse_inputs;
        for (button, new_state) in mouse.mouse_button_inputs_new.iter() {
            if let Some(old_state) = mouse.mouse_button_inputs_old.get_mut(button) {
                *old_state = *new_state || mouse.mouse_buttons_pressed.contains(button);
            }
        }
    }

    /// Records key and mouse button changes from a window event.
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        repeat: false,
                        ..
                    },
                ..
            } => self.set_key(*key, *state == ElementState::Pressed),
            WindowEvent::MouseInput { button, state, .. } => {
                self.set_mouse_button(*button, *state == ElementState::Pressed)
            }
            _ => {}
        }
    }

    /// Records a tracked key going down or up. Untracked keys are ignored.
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        if let Some(key_state) = self.keyboard_inputs_new.get_mut(&key) {
            *key_state = pressed;
            if pressed {
                self.keys_pressed.insert(key);
            }
        }
    }

    /// Records a tracked mouse button going down or up.
    pub fn set_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        let mouse = &mut self.mouse_inputs;
        if let Some(button_state) = mouse.mouse_button_inputs_new.get_mut(&button) {
            *button_state = pressed;
            if pressed {
                mouse.mouse_buttons_pressed.insert(button);
            }
        }
    }

    /// Adds raw relative mouse motion to this frame's total.
    pub fn intake_mouse_motion(&mut self, delta: (f64, f64)) {
        let (dx, dy) = self.mouse_inputs.mouse_delta.unwrap_or((0.0, 0.0));
        self.mouse_inputs.mouse_delta = Some((dx + delta.0, dy + delta.1));
    }

    /// Classifies every tracked key and button against the previous frame.
    pub fn create_processed_input_state(&self) -> ProcessedInputState {
        let keyboard_states = self
            .keyboard_inputs_new
            .iter()
            .map(|(key, &new_state)| {
                let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
                let pressed = self.keys_pressed.contains(key);
                (*key, RawInputState::from_frame(old_state, new_state, pressed))
            })
            .collect();

        let mouse_button_states = self
            .mouse_inputs
            .mouse_button_inputs_new
            .iter()
            .map(|(button, &new_state)| {
                let old_state = self
                    .mouse_inputs
                    .mouse_button_inputs_old
                    .get(button)
                    .copied()
                    .unwrap_or(false);
                let pressed = self.mouse_inputs.mouse_buttons_pressed.contains(button);
                (*button, RawInputState::from_frame(old_state, new_state, pressed))
            })
            .collect();

        ProcessedInputState {
            keyboard_states,
            mouse_button_states,
            mouse_delta: self.mouse_inputs.mouse_delta,
        }
    }

    /// Returns this frame's processed input and starts the next frame.
    pub fn get_and_reset_processed_input(&mut self) -> ProcessedInputState {
        let processed_input = self.create_processed_input_state();
        self.reset_inputs();
        processed_input
    }

    /// Ends the frame: current states become previous ones and motion is
    /// cleared.
    pub fn reset_inputs(&mut self) {
        self.move_old_states();
        self.keys_pressed.clear();
        self.mouse_inputs.mouse_buttons_pressed.clear();
        self.mouse_inputs.mouse_delta = None;
    }

    /// Releases everything, e.g. when the window loses focus, so no key
    /// stays stuck down.
    pub fn release_all(&mut self) {
        self.keyboard_inputs_new.values_mut().for_each(|state| *state = false);
        self.mouse_inputs
            .mouse_button_inputs_new
            .values_mut()
            .for_each(|state| *state = false);
        self.mouse_inputs.mouse_delta = None;
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_accumulates_until_reset() {
        let mut manager = InputManager::new();
        manager.intake_mouse_motion((3.0, -1.0));
        manager.intake_mouse_motion((2.0, 4.0));

        let processed = manager.get_and_reset_processed_input();
        assert_eq!(processed.mouse_delta, Some((5.0, 3.0)));
        assert_eq!(manager.create_processed_input_state().mouse_delta, None);
    }

    #[test]
    fn key_goes_pressed_held_released() {
        let mut manager = InputManager::new();

        manager.keyboard_inputs_new.insert(KeyCode::KeyW, true);
        let first = manager.get_and_reset_processed_input();
        assert_eq!(first.get_key_state(KeyCode::KeyW), RawInputState::Pressed);

        let second = manager.get_and_reset_processed_input();
        assert_eq!(second.get_key_state(KeyCode::KeyW), RawInputState::Held);

        manager.keyboard_inputs_new.insert(KeyCode::KeyW, false);
        let third = manager.get_and_reset_processed_input();
        assert_eq!(third.get_key_state(KeyCode::KeyW), RawInputState::Released);
    }

    #[test]
    fn click_within_one_frame_is_pressed_then_released() {
        let mut manager = InputManager::new();
        manager.set_mouse_button(MouseButton::Left, true);
        manager.set_mouse_button(MouseButton::Left, false);

        let first = manager.get_and_reset_processed_input();
        assert!(first.get_mouse_button_state(MouseButton::Left).is_just_pressed());

        let second = manager.get_and_reset_processed_input();
        assert!(second.get_mouse_button_state(MouseButton::Left).is_just_released());

        let third = manager.get_and_reset_processed_input();
        assert_eq!(third.get_mouse_button_state(MouseButton::Left), RawInputState::NotPressed);
    }

    #[test]
    fn key_tap_within_one_frame_still_fires_its_release() {
        let mut manager = InputManager::new();
        manager.set_key(KeyCode::KeyJ, true);
        manager.set_key(KeyCode::KeyJ, false);

        assert!(manager.get_and_reset_processed_input().get_key_state(KeyCode::KeyJ).is_just_pressed());
        assert!(manager.get_and_reset_processed_input().get_key_state(KeyCode::KeyJ).is_just_released());
    }

    #[test]
    fn untracked_keys_are_not_latched() {
        let mut manager = InputManager::new();
        manager.set_key(KeyCode::KeyX, true);
        assert!(manager.keys_pressed.is_empty());
    }

    #[test]
    fn release_all_lets_go_of_held_keys() {
        let mut manager = InputManager::new();
        manager.keyboard_inputs_new.insert(KeyCode::KeyD, true);
        manager.get_and_reset_processed_input();

        manager.release_all();
        let processed = manager.get_and_reset_processed_input();
        assert_eq!(processed.get_key_state(KeyCode::KeyD), RawInputState::Released);
    }
}
