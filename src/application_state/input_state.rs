//! # Input State
//!
//! Edge-aware key and button states handed from the input manager to the
//! engine once per frame.

use std::collections::{HashMap, HashSet};
use winit::{event::MouseButton, keyboard::KeyCode};

/// Represents the state of a key or button.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RawInputState {
    /// Key/button is not pressed
    #[default]
    NotPressed,
    /// Key/button was just pressed this frame
    Pressed,
    /// Key/button has been held down for multiple frames
    Held,
    /// Key/button was just released this frame
    Released,
}

impl RawInputState {
    /// Determines if the input is actively down (either pressed or held)
    pub fn is_active(&self) -> bool {
        matches!(self, RawInputState::Pressed | RawInputState::Held)
    }

    /// Determines if the input was just pressed this frame
    pub fn is_just_pressed(&self) -> bool {
        matches!(self, RawInputState::Pressed)
    }

    /// Determines if the input was just released this frame
    pub fn is_just_released(&self) -> bool {
        matches!(self, RawInputState::Released)
    }

    /// Classifies a key from whether it was down last frame and is down now.
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,
            (true, true) => RawInputState::Held,
            (true, false) => RawInputState::Released,
            (false, false) => RawInputState::NotPressed,
        }
    }

    /// Like [`RawInputState::from_raw_states`], but a press seen at any point
    /// during the frame always reads as [`RawInputState::Pressed`], even if
    /// the key is already up again.
    pub fn from_frame(previous: bool, current: bool, pressed_during_frame: bool) -> Self {
        if pressed_during_frame {
            RawInputState::Pressed
        } else {
            Self::from_raw_states(previous, current)
        }
    }
}

/// One frame's worth of key and button transitions plus mouse motion.
///
/// Keys and buttons the manager does not track read as
/// [`RawInputState::NotPressed`].
pub struct ProcessedInputState {
    pub keyboard_states: HashMap<KeyCode, RawInputState>,
    pub mouse_button_states: HashMap<MouseButton, RawInputState>,
    /// Mouse movement summed since the last frame (x, y)
    pub mouse_delta: Option<(f64, f64)>,
}

impl ProcessedInputState {
    /// Gets the state of a keyboard key
    pub fn get_key_state(&self, key: KeyCode) -> RawInputState {
        self.keyboard_states.get(&key).copied().unwrap_or_default()
    }

    /// Gets the state of a mouse button
    pub fn get_mouse_button_state(&self, button: MouseButton) -> RawInputState {
        self.mouse_button_states.get(&button).copied().unwrap_or_default()
    }

    /// Gets the mouse movement delta since the last frame
    pub fn get_mouse_delta(&self) -> Option<(f64, f64)> {
        self.mouse_delta
    }
}

/// Tracks the state of mouse buttons and relative movement.
pub struct MouseInput {
    /// Previous state of each mouse button (pressed/released)
    pub mouse_button_inputs_old: HashMap<MouseButton, bool>,
    /// Current state of each mouse button (pressed/released)
    pub mouse_button_inputs_new: HashMap<MouseButton, bool>,
    /// Buttons that went down since the last frame
    pub mouse_buttons_pressed: HashSet<MouseButton>,
    /// Relative motion summed since the last frame (x, y)
    pub mouse_delta: Option<(f64, f64)>,
}
