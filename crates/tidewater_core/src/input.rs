use std::collections::HashSet;

/// Re-exported key and mouse enums from `winit` so callers don't need a
/// direct winit dependency for bindings.
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

/// State of the keyboard and mouse at a given moment.
///
/// The event loop drives this structure by feeding it winit events; the
/// rest of the system queries it with the helpers below. `end_frame` must
/// be called once per frame, after all consumers have run, to reset the
/// per-frame edge sets.
#[derive(Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    keys_pressed_this_frame: HashSet<KeyCode>,
    mouse_buttons: HashSet<MouseButton>,
    mouse_pos: (f64, f64),
    /// Movement since the last `consume_mouse_delta` call.
    mouse_delta: (f32, f32),
}

impl InputState {
    /// Creates a fresh, empty input state.
    pub fn new() -> Self {
        Default::default()
    }

    /// Called by the event loop when a keyboard event arrives.
    pub fn update_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            if self.keys_down.insert(key) {
                self.keys_pressed_this_frame.insert(key);
            }
        } else {
            self.keys_down.remove(&key);
        }
    }

    /// Returns true if the given key is currently held down.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true only on the frame the key transitioned to pressed.
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed_this_frame.contains(&key)
    }

    /// Called by the event loop when a mouse button event arrives.
    pub fn update_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.mouse_buttons.insert(button);
        } else {
            self.mouse_buttons.remove(&button);
        }
    }

    /// Returns true if the given mouse button is currently held.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    /// Updates the cursor position (window coordinates) and accumulates the
    /// movement delta.
    pub fn set_mouse_position(&mut self, x: f64, y: f64) {
        let (px, py) = self.mouse_pos;
        self.mouse_pos = (x, y);
        self.mouse_delta.0 += (x - px) as f32;
        self.mouse_delta.1 += (y - py) as f32;
    }

    /// Last recorded cursor position.
    pub fn mouse_position(&self) -> (f64, f64) {
        self.mouse_pos
    }

    /// Retrieves and resets the accumulated mouse movement in pixels.
    pub fn consume_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Clears per-frame edge state. Call after all consumers have read
    /// `just_pressed` for the frame.
    pub fn end_frame(&mut self) {
        self.keys_pressed_this_frame.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_tracking() {
        let mut state = InputState::new();
        assert!(!state.is_key_pressed(KeyCode::KeyW));
        state.update_key(KeyCode::KeyW, true);
        assert!(state.is_key_pressed(KeyCode::KeyW));
        assert!(state.just_pressed(KeyCode::KeyW));
        state.end_frame();
        // still held, but no longer an edge
        assert!(state.is_key_pressed(KeyCode::KeyW));
        assert!(!state.just_pressed(KeyCode::KeyW));
        state.update_key(KeyCode::KeyW, false);
        assert!(!state.is_key_pressed(KeyCode::KeyW));
    }

    #[test]
    fn held_key_is_not_repeated_as_edge() {
        let mut state = InputState::new();
        state.update_key(KeyCode::Digit1, true);
        state.end_frame();
        // OS key repeat delivers pressed again while already down
        state.update_key(KeyCode::Digit1, true);
        assert!(!state.just_pressed(KeyCode::Digit1));
    }

    #[test]
    fn mouse_tracking() {
        let mut state = InputState::new();
        state.update_mouse_button(MouseButton::Left, true);
        assert!(state.is_button_down(MouseButton::Left));
        state.set_mouse_position(10.0, 20.0);
        state.consume_mouse_delta();
        state.set_mouse_position(15.0, 25.0);
        assert_eq!(state.consume_mouse_delta(), (5.0, 5.0));
        assert_eq!(state.consume_mouse_delta(), (0.0, 0.0));
        assert_eq!(state.mouse_position(), (15.0, 25.0));
    }
}
