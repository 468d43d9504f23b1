use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{Key, KeyEvent, KeyState};

/// Current keyboard state for the window.
///
/// Holds "is down" information. Per-iteration transitions are recorded into
/// an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies a key event to the current state and writes transitions to `frame`.
    pub fn apply_key(&mut self, frame: &mut InputFrame, ev: KeyEvent) {
        match ev.state {
            KeyState::Pressed => {
                if self.keys_down.insert(ev.key) {
                    frame.keys_pressed.insert(ev.key);
                }
            }
            KeyState::Released => {
                self.keys_down.remove(&ev.key);
            }
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        if !focused {
            // Avoids stuck keys when focus changes mid-press.
            self.keys_down.clear();
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Down now, or pressed at any point since `frame` was last cleared.
    pub fn key_pressed_since(&self, frame: &InputFrame, key: Key) -> bool {
        self.key_down(key) || frame.was_pressed(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: Key) -> KeyEvent {
        KeyEvent {
            key,
            state: KeyState::Pressed,
        }
    }

    fn release(key: Key) -> KeyEvent {
        KeyEvent {
            key,
            state: KeyState::Released,
        }
    }

    #[test]
    fn press_and_release_within_one_poll_is_sticky() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_key(&mut frame, press(Key::Escape));
        state.apply_key(&mut frame, release(Key::Escape));

        assert!(!state.key_down(Key::Escape));
        assert!(state.key_pressed_since(&frame, Key::Escape));

        frame.clear();
        assert!(!state.key_pressed_since(&frame, Key::Escape));
    }

    #[test]
    fn held_key_stays_pressed_across_clears() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_key(&mut frame, press(Key::Escape));
        frame.clear();

        assert!(state.key_pressed_since(&frame, Key::Escape));
    }

    #[test]
    fn repeated_press_of_a_held_key_is_not_a_new_transition() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        let space = Key::Unknown(62);

        state.apply_key(&mut frame, press(space));
        frame.clear();
        state.apply_key(&mut frame, press(space));

        assert!(!frame.was_pressed(space));
        assert!(state.key_down(space));
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_key(&mut frame, press(Key::Escape));
        state.set_focused(false);

        assert!(!state.key_down(Key::Escape));
        assert!(frame.was_pressed(Key::Escape));
    }
}
