use std::collections::HashSet;

use super::types::Key;

/// Key transitions since the last termination check.
///
/// Presses stay recorded until `clear`, even if the key was released again
/// before anyone looked ("sticky keys").
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Keys pressed since the last clear.
    pub keys_pressed: HashSet<Key>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
    }

    pub fn was_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }
}
