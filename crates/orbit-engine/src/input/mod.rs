//! Keyboard input.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code is responsible for translating platform key events.

mod frame;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{Key, KeyEvent, KeyState};
