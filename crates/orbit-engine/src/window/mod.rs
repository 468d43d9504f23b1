//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, wires them to the GPU layer, and
//! drives the application's frames until the lifecycle terminates.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
