//! Time subsystem.
//!
//! Provides monotonic tick sources and the frame-rate sampler without coupling
//! to the runtime.
//! Intended usage:
//! - one `MonotonicTicks` per process, read once per frame
//! - one `FrameClock` per render loop, advanced once per presented frame

mod frame_clock;
mod ticks;

pub use frame_clock::{FrameClock, FrameRate, RateConfig};
pub use ticks::{FrameTime, MonotonicTicks, TickSource};
