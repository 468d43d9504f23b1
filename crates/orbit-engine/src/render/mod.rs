//! Frame composition.
//!
//! `DrawPlan` is the validated, GPU-free draw sequence; `FrameComposer`
//! replays it every frame against the live programs and geometry.

mod composer;
mod plan;
mod targets;

pub use composer::{FrameComposer, FrameOutcome};
pub use plan::{DrawPlan, DrawStep, Pairing};
pub use targets::{FrameTargets, DEPTH_FORMAT};
