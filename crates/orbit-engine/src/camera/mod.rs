//! Camera transforms.
//!
//! The view matrix is a pure function of elapsed time; projection and model
//! are constants. Nothing here touches the GPU.

mod orbit;
mod projection;

pub use orbit::{Camera, OrbitPolicy};
pub use projection::{mvp, Projection};
