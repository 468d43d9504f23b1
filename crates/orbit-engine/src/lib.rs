//! Orbit engine crate.
//!
//! A minimal real-time rendering loop: one window, shared geometry drawn by
//! one or more shader programs, and a camera orbiting the origin at one
//! radian per second. Binaries pick a [`pipeline::PipelineConfig`] preset and
//! call [`pipeline::run`].

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod error;
pub mod camera;
pub mod geometry;
pub mod shader;
pub mod render;
pub mod lifecycle;
pub mod pipeline;
