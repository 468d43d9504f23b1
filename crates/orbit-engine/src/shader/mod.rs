//! Shader programs.
//!
//! A program is a vertex + fragment WGSL pair read from disk, validated and
//! linked on the CPU, then turned into a render pipeline that owns a single
//! MVP uniform.
//!
//! Stage conventions:
//! - vertex entry point `vs_main`, fragment entry point `fs_main`
//! - `@group(0) @binding(0)` is the MVP uniform (`mat4x4<f32>`)
//! - vertex inputs at `@location(0)` (position) and optionally `@location(1)` (color)

mod link;
mod program;
mod source;

pub use link::{link, LinkedProgram};
pub use program::{ProgramDesc, ProgramTargets, ShaderProgram};
pub use source::ShaderSource;
