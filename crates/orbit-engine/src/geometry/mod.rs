//! Static vertex geometry.
//!
//! `Mesh` is the CPU-side description; `GeometryBuffer` is its GPU-resident,
//! upload-once counterpart.

mod buffer;
mod mesh;

pub use buffer::GeometryBuffer;
pub use mesh::{Mesh, MeshError, VertexAttribute};
