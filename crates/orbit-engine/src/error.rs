//! Error taxonomy.
//!
//! Every error here is a setup-time error: once the frame loop runs, no
//! fallible path remains. Binaries report the chain and exit nonzero.

use std::path::PathBuf;

use thiserror::Error;

use crate::camera::OrbitPolicy;
use crate::geometry::MeshError;

/// Windowing, surface, or GPU binding-layer initialization failed.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to initialize the windowing system")]
    WindowingInit(#[source] winit::error::EventLoopError),

    #[error("failed to create the window")]
    WindowCreation(#[source] winit::error::OsError),

    #[error("window has zero size")]
    ZeroSizedWindow,

    #[error("failed to create a GPU surface for the window")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,

    #[error("invalid pipeline configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid geometry")]
    Mesh(#[from] MeshError),
}

/// A pipeline configuration that cannot be rendered.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("window size {width}x{height} must be non-zero")]
    WindowSize { width: u32, height: u32 },

    #[error("orbit {0:?} needs a finite radius > 0 and a finite height")]
    Orbit(OrbitPolicy),

    #[error("field of view {0} degrees must be within (0, 180)")]
    FieldOfView(f32),

    #[error("clip planes near={near} far={far} must satisfy 0 < near < far")]
    ClipPlanes { near: f32, far: f32 },

    #[error("rate window must contain at least one frame")]
    EmptyRateWindow,

    #[error("rate sample frame {sample_frame} must be within 1..={window_frames}")]
    SampleFrame { sample_frame: u32, window_frames: u32 },

    #[error("scene has no shader programs")]
    NoPrograms,

    #[error("pairing {index} refers to program {program}, but only {count} exist")]
    UnknownProgram { index: usize, program: usize, count: usize },

    #[error("pairing {index} draws vertices {start}..{end}, but the mesh has {vertex_count}")]
    VertexRange { index: usize, start: u32, end: u32, vertex_count: u32 },

    #[error("pairing {index} draws {count} vertices, which is not a whole number of triangles")]
    PartialTriangle { index: usize, count: u32 },

    #[error("program {program} reads vertex colors, but the mesh has none")]
    MissingColors { program: usize },
}

/// A shader program could not be produced from its sources.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader source {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} failed to compile:\n{message}")]
    Compile { path: PathBuf, message: String },

    #[error("program link failed: {0}")]
    Link(String),
}

/// Top-level engine error.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("setup failure")]
    Setup(#[from] SetupError),

    #[error("shader link failure")]
    ShaderLink(#[from] ShaderError),
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        Self::Setup(SetupError::Config(err))
    }
}

impl From<MeshError> for EngineError {
    fn from(err: MeshError) -> Self {
        Self::Setup(SetupError::Mesh(err))
    }
}
