//! The orbit-camera pipeline.
//!
//! Ties configuration, scene content and the frame loop together: a
//! [`PipelineConfig`] describes one window, one camera and one scene, and
//! [`run`] drives it until the user exits.

mod app;
mod config;
mod scene;

pub use app::{run, OrbitPipeline, SceneResources};
pub use config::PipelineConfig;
pub use scene::SceneDesc;
