use std::path::Path;

use crate::error::ConfigError;
use crate::geometry::Mesh;
use crate::render::Pairing;
use crate::shader::{ProgramDesc, ShaderSource};

/// What a pipeline draws: shared geometry, the programs that draw it, and
/// which program draws which vertices.
#[derive(Debug, Clone)]
pub struct SceneDesc {
    pub mesh: Mesh,
    pub programs: Vec<ProgramDesc>,

    /// Drawn in order, every frame.
    pub pairings: Vec<Pairing>,

    /// Nearer fragments win (`Less`) when set; otherwise later draws win.
    pub depth_test: bool,
}

impl SceneDesc {
    /// Two triangles sharing one vertex shader, each with its own fragment
    /// shader. The second is blended over the first.
    pub fn dual_triangles(shader_dir: &Path) -> Self {
        let program = |label: &str, fragment: &str| ProgramDesc {
            label: label.to_string(),
            source: ShaderSource::in_dir(shader_dir, "simple.vert.wgsl", fragment),
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
        };

        Self {
            mesh: Mesh::dual_triangles(),
            programs: vec![
                program("program A", "simple_a.frag.wgsl"),
                program("program B", "simple_b.frag.wgsl"),
            ],
            pairings: vec![Pairing::new(0, 0..3), Pairing::new(1, 3..6)],
            depth_test: false,
        }
    }

    /// A unit cube with per-vertex colors, depth tested.
    pub fn color_cube(shader_dir: &Path) -> Self {
        let mesh = Mesh::color_cube();
        let vertex_count = mesh.vertex_count();

        Self {
            mesh,
            programs: vec![ProgramDesc {
                label: "color cube".to_string(),
                source: ShaderSource::in_dir(shader_dir, "transform.vert.wgsl", "color.frag.wgsl"),
                blend: None,
            }],
            pairings: vec![Pairing::new(0, 0..vertex_count)],
            depth_test: true,
        }
    }

    /// Checks everything that can be checked before shaders are linked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.programs.is_empty() {
            return Err(ConfigError::NoPrograms);
        }
        let vertex_count = self.mesh.vertex_count();
        for (index, pairing) in self.pairings.iter().enumerate() {
            pairing.validate(index, self.programs.len(), vertex_count)?;
        }
        Ok(())
    }
}
