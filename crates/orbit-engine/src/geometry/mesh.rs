use thiserror::Error;

/// Mesh validation failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("mesh has no vertices")]
    Empty,

    #[error("{0} vertices do not form a triangle list")]
    PartialTriangle(usize),

    #[error("{colors} colors for {positions} positions")]
    ColorCount { positions: usize, colors: usize },
}

/// A per-vertex attribute stream.
///
/// Each attribute lives in its own tightly packed buffer of three `f32`s, bound
/// to the vertex-buffer slot and shader location of the same index.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VertexAttribute {
    Position,
    Color,
}

impl VertexAttribute {
    pub const ALL: [VertexAttribute; 2] = [Self::Position, Self::Color];

    /// Vertex-buffer slot and `@location` index.
    pub const fn slot(self) -> u32 {
        match self {
            Self::Position => 0,
            Self::Color => 1,
        }
    }

    /// Bytes between consecutive vertices.
    pub const fn stride(self) -> u64 {
        std::mem::size_of::<[f32; 3]>() as u64
    }

    pub fn layout(self) -> wgpu::VertexBufferLayout<'static> {
        const POSITION: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
        const COLOR: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];

        wgpu::VertexBufferLayout {
            array_stride: self.stride(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: match self {
                Self::Position => &POSITION,
                Self::Color => &COLOR,
            },
        }
    }
}

/// Non-indexed triangle-list geometry with optional per-vertex colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Vec<[f32; 3]>,
    colors: Option<Vec<[f32; 3]>>,
}

impl Mesh {
    pub fn new(positions: Vec<[f32; 3]>, colors: Option<Vec<[f32; 3]>>) -> Result<Self, MeshError> {
        if positions.is_empty() {
            return Err(MeshError::Empty);
        }
        if positions.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle(positions.len()));
        }
        if let Some(colors) = &colors {
            if colors.len() != positions.len() {
                return Err(MeshError::ColorCount {
                    positions: positions.len(),
                    colors: colors.len(),
                });
            }
        }
        Ok(Self { positions, colors })
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> Option<&[[f32; 3]]> {
        self.colors.as_deref()
    }

    pub fn vertex_count(&self) -> u32 {
        // Bounded by what a vertex buffer can address.
        self.positions.len() as u32
    }

    pub fn has(&self, attribute: VertexAttribute) -> bool {
        match attribute {
            VertexAttribute::Position => true,
            VertexAttribute::Color => self.colors.is_some(),
        }
    }

    /// Two overlapping flat triangles at z = -0.1 and z = +0.1.
    ///
    /// Vertices `0..3` form the back triangle, `3..6` the front one.
    pub fn dual_triangles() -> Self {
        Self {
            positions: vec![
                [-0.4, 0.4, -0.1],
                [0.8, 0.0, -0.1],
                [-0.4, -0.4, -0.1],
                [0.4, 0.4, 0.1],
                [-0.8, 0.0, 0.1],
                [0.4, -0.4, 0.1],
            ],
            colors: None,
        }
    }

    /// Unit-half-extent cube, 12 triangles, colored by position.
    pub fn color_cube() -> Self {
        const CORNERS: [[f32; 3]; 8] = [
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [1.0, 1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
        ];
        // Counter-clockwise when seen from outside; two per face in
        // +z, -z, +x, -x, +y, -y order.
        const TRIANGLES: [[usize; 3]; 12] = [
            [4, 5, 6],
            [4, 6, 7],
            [1, 0, 3],
            [1, 3, 2],
            [5, 1, 2],
            [5, 2, 6],
            [0, 4, 7],
            [0, 7, 3],
            [7, 6, 2],
            [7, 2, 3],
            [0, 1, 5],
            [0, 5, 4],
        ];

        let positions: Vec<[f32; 3]> = TRIANGLES
            .iter()
            .flatten()
            .map(|&i| CORNERS[i])
            .collect();

        let colors = positions
            .iter()
            .map(|p| p.map(|c| 0.2 + 0.4 * (c + 1.0)))
            .collect();

        Self {
            positions,
            colors: Some(colors),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn presets_are_valid() {
        for mesh in [Mesh::dual_triangles(), Mesh::color_cube()] {
            let rebuilt = Mesh::new(mesh.positions().to_vec(), mesh.colors().map(<[_]>::to_vec));
            assert_eq!(rebuilt.as_ref(), Ok(&mesh));
        }
    }

    #[test]
    fn dual_triangles_has_two_triangles_and_no_colors() {
        let mesh = Mesh::dual_triangles();
        assert_eq!(mesh.vertex_count(), 6);
        assert!(!mesh.has(VertexAttribute::Color));
    }

    #[test]
    fn cube_has_twelve_outward_triangles() {
        let mesh = Mesh::color_cube();
        assert_eq!(mesh.vertex_count(), 36);
        assert!(mesh.has(VertexAttribute::Color));

        for tri in mesh.positions().chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(Vec3::from);
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "inward triangle {tri:?}");
        }
    }

    #[test]
    fn cube_colors_are_in_unit_range() {
        let mesh = Mesh::color_cube();
        let colors = mesh.colors().unwrap();
        assert!(colors.iter().flatten().all(|c| (0.0..=1.0).contains(c)));
    }

    #[test]
    fn rejects_malformed_meshes() {
        assert_eq!(Mesh::new(vec![], None), Err(MeshError::Empty));
        assert_eq!(
            Mesh::new(vec![[0.0; 3]; 4], None),
            Err(MeshError::PartialTriangle(4))
        );
        assert_eq!(
            Mesh::new(vec![[0.0; 3]; 3], Some(vec![[1.0; 3]; 2])),
            Err(MeshError::ColorCount {
                positions: 3,
                colors: 2
            })
        );
    }

    #[test]
    fn attribute_layouts_are_tightly_packed() {
        for attr in VertexAttribute::ALL {
            let layout = attr.layout();
            assert_eq!(layout.array_stride, 12);
            assert_eq!(layout.attributes.len(), 1);
            assert_eq!(layout.attributes[0].shader_location, attr.slot());
            assert_eq!(layout.attributes[0].offset, 0);
            assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
        }
    }
}
