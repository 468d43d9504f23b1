use wgpu::util::DeviceExt;

use super::mesh::{Mesh, VertexAttribute};

/// GPU-resident, upload-once vertex data.
///
/// Holds one tightly packed vertex buffer per attribute stream. Contents are
/// never written after `upload`.
pub struct GeometryBuffer {
    positions: wgpu::Buffer,
    colors: Option<wgpu::Buffer>,
    vertex_count: u32,
}

impl GeometryBuffer {
    pub fn upload(device: &wgpu::Device, mesh: &Mesh, label: &str) -> Self {
        let positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} positions")),
            contents: bytemuck::cast_slice(mesh.positions()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let colors = mesh.colors().map(|colors| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} colors")),
                contents: bytemuck::cast_slice(colors),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        log::debug!(
            "uploaded {label}: {} vertices, colors: {}",
            mesh.vertex_count(),
            colors.is_some()
        );

        Self {
            positions,
            colors,
            vertex_count: mesh.vertex_count(),
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Buffer backing `attribute`, if the geometry carries it.
    pub fn buffer(&self, attribute: VertexAttribute) -> Option<&wgpu::Buffer> {
        match attribute {
            VertexAttribute::Position => Some(&self.positions),
            VertexAttribute::Color => self.colors.as_ref(),
        }
    }

    /// Frees the GPU memory of every attribute buffer.
    pub fn release(self) {
        self.positions.destroy();
        if let Some(colors) = self.colors {
            colors.destroy();
        }
    }
}
