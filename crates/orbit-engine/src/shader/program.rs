use std::borrow::Cow;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::error::ShaderError;
use crate::geometry::VertexAttribute;

use super::link::{LinkedProgram, FRAGMENT_ENTRY, VERTEX_ENTRY};
use super::source::ShaderSource;

/// Description of one program to build.
#[derive(Debug, Clone)]
pub struct ProgramDesc {
    pub label: String,
    pub source: ShaderSource,

    /// Color blending; `None` overwrites.
    pub blend: Option<wgpu::BlendState>,
}

/// Attachment formats every program in a frame must agree on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ProgramTargets {
    pub color_format: wgpu::TextureFormat,
    pub sample_count: u32,
    pub depth_format: Option<wgpu::TextureFormat>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MvpUniform {
    matrix: [[f32; 4]; 4],
}

/// A linked program with its own MVP uniform.
///
/// The uniform buffer and its bind group play the role of the program's cached
/// uniform location: each program owns one, independent of any other program.
pub struct ShaderProgram {
    label: String,
    pipeline: wgpu::RenderPipeline,
    mvp_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    attributes: Vec<VertexAttribute>,
}

impl ShaderProgram {
    /// Reads, links and builds the program described by `desc`.
    pub fn build(
        device: &wgpu::Device,
        desc: &ProgramDesc,
        targets: ProgramTargets,
    ) -> Result<Self, ShaderError> {
        let linked = desc.source.load()?;
        Ok(Self::from_linked(device, &desc.label, linked, desc.blend, targets))
    }

    fn from_linked(
        device: &wgpu::Device,
        label: &str,
        linked: LinkedProgram,
        blend: Option<wgpu::BlendState>,
        targets: ProgramTargets,
    ) -> Self {
        let attributes = linked.attributes().to_vec();

        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{label} vertex")),
            source: wgpu::ShaderSource::Naga(Cow::Owned(linked.vertex)),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{label} fragment")),
            source: wgpu::ShaderSource::Naga(Cow::Owned(linked.fragment)),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label} mvp bgl")),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<MvpUniform>() as u64),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label} pipeline layout")),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        // Slot order matches `attributes`, which always starts at position.
        let buffers: Vec<wgpu::VertexBufferLayout<'static>> =
            attributes.iter().map(|attr| attr.layout()).collect();

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{label} pipeline")),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: targets.color_format,
                    blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: targets.depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),

            multisample: wgpu::MultisampleState {
                count: targets.sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },

            multiview_mask: None,
            cache: None,
        });

        let mvp_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} mvp ubo")),
            size: std::mem::size_of::<MvpUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} mvp bind group")),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: mvp_buffer.as_entire_binding(),
            }],
        });

        log::debug!("built program {label} reading {attributes:?}");

        Self {
            label: label.to_owned(),
            pipeline,
            mvp_buffer,
            bind_group,
            attributes,
        }
    }

    /// Vertex attributes this program reads, in slot order.
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Writes `mvp` into this program's uniform.
    pub fn upload_mvp(&self, queue: &wgpu::Queue, mvp: Mat4) {
        let u = MvpUniform {
            matrix: mvp.to_cols_array_2d(),
        };
        queue.write_buffer(&self.mvp_buffer, 0, bytemuck::bytes_of(&u));
    }

    /// Frees the uniform buffer; the pipeline and its vertex layouts go with `self`.
    pub fn release(self) {
        log::debug!("releasing program {}", self.label);
        self.mvp_buffer.destroy();
    }
}
