use winit::dpi::PhysicalSize;

/// Depth format used when depth testing is enabled.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Offscreen attachments sized to the surface.
///
/// Holds the multisampled color buffer (resolved into the surface texture)
/// and the depth buffer, either of which may be absent.
pub struct FrameTargets {
    color_format: wgpu::TextureFormat,
    sample_count: u32,
    depth: bool,
    size: Option<PhysicalSize<u32>>,
    msaa: Option<(wgpu::Texture, wgpu::TextureView)>,
    depth_buffer: Option<(wgpu::Texture, wgpu::TextureView)>,
}

impl FrameTargets {
    pub fn new(color_format: wgpu::TextureFormat, sample_count: u32, depth: bool) -> Self {
        Self {
            color_format,
            sample_count,
            depth,
            size: None,
            msaa: None,
            depth_buffer: None,
        }
    }

    pub fn depth_format(&self) -> Option<wgpu::TextureFormat> {
        self.depth.then_some(DEPTH_FORMAT)
    }

    /// (Re)creates attachments when the surface size changed.
    pub fn ensure(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        if self.size == Some(size) {
            return;
        }
        self.size = Some(size);

        self.msaa = (self.sample_count > 1).then(|| {
            create_attachment(device, "orbit msaa color", self.color_format, self.sample_count, size)
        });

        self.depth_buffer = self
            .depth
            .then(|| create_attachment(device, "orbit depth", DEPTH_FORMAT, self.sample_count, size));
    }

    /// Color attachment that clears to `clear` and ends up in `surface_view`.
    pub fn color_attachment<'a>(
        &'a self,
        surface_view: &'a wgpu::TextureView,
        clear: wgpu::Color,
    ) -> wgpu::RenderPassColorAttachment<'a> {
        let (view, resolve_target, store) = match &self.msaa {
            Some((_, msaa_view)) => (msaa_view, Some(surface_view), wgpu::StoreOp::Discard),
            None => (surface_view, None, wgpu::StoreOp::Store),
        };

        wgpu::RenderPassColorAttachment {
            view,
            resolve_target,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store,
            },
            depth_slice: None,
        }
    }

    /// Depth attachment cleared to the far plane, if depth testing is on.
    pub fn depth_attachment(&self) -> Option<wgpu::RenderPassDepthStencilAttachment<'_>> {
        self.depth_buffer
            .as_ref()
            .map(|(_, view)| wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            })
    }

    pub fn release(self) {
        for (texture, _) in self.msaa.into_iter().chain(self.depth_buffer) {
            texture.destroy();
        }
    }
}

fn create_attachment(
    device: &wgpu::Device,
    label: &str,
    format: wgpu::TextureFormat,
    sample_count: u32,
    size: PhysicalSize<u32>,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}
