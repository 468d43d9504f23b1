use glam::Mat4;
use winit::window::Window;

use crate::camera::{mvp, Camera, Projection};
use crate::device::{Gpu, SurfaceErrorAction};
use crate::geometry::GeometryBuffer;
use crate::shader::ShaderProgram;

use super::plan::{DrawPlan, DrawStep};
use super::targets::FrameTargets;

/// Result of one composition attempt.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// Cleared, drawn and presented.
    Presented,
    /// Nothing was drawn or presented this iteration.
    Skipped,
    /// The surface cannot be recovered.
    SurfaceLost,
}

/// Per-frame orchestrator.
///
/// Computes the MVP from elapsed time, uploads it to every program in the
/// plan, records one render pass that clears and replays the plan, then
/// presents. A frame is either presented whole or not at all.
pub struct FrameComposer {
    camera: Camera,
    projection: Projection,
    model: Mat4,
    clear: wgpu::Color,
    plan: DrawPlan,
    targets: FrameTargets,
}

impl FrameComposer {
    pub fn new(
        camera: Camera,
        projection: Projection,
        clear: wgpu::Color,
        plan: DrawPlan,
        targets: FrameTargets,
    ) -> Self {
        Self {
            camera,
            projection,
            model: Mat4::IDENTITY,
            clear,
            plan,
            targets,
        }
    }

    /// `projection * view(elapsed) * model` for this frame.
    pub fn mvp(&self, elapsed: f64) -> Mat4 {
        mvp(self.projection.matrix(), self.camera.view(elapsed), self.model)
    }

    pub fn plan(&self) -> &DrawPlan {
        &self.plan
    }

    pub fn compose(
        &mut self,
        gpu: &mut Gpu<'_>,
        window: &Window,
        programs: &[ShaderProgram],
        geometry: &GeometryBuffer,
        elapsed: f64,
    ) -> FrameOutcome {
        let size = gpu.size();
        if size.width == 0 || size.height == 0 {
            return FrameOutcome::Skipped;
        }

        let mvp = self.mvp(elapsed);

        let mut frame = match gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::debug!("frame skipped: {err}");
                return match gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => FrameOutcome::SurfaceLost,
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        FrameOutcome::Skipped
                    }
                };
            }
        };

        self.targets.ensure(gpu.device(), size);

        for &program in self.plan.programs() {
            programs[program].upload_mvp(gpu.queue(), mvp);
        }

        // Pass is dropped before the encoder is moved into submit().
        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("orbit frame pass"),
                color_attachments: &[Some(self.targets.color_attachment(&frame.view, self.clear))],
                depth_stencil_attachment: self.targets.depth_attachment(),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for step in self.plan.steps() {
                match step {
                    DrawStep::UseProgram(index) => {
                        let program = &programs[*index];
                        rpass.set_pipeline(program.pipeline());
                        rpass.set_bind_group(0, program.bind_group(), &[]);
                    }
                    DrawStep::BindAttribute(attribute) => {
                        // Presence was checked when the plan was built.
                        if let Some(buffer) = geometry.buffer(*attribute) {
                            rpass.set_vertex_buffer(attribute.slot(), buffer.slice(..));
                        }
                    }
                    DrawStep::Draw(vertices) => rpass.draw(vertices.clone(), 0..1),
                }
            }
        }

        window.pre_present_notify();
        gpu.submit(frame);

        FrameOutcome::Presented
    }

    pub fn release(self) {
        self.targets.release();
    }
}
