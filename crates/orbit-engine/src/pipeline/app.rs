use crate::camera::Camera;
use crate::core::{App, AppControl, FrameCtx};
use crate::device::Gpu;
use crate::error::EngineError;
use crate::geometry::{GeometryBuffer, VertexAttribute};
use crate::lifecycle::Release;
use crate::render::{DrawPlan, FrameComposer, FrameOutcome, FrameTargets, DEPTH_FORMAT};
use crate::shader::{ProgramTargets, ShaderProgram};
use crate::time::{FrameClock, MonotonicTicks, TickSource};
use crate::window::Runtime;

use super::config::PipelineConfig;

/// Validates `config`, opens its window and renders until escape or close.
pub fn run(config: PipelineConfig) -> anyhow::Result<()> {
    config.validate().map_err(EngineError::from)?;

    let runtime = config.runtime_config();
    let gpu_init = config.gpu_init();
    Runtime::run(runtime, gpu_init, OrbitPipeline::new(config))
}

/// GPU state owned by a running pipeline.
pub struct SceneResources {
    geometry: GeometryBuffer,
    programs: Vec<ShaderProgram>,
    composer: FrameComposer,
}

impl Release for SceneResources {
    fn release(self) {
        self.geometry.release();
        for program in self.programs {
            program.release();
        }
        self.composer.release();
    }
}

/// The orbit-camera frame loop as an [`App`].
pub struct OrbitPipeline {
    config: PipelineConfig,
    ticks: MonotonicTicks,
    clock: Option<FrameClock>,
}

impl OrbitPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            ticks: MonotonicTicks::new(),
            clock: None,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn sample_rate(&mut self) {
        let Some(clock) = self.clock.as_mut() else {
            return;
        };
        if let Some(rate) = clock.advance(self.ticks.now_ticks()) {
            log::info!(
                target: "orbit::fps",
                "{:.1} fps ({} ticks since last sample)",
                rate.frames_per_second,
                rate.elapsed_ticks
            );
        }
    }
}

impl App for OrbitPipeline {
    type Resources = SceneResources;

    fn acquire(&mut self, gpu: &Gpu<'_>) -> Result<SceneResources, EngineError> {
        let scene = &self.config.scene;

        let targets = ProgramTargets {
            color_format: gpu.surface_format(),
            sample_count: gpu.sample_count(),
            depth_format: scene.depth_test.then_some(DEPTH_FORMAT),
        };

        let programs = scene
            .programs
            .iter()
            .map(|desc| ShaderProgram::build(gpu.device(), desc, targets))
            .collect::<Result<Vec<_>, _>>()?;

        let attributes: Vec<&[VertexAttribute]> =
            programs.iter().map(ShaderProgram::attributes).collect();
        let plan = DrawPlan::build(
            &scene.pairings,
            &attributes,
            scene.mesh.vertex_count(),
            scene.mesh.has(VertexAttribute::Color),
        )?;

        let geometry = GeometryBuffer::upload(gpu.device(), &scene.mesh, &self.config.title);

        let composer = FrameComposer::new(
            Camera::new(self.config.orbit),
            self.config.projection(),
            self.config.clear_color,
            plan,
            FrameTargets::new(gpu.surface_format(), gpu.sample_count(), scene.depth_test),
        );

        log::info!(
            "{}: {} programs, {} vertices, {}x MSAA",
            self.config.title,
            programs.len(),
            geometry.vertex_count(),
            gpu.sample_count()
        );

        self.clock = Some(FrameClock::new(
            self.config.rate,
            self.ticks.ticks_per_second(),
            self.ticks.now_ticks(),
        ));

        Ok(SceneResources {
            geometry,
            programs,
            composer,
        })
    }

    fn on_frame(&mut self, resources: &mut SceneResources, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let outcome = resources.composer.compose(
            ctx.gpu,
            ctx.window,
            &resources.programs,
            &resources.geometry,
            ctx.time.elapsed,
        );

        match outcome {
            FrameOutcome::Presented => {
                self.sample_rate();
                AppControl::Presented
            }
            FrameOutcome::Skipped => AppControl::Skipped,
            FrameOutcome::SurfaceLost => {
                log::error!("surface lost; shutting down");
                AppControl::Exit
            }
        }
    }
}
