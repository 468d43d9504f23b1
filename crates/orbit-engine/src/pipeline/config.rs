use std::path::Path;

use crate::camera::{OrbitPolicy, Projection};
use crate::device::GpuInit;
use crate::error::ConfigError;
use crate::time::RateConfig;
use crate::window::RuntimeConfig;

use super::scene::SceneDesc;

/// Dark blue, fully transparent.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.4,
    a: 0.0,
};

/// Everything one run of the pipeline needs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,

    pub orbit: OrbitPolicy,

    /// Vertical field of view.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,

    /// Requested multisample count; lowered if the surface can't do it.
    pub msaa_samples: u32,

    pub rate: RateConfig,
    pub clear_color: wgpu::Color,
    pub scene: SceneDesc,
}

impl PipelineConfig {
    fn with_scene(title: &str, orbit: OrbitPolicy, scene: SceneDesc) -> Self {
        Self {
            title: title.to_string(),
            width: 1024,
            height: 768,
            orbit,
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            msaa_samples: 4,
            rate: RateConfig::default(),
            clear_color: CLEAR_COLOR,
            scene,
        }
    }

    /// Two flat-colored triangles seen from a tilted orbit of radius 1.5.
    pub fn dual_triangles(shader_dir: &Path) -> Self {
        Self::with_scene(
            "orbit: dual triangles",
            OrbitPolicy::Tilted { radius: 1.5 },
            SceneDesc::dual_triangles(shader_dir),
        )
    }

    /// A colored cube seen from a level orbit of radius 6 at height 3.
    pub fn color_cube(shader_dir: &Path) -> Self {
        Self::with_scene(
            "orbit: color cube",
            OrbitPolicy::Level {
                radius: 6.0,
                height: 3.0,
            },
            SceneDesc::color_cube(shader_dir),
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::WindowSize {
                width: self.width,
                height: self.height,
            });
        }
        if !self.orbit.is_valid() {
            return Err(ConfigError::Orbit(self.orbit));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::FieldOfView(self.fov_degrees));
        }
        if !(self.near > 0.0 && self.near < self.far) {
            return Err(ConfigError::ClipPlanes {
                near: self.near,
                far: self.far,
            });
        }
        self.rate.validate()?;
        self.scene.validate()
    }

    /// Fixed for the whole run; the window is not resizable.
    pub fn projection(&self) -> Projection {
        let aspect = self.width as f32 / self.height as f32;
        Projection::perspective(self.fov_degrees, aspect, self.near, self.far)
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
        }
    }

    pub fn gpu_init(&self) -> GpuInit {
        GpuInit {
            msaa_samples: self.msaa_samples,
            ..GpuInit::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir() -> &'static Path {
        Path::new("shaders")
    }

    #[test]
    fn presets_share_the_default_window_and_lens() {
        for config in [
            PipelineConfig::dual_triangles(dir()),
            PipelineConfig::color_cube(dir()),
        ] {
            assert_eq!((config.width, config.height), (1024, 768));
            assert_eq!(config.fov_degrees, 45.0);
            assert_eq!((config.near, config.far), (0.1, 100.0));
            assert_eq!(config.msaa_samples, 4);
            assert_eq!(config.rate, RateConfig::default());
            assert_eq!(config.clear_color, CLEAR_COLOR);
            config.validate().unwrap();
        }
    }

    #[test]
    fn presets_use_their_own_orbits() {
        assert_eq!(
            PipelineConfig::dual_triangles(dir()).orbit,
            OrbitPolicy::Tilted { radius: 1.5 }
        );
        assert_eq!(
            PipelineConfig::color_cube(dir()).orbit,
            OrbitPolicy::Level {
                radius: 6.0,
                height: 3.0
            }
        );
    }

    #[test]
    fn projection_uses_the_window_aspect() {
        let config = PipelineConfig::color_cube(dir());
        let projection = config.projection();
        assert!((projection.aspect() - 4.0 / 3.0).abs() < 1e-6);
        assert_eq!(projection.clip_planes(), (0.1, 100.0));
    }

    #[test]
    fn derived_runtime_and_gpu_settings() {
        let mut config = PipelineConfig::dual_triangles(dir());
        config.msaa_samples = 1;

        let runtime = config.runtime_config();
        assert_eq!(runtime.title, config.title);
        assert_eq!((runtime.width, runtime.height), (1024, 768));
        assert_eq!(config.gpu_init().msaa_samples, 1);
    }

    #[test]
    fn rejects_zero_sized_window() {
        let mut config = PipelineConfig::color_cube(dir());
        config.height = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::WindowSize {
                width: 1024,
                height: 0
            })
        );
    }

    #[test]
    fn rejects_degenerate_lens() {
        let mut config = PipelineConfig::color_cube(dir());
        config.fov_degrees = 180.0;
        assert_eq!(config.validate(), Err(ConfigError::FieldOfView(180.0)));

        let mut config = PipelineConfig::color_cube(dir());
        config.near = 10.0;
        config.far = 10.0;
        assert!(matches!(config.validate(), Err(ConfigError::ClipPlanes { .. })));
    }

    #[test]
    fn rejects_degenerate_orbit() {
        let degenerate = [
            OrbitPolicy::Level {
                radius: 0.0,
                height: 3.0,
            },
            OrbitPolicy::Tilted { radius: 0.0 },
            OrbitPolicy::Tilted { radius: -1.5 },
            OrbitPolicy::Tilted { radius: f32::NAN },
            OrbitPolicy::Level {
                radius: 6.0,
                height: f32::INFINITY,
            },
        ];
        for orbit in degenerate {
            let mut config = PipelineConfig::color_cube(dir());
            config.orbit = orbit;
            assert!(matches!(config.validate(), Err(ConfigError::Orbit(_))), "{orbit:?}");
        }
    }

    #[test]
    fn accepted_orbits_give_a_finite_mvp() {
        let mut config = PipelineConfig::color_cube(dir());
        config.orbit = OrbitPolicy::Level {
            radius: 0.5,
            height: -2.0,
        };
        config.validate().unwrap();

        let view = crate::camera::Camera::new(config.orbit).view(1.25);
        let mvp = crate::camera::mvp(config.projection().matrix(), view, glam::Mat4::IDENTITY);
        assert!(mvp.is_finite());
    }

    #[test]
    fn rejects_bad_rate_window() {
        let mut config = PipelineConfig::dual_triangles(dir());
        config.rate.sample_frame = 0;
        assert!(matches!(config.validate(), Err(ConfigError::SampleFrame { .. })));
    }
}
