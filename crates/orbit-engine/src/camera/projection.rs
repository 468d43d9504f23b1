use glam::Mat4;

/// Constant perspective projection.
///
/// The matrix is computed once at construction and never changes. Depth maps
/// to wgpu's `[0, 1]` clip range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    fov_y_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
    matrix: Mat4,
}

impl Projection {
    pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_degrees,
            aspect,
            near,
            far,
            matrix: Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect, near, far),
        }
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn fov_y_degrees(&self) -> f32 {
        self.fov_y_degrees
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn clip_planes(&self) -> (f32, f32) {
        (self.near, self.far)
    }
}

impl Default for Projection {
    /// 45° vertical field of view, 4:3, clip range 0.1..100.
    fn default() -> Self {
        Self::perspective(45.0, 4.0 / 3.0, 0.1, 100.0)
    }
}

/// Composes the per-frame transform: `projection * view * model`.
///
/// Projection is applied last to a vertex.
#[inline]
pub fn mvp(projection: Mat4, view: Mat4, model: Mat4) -> Mat4 {
    projection * view * model
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4};

    use super::*;
    use crate::camera::{Camera, OrbitPolicy};

    #[test]
    fn projection_is_constant() {
        let p = Projection::default();
        let first = p.matrix();
        for _ in 0..10 {
            assert_eq!(p.matrix(), first);
        }
        assert_eq!(p.clip_planes(), (0.1, 100.0));
        assert_eq!(p.aspect(), 4.0 / 3.0);
    }

    #[test]
    fn near_and_far_map_to_depth_range() {
        let p = Projection::default().matrix();

        let near = p * Vec4::new(0.0, 0.0, -0.1, 1.0);
        let far = p * Vec4::new(0.0, 0.0, -100.0, 1.0);

        assert!((near.z / near.w).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-5);
    }

    #[test]
    fn mvp_is_projection_times_view_times_model() {
        let cam = Camera::new(OrbitPolicy::Tilted { radius: 1.5 });
        let p = Projection::default().matrix();
        let v = cam.view(0.8);

        assert_eq!(mvp(p, v, Mat4::IDENTITY), p * v);

        let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let point = Vec3::new(0.25, -0.5, 0.1);
        let composed = mvp(p, v, model).project_point3(point);
        let stepwise = p.project_point3(v.transform_point3(model.transform_point3(point)));
        assert!(composed.abs_diff_eq(stepwise, 1e-4));
    }

    #[test]
    fn order_matters() {
        let cam = Camera::new(OrbitPolicy::Level {
            radius: 6.0,
            height: 3.0,
        });
        let p = Projection::default().matrix();
        let v = cam.view(2.0);
        assert_ne!(mvp(p, v, Mat4::IDENTITY), v * p);
    }
}
