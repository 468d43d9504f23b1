use std::f64::consts::TAU;

use glam::{Mat4, Vec3};

/// Path followed by the eye around the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum OrbitPolicy {
    /// Eye at `(r cos θ, r sin θ, r)`: a circle of radius `r` around the Z
    /// axis, lifted to `z = r`.
    Tilted { radius: f32 },

    /// Eye at `(r sin θ, h, r cos θ)`: a horizontal circle of radius `r`
    /// around the Y axis at height `h`.
    Level { radius: f32, height: f32 },
}

impl OrbitPolicy {
    pub fn radius(&self) -> f32 {
        match *self {
            Self::Tilted { radius } | Self::Level { radius, .. } => radius,
        }
    }

    /// Whether the eye stays off the orbit axis and every coordinate is finite.
    ///
    /// A zero radius puts the eye on the up axis or on the target, where the
    /// look-at basis is undefined.
    pub fn is_valid(&self) -> bool {
        match *self {
            Self::Tilted { radius } => radius.is_finite() && radius > 0.0,
            Self::Level { radius, height } => {
                radius.is_finite() && radius > 0.0 && height.is_finite()
            }
        }
    }

    /// Eye position for an orbit angle in radians.
    pub fn eye_at_angle(&self, theta: f32) -> Vec3 {
        let (sin, cos) = theta.sin_cos();
        match *self {
            Self::Tilted { radius: r } => Vec3::new(r * cos, r * sin, r),
            Self::Level { radius: r, height } => Vec3::new(r * sin, height, r * cos),
        }
    }

    /// Distance from `point` to the axis this orbit circles.
    pub fn axis_distance(&self, point: Vec3) -> f32 {
        match self {
            Self::Tilted { .. } => point.truncate().length(),
            Self::Level { .. } => Vec3::new(point.x, 0.0, point.z).length(),
        }
    }
}

/// Orbiting look-at camera.
///
/// One radian of orbit per second of elapsed time. The eye always looks at
/// `target` with `up` as the head direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub policy: OrbitPolicy,
    pub target: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub fn new(policy: OrbitPolicy) -> Self {
        Self {
            policy,
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }

    /// Orbit angle for `elapsed` seconds, reduced into `[0, 2π)`.
    ///
    /// Reduction happens in `f64` so the `f32` angle keeps full precision on
    /// long runs; the resulting eye position is unchanged.
    pub fn angle(elapsed: f64) -> f32 {
        elapsed.rem_euclid(TAU) as f32
    }

    pub fn eye(&self, elapsed: f64) -> Vec3 {
        self.policy.eye_at_angle(Self::angle(elapsed))
    }

    /// Right-handed view matrix for `elapsed` seconds.
    pub fn view(&self, elapsed: f64) -> Mat4 {
        Mat4::look_at_rh(self.eye(elapsed), self.target, self.up)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    const EPS: f32 = 1e-5;

    fn tilted() -> Camera {
        Camera::new(OrbitPolicy::Tilted { radius: 1.5 })
    }

    fn level() -> Camera {
        Camera::new(OrbitPolicy::Level {
            radius: 6.0,
            height: 3.0,
        })
    }

    fn samples() -> impl Iterator<Item = f64> {
        (0..200).map(|i| i as f64 * 0.37)
    }

    #[test]
    fn tilted_eye_at_known_angles() {
        let cam = tilted();
        assert!(cam.eye(0.0).abs_diff_eq(Vec3::new(1.5, 0.0, 1.5), EPS));
        assert!(cam.eye(FRAC_PI_2).abs_diff_eq(Vec3::new(0.0, 1.5, 1.5), EPS));
    }

    #[test]
    fn level_eye_at_known_angles() {
        let cam = level();
        assert!(cam.eye(0.0).abs_diff_eq(Vec3::new(0.0, 3.0, 6.0), EPS));
        assert!(cam.eye(FRAC_PI_2).abs_diff_eq(Vec3::new(6.0, 3.0, 0.0), 1e-4));
    }

    #[test]
    fn eye_stays_on_the_orbit() {
        for cam in [tilted(), level()] {
            for t in samples() {
                let eye = cam.eye(t);
                let r = cam.policy.axis_distance(eye);
                assert!((r - cam.policy.radius()).abs() < 1e-4, "t={t} r={r}");
            }
        }
    }

    #[test]
    fn level_orbit_keeps_its_height() {
        let cam = level();
        for t in samples() {
            assert_eq!(cam.eye(t).y, 3.0);
        }
    }

    #[test]
    fn view_up_axis_is_orthogonal_to_view_direction() {
        for cam in [tilted(), level()] {
            for t in samples() {
                let view = cam.view(t);
                let up = view.row(1).truncate();
                let back = view.row(2).truncate();
                assert!(up.dot(back).abs() < 1e-5, "t={t}");
                assert!((up.length() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn view_maps_target_onto_the_view_axis() {
        let cam = level();
        let t = 1.25;
        let eye = cam.eye(t);
        let origin_in_view = cam.view(t).transform_point3(Vec3::ZERO);
        assert!(origin_in_view.x.abs() < 1e-5);
        assert!(origin_in_view.y.abs() < 1e-5);
        assert!((origin_in_view.z + eye.length()).abs() < 1e-4);
    }

    #[test]
    fn view_changes_as_time_advances() {
        let cam = tilted();
        assert_ne!(cam.view(1.0), cam.view(1.1));
    }

    #[test]
    fn angle_is_range_reduced() {
        let long_run = 1.0e7;
        let angle = Camera::angle(long_run);
        assert!((0.0..std::f32::consts::TAU).contains(&angle));

        let reduced = long_run.rem_euclid(TAU);
        let cam = tilted();
        assert!(cam.eye(long_run).abs_diff_eq(cam.eye(reduced), EPS));
    }
}
