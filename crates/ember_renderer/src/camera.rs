//! Camera for ray generation.

use crate::sampling::random_in_unit_disk;
use crate::CameraSettings;
use ember_math::{Ray, Vec3};
use rand::RngCore;

/// Thin-lens camera.
///
/// Rays are generated for normalized image-plane coordinates `(s, t)`, with
/// `(0, 0)` at the lower-left corner and `(1, 1)` at the upper-right.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    // Camera frame basis vectors
    u: Vec3,
    v: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Set up the camera frame from validated settings.
    pub fn new(settings: &CameraSettings) -> Self {
        let theta = settings.vertical_fov.to_radians();
        let half_height = (theta / 2.0).tan();
        let half_width = settings.aspect * half_height;
        let focus = settings.focus_distance;

        let origin = settings.look_from;
        let w = (settings.look_from - settings.look_at).normalize();
        let u = settings.up.cross(w).normalize();
        let v = w.cross(u);

        let lower_left_corner =
            origin - half_width * focus * u - half_height * focus * v - focus * w;

        Self {
            origin,
            lower_left_corner,
            horizontal: 2.0 * half_width * focus * u,
            vertical: 2.0 * half_height * focus * v,
            u,
            v,
            lens_radius: settings.aperture / 2.0,
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Ray through image-plane point `(s, t)`, jittered over the lens.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(self.origin + offset, target - self.origin - offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn looking_down_z() -> CameraSettings {
        CameraSettings {
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            up: Vec3::Y,
            vertical_fov: 90.0,
            aspect: 2.0,
            aperture: 0.0,
            focus_distance: 1.0,
        }
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let mut rng = StdRng::seed_from_u64(0);
        let camera = Camera::new(&CameraSettings::default());
        let settings = CameraSettings::default();

        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        let expected = (settings.look_at - settings.look_from).normalize();
        assert_eq!(ray.origin(), settings.look_from);
        assert!(ray.direction().normalize().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_corners() {
        let mut rng = StdRng::seed_from_u64(0);
        let camera = Camera::new(&looking_down_z());

        // 90 degree fov: half height 1, half width 2 at distance 1
        let lower_left = camera.get_ray(0.0, 0.0, &mut rng);
        assert!(lower_left.direction().abs_diff_eq(Vec3::new(-2.0, -1.0, -1.0), 1e-5));

        let upper_right = camera.get_ray(1.0, 1.0, &mut rng);
        assert!(upper_right.direction().abs_diff_eq(Vec3::new(2.0, 1.0, -1.0), 1e-5));
    }

    #[test]
    fn test_aperture_jitters_origin_but_keeps_focus() {
        let mut rng = StdRng::seed_from_u64(1);
        let settings = CameraSettings {
            aperture: 0.5,
            focus_distance: 3.0,
            ..looking_down_z()
        };
        let camera = Camera::new(&settings);

        let focus_point = Vec3::new(0.0, 0.0, -3.0);
        for _ in 0..50 {
            let ray = camera.get_ray(0.5, 0.5, &mut rng);
            assert!(ray.origin().z.abs() < 1e-6);
            assert!(ray.origin().length() <= 0.25 + 1e-5);
            // Every lens sample converges on the focus plane
            assert!(ray.at(1.0).abs_diff_eq(focus_point, 1e-4));
        }
    }
}
