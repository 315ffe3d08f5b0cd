//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative bounce loop with a configurable limit
//! - Sky gradient lighting
//! - Gamma correction
//! - Anti-aliasing via multi-sampling

use crate::sampling::gen_f32;
use crate::{Camera, Color, RenderSettings, World};
use ember_core::Rgb8;
use ember_math::{Interval, Ray};
use rand::RngCore;
use std::sync::Arc;

/// Smallest ray parameter accepted after a bounce, to avoid self-hits.
pub const T_MIN: f32 = 0.001;

const GAMMA: f32 = 2.2;

/// Compute the color seen by a ray.
///
/// Attenuation is accumulated over at most `max_bounces` surface
/// interactions. A ray that escapes picks up the sky; an absorbed ray is
/// black; a ray still bouncing after the limit keeps the attenuation
/// gathered so far.
pub fn trace_ray(ray: &Ray, world: &World, max_bounces: u32, rng: &mut dyn RngCore) -> Color {
    let mut attenuation = Color::ONE;
    let mut current = *ray;

    for _ in 0..max_bounces {
        let Some(rec) = world.hit(&current, Interval::new(T_MIN, f32::INFINITY)) else {
            return attenuation * sky_color(&current);
        };

        match rec.material.scatter(&current, &rec, rng) {
            Some(result) => {
                attenuation *= result.attenuation;
                current = result.scattered;
            }
            // Absorbed
            None => return Color::ZERO,
        }
    }

    attenuation
}

/// Sky gradient: white at the horizon blending to light blue overhead.
pub fn sky_color(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.2) and clamp to [0, 1].
#[inline]
pub fn gamma_correct(linear: Color) -> Color {
    linear
        .max(Color::ZERO)
        .powf(1.0 / GAMMA)
        .clamp(Color::ZERO, Color::ONE)
}

/// Quantize a display color in [0, 1] to 8 bits.
pub fn color_to_rgb8(color: Color) -> Rgb8 {
    let c = color.clamp(Color::ZERO, Color::ONE) * 255.0;
    [c.x as u8, c.y as u8, c.z as u8]
}

/// Per-render state shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct Renderer {
    camera: Camera,
    world: Arc<World>,
    samples_per_pixel: u32,
    max_bounces: u32,
}

impl Renderer {
    pub fn new(settings: &RenderSettings, world: Arc<World>) -> Self {
        Self {
            camera: Camera::new(&settings.camera),
            world,
            samples_per_pixel: settings.samples_per_pixel.max(1),
            max_bounces: settings.max_bounces,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Average of jittered samples for image pixel `(x, y)`; row 0 is the top.
    pub fn render_pixel(
        &self,
        x: u32,
        y: u32,
        total_width: u32,
        total_height: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        debug_assert!(x < total_width && y < total_height);
        let mut pixel_color = Color::ZERO;
        let row = total_height.saturating_sub(y).saturating_sub(1) as f32;

        for _ in 0..self.samples_per_pixel {
            let s = (x as f32 + gen_f32(rng)) / total_width as f32;
            let t = (row + gen_f32(rng)) / total_height as f32;
            let ray = self.camera.get_ray(s, t, rng);
            pixel_color += trace_ray(&ray, &self.world, self.max_bounces, rng);
        }

        // Average the samples
        pixel_color / self.samples_per_pixel as f32
    }

    /// Render a `tile_width` x `tile_height` block at the given offset.
    ///
    /// `pixel_setter` is called exactly once per pixel with tile-local
    /// coordinates and the gamma-corrected color. The part of the tile that
    /// hangs over the image edge is skipped.
    #[allow(clippy::too_many_arguments)]
    pub fn render_tile(
        &self,
        mut pixel_setter: impl FnMut(u32, u32, Color),
        total_width: u32,
        total_height: u32,
        tile_width: u32,
        tile_height: u32,
        x_offset: u32,
        y_offset: u32,
        rng: &mut dyn RngCore,
    ) {
        let tile_width = tile_width.min(total_width.saturating_sub(x_offset));
        let tile_height = tile_height.min(total_height.saturating_sub(y_offset));

        for local_y in 0..tile_height {
            for local_x in 0..tile_width {
                let color = self.render_pixel(
                    x_offset + local_x,
                    y_offset + local_y,
                    total_width,
                    total_height,
                    rng,
                );
                pixel_setter(local_x, local_y, gamma_correct(color));
            }
        }
    }
}
