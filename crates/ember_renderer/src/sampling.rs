//! Random sampling helpers shared by the camera and the materials.
//!
//! Everything takes the generator explicitly so each worker thread can
//! drive its own stream.

use crate::Color;
use ember_math::Vec3;
use rand::{Rng, RngCore};
use std::f32::consts::TAU;

/// Uniform float in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniformly distributed direction on the unit sphere.
pub fn random_on_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    let z = 1.0 - 2.0 * gen_f32(rng);
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = TAU * gen_f32(rng);
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Uniformly distributed point in the unit disk on the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    let angle = TAU * gen_f32(rng);
    let radius = gen_f32(rng).sqrt();
    Vec3::new(angle.sin(), angle.cos(), 0.0) * radius
}

/// Color with each channel uniform in `[0, 1)`.
pub fn random_color(rng: &mut dyn RngCore) -> Color {
    Color::new(gen_f32(rng), gen_f32(rng), gen_f32(rng))
}
