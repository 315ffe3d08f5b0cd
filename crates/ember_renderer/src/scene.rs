//! Demo scenes.

use crate::sampling::{gen_f32, random_color};
use crate::{BuildError, Color, ImageFilter, Material, SceneBuilder, Texture};
use ember_core::{Mesh, RgbImage};
use ember_math::{Mat3, Vec3};
use rand::RngCore;
use std::f32::consts::FRAC_PI_4;
use std::sync::Arc;

const GROUND_RADIUS: f32 = 1000.0;
const SMALL_RADIUS: f32 = 0.2;

/// Field of small random spheres around three large ones.
///
/// The small spheres sit on the curved ground and are 60% diffuse, 20%
/// metal and 20% glass.
pub fn random_scene(rng: &mut dyn RngCore) -> SceneBuilder {
    let mut builder = SceneBuilder::new();

    let ground_center = Vec3::new(0.0, -GROUND_RADIUS, 0.0);
    builder.add_sphere(ground_center, GROUND_RADIUS, Material::lambertian(Color::splat(0.5)));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                SMALL_RADIUS,
                b as f32 + 0.9 * gen_f32(rng),
            );

            // Rest the sphere on the ground's surface
            let direction = (center - ground_center).normalize();
            let center = ground_center + direction * (GROUND_RADIUS + SMALL_RADIUS);

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material = if choose_mat < 0.6 {
                Material::lambertian(random_color(rng) * random_color(rng))
            } else if choose_mat < 0.8 {
                let albedo = 0.5 * (Color::ONE + random_color(rng));
                Material::metal(albedo, 0.5 * gen_f32(rng))
            } else {
                Material::dielectric(1.5)
            };
            builder.add_sphere(center, SMALL_RADIUS, material);
        }
    }

    builder.add_sphere(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Material::lambertian(Color::new(0.4, 0.2, 0.1)),
    );
    builder.add_sphere(Vec3::new(0.0, 1.0, 0.0), 1.0, Material::dielectric(1.5));
    builder.add_sphere(Vec3::new(4.0, 1.0, 0.0), 1.0, Material::metal(Color::ONE, 0.0));

    builder
}

/// The random scene plus a mesh and the remaining surface types.
///
/// Adds a mirrored pyramid, a hollow glass bubble, a procedural-ramp
/// sphere, a random-albedo sphere and, when given, an image-textured
/// sphere.
pub fn showcase_scene(
    rng: &mut dyn RngCore,
    texture: Option<Arc<RgbImage>>,
) -> Result<SceneBuilder, BuildError> {
    let mut builder = random_scene(rng);

    let mut pyramid = Mesh::pyramid(1.6, 1.4);
    pyramid.transform(&Mat3::from_rotation_y(FRAC_PI_4));
    pyramid.translate(Vec3::new(2.0, 0.0, 2.2));
    builder.add_mesh(pyramid, Material::metal(Color::new(0.7, 0.6, 0.5), 0.05))?;

    // Glass bubble: outer surface plus an inward-facing inner surface
    let bubble = Vec3::new(2.0, 0.6, -2.0);
    builder.add_sphere(bubble, 0.6, Material::dielectric(1.5));
    builder.add_sphere(bubble, -0.55, Material::dielectric(1.5));

    builder.add_sphere(
        Vec3::new(-2.0, 0.6, 2.0),
        0.6,
        Material::lambertian_texture(Texture::UvRamp(Color::new(1.0, 1.0, 0.5))),
    );
    builder.add_sphere(Vec3::new(-2.0, 0.5, -2.0), 0.5, Material::random_albedo());

    if let Some(image) = texture {
        builder.add_sphere(
            Vec3::new(0.0, 0.7, 2.5),
            0.7,
            Material::lambertian_texture(Texture::image(image, ImageFilter::Bilinear)),
        );
    }

    Ok(builder)
}
