//! Surface scattering.

use crate::sampling::{gen_f32, random_color, random_on_unit_sphere};
use crate::{HitRecord, Texture};
use ember_math::{Ray, Vec3};
use rand::RngCore;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Outcome of a scattering event.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Describes how light interacts with a surface.
///
/// `scatter` returning `None` means the ray was absorbed.
#[derive(Debug, Clone)]
pub enum Material {
    /// Ideal diffuse reflector
    Lambertian { albedo: Texture },
    /// Mirror with optional roughness; fuzz lies in `[0, 1)`
    Metal { albedo: Texture, fuzz: f32 },
    /// Clear glass-like refractor
    Dielectric { ior: f32 },
    /// Diffuse reflector with a fresh random albedo at every hit
    RandomAlbedo,
}

impl Material {
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian {
            albedo: Texture::Constant(albedo),
        }
    }

    pub fn lambertian_texture(albedo: Texture) -> Self {
        Material::Lambertian { albedo }
    }

    /// Create a metal; `fuzz` is clamped to `[0, 1)`.
    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Self::metal_texture(Texture::Constant(albedo), fuzz)
    }

    pub fn metal_texture(albedo: Texture, fuzz: f32) -> Self {
        Material::Metal {
            albedo,
            fuzz: clamp_fuzz(fuzz),
        }
    }

    /// Create a dielectric with the given index of refraction
    /// (1.0 = air, 1.5 = glass, 2.4 = diamond).
    pub fn dielectric(ior: f32) -> Self {
        Material::Dielectric { ior }
    }

    pub fn random_albedo() -> Self {
        Material::RandomAlbedo
    }

    /// Scatter an incoming ray at a hit.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Lambertian { albedo } => {
                Some(diffuse_bounce(rec, albedo.value(rec), rng))
            }
            Material::RandomAlbedo => {
                let albedo = random_color(rng);
                Some(diffuse_bounce(rec, albedo, rng))
            }
            Material::Metal { albedo, fuzz } => {
                let reflected = reflect(ray_in.direction().normalize(), rec.normal);
                let direction = reflected + *fuzz * random_on_unit_sphere(rng);
                // Scattering below the surface is absorbed
                (direction.dot(rec.normal) > 0.0).then(|| ScatterResult {
                    attenuation: albedo.value(rec),
                    scattered: Ray::new(rec.p, direction),
                })
            }
            Material::Dielectric { ior } => {
                let direction = dielectric_direction(ray_in.direction(), rec.normal, *ior, rng);
                Some(ScatterResult {
                    attenuation: Color::ONE,
                    scattered: Ray::new(rec.p, direction),
                })
            }
        }
    }
}

fn diffuse_bounce(rec: &HitRecord, albedo: Color, rng: &mut dyn RngCore) -> ScatterResult {
    let mut direction = rec.normal + random_on_unit_sphere(rng);

    // Catch degenerate scatter direction
    if direction.length_squared() < 1e-8 {
        direction = rec.normal;
    }

    ScatterResult {
        attenuation: albedo,
        scattered: Ray::new(rec.p, direction),
    }
}

/// Pick between reflection and refraction for a dielectric.
///
/// `normal` is the outward surface normal; the ray is inside the object when
/// it travels along it.
fn dielectric_direction(direction: Vec3, normal: Vec3, ior: f32, rng: &mut dyn RngCore) -> Vec3 {
    let d_dot_n = direction.dot(normal);
    let length = direction.length();

    let (facing_normal, ni_over_nt, cosine) = if d_dot_n > 0.0 {
        (-normal, ior, ior * d_dot_n / length)
    } else {
        (normal, 1.0 / ior, -d_dot_n / length)
    };

    match refract(direction, facing_normal, ni_over_nt) {
        Some(refracted) if gen_f32(rng) >= schlick(cosine, ior) => refracted,
        _ => reflect(direction, normal),
    }
}

fn clamp_fuzz(fuzz: f32) -> f32 {
    if fuzz.is_nan() {
        return 0.0;
    }
    fuzz.clamp(0.0, 1.0 - f32::EPSILON)
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract `v` through a surface with normal `n` facing the incoming side.
///
/// Returns `None` on total internal reflection.
pub fn refract(v: Vec3, n: Vec3, ni_over_nt: f32) -> Option<Vec3> {
    let uv = v.normalize();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    (discriminant > 0.0).then(|| ni_over_nt * (uv - n * dt) - n * discriminant.sqrt())
}

/// Schlick's approximation for reflectance
#[inline]
pub fn schlick(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
