//! Surface color lookup.

use crate::{Color, HitRecord};
use ember_core::RgbImage;
use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

/// Filtering used when sampling an image texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFilter {
    Nearest,
    #[default]
    Bilinear,
}

/// A color source evaluated at a hit point.
#[derive(Debug, Clone)]
pub enum Texture {
    /// The same color everywhere
    Constant(Color),
    /// A procedural ramp over the hit's (u, v), tinted by the given color
    UvRamp(Color),
    /// A shared image sampled at the hit's (u, v) with wrap-around addressing
    Image {
        image: Arc<RgbImage>,
        filter: ImageFilter,
    },
}

impl Texture {
    pub fn image(image: Arc<RgbImage>, filter: ImageFilter) -> Self {
        Texture::Image { image, filter }
    }

    /// Evaluate the texture for a hit.
    pub fn value(&self, rec: &HitRecord) -> Color {
        let (u, v) = (rec.uv.x, rec.uv.y);
        match self {
            Texture::Constant(color) => *color,
            Texture::UvRamp(tint) => {
                *tint * Color::new((v * FRAC_PI_2).sin(), (u * FRAC_PI_2).sin(), 1.0)
            }
            Texture::Image { image, filter } => match filter {
                ImageFilter::Nearest => image.sample_nearest(u, v),
                ImageFilter::Bilinear => image.sample_bilinear(u, v),
            },
        }
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Constant(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Material;
    use ember_math::{Vec2, Vec3};

    fn record_at(material: &Material, u: f32, v: f32) -> HitRecord<'_> {
        HitRecord {
            t: 1.0,
            p: Vec3::ZERO,
            normal: Vec3::Z,
            material,
            uv: Vec2::new(u, v),
        }
    }

    #[test]
    fn test_constant() {
        let mat = Material::random_albedo();
        let tex = Texture::from(Color::new(0.1, 0.2, 0.3));
        assert_eq!(tex.value(&record_at(&mat, 0.7, 0.2)), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_uv_ramp() {
        let mat = Material::random_albedo();
        let tex = Texture::UvRamp(Color::ONE);

        let c = tex.value(&record_at(&mat, 0.0, 0.0));
        assert!(c.abs_diff_eq(Color::new(0.0, 0.0, 1.0), 1e-6));

        let c = tex.value(&record_at(&mat, 1.0, 1.0));
        assert!(c.abs_diff_eq(Color::ONE, 1e-6));

        let c = Texture::UvRamp(Color::splat(0.5)).value(&record_at(&mat, 1.0, 0.0));
        assert!(c.abs_diff_eq(Color::new(0.0, 0.5, 0.5), 1e-6));
    }

    #[test]
    fn test_image_filters() {
        let mat = Material::random_albedo();
        let strip = vec![[0, 0, 0], [255, 255, 255], [255, 0, 0]];
        let image = Arc::new(RgbImage::new(3, 1, strip).unwrap());

        let nearest = Texture::image(image.clone(), ImageFilter::Nearest);
        assert_eq!(nearest.value(&record_at(&mat, 0.5, 0.0)), Color::ONE);
        assert_eq!(nearest.value(&record_at(&mat, 0.0, 0.0)), Color::ZERO);
        // wraps back into the middle texel
        assert_eq!(nearest.value(&record_at(&mat, 1.5, 0.0)), Color::ONE);

        let bilinear = Texture::image(image, ImageFilter::Bilinear);
        let c = bilinear.value(&record_at(&mat, 0.25, 0.0));
        assert!(c.abs_diff_eq(Color::splat(0.5), 1e-5));
    }
}
