//! RGB8 images used as textures.
//!
//! The renderer samples these by UV coordinate. Decoding from disk goes
//! through the `image` crate; anything else can build an [`RgbImage`]
//! directly from raw pixels.

use std::path::Path;

use ember_math::Vec3;
use thiserror::Error;

/// One RGB pixel, 8 bits per channel.
pub type Rgb8 = [u8; 3];

/// Errors that can occur while creating or loading an image.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to load image {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Pixel buffer holds {actual} pixels, expected {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },

    #[error("Image has zero width or height")]
    Empty,
}

pub type ImageResult<T> = Result<T, ImageError>;

/// An RGB image with 8-bit channels, row-major, row 0 at `v = 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct RgbImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgb8>,
}

impl RgbImage {
    /// Create an image from raw pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<Rgb8>) -> ImageResult<Self> {
        if width == 0 || height == 0 {
            return Err(ImageError::Empty);
        }
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(ImageError::SizeMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Load an image from a file path.
    pub fn open(path: impl AsRef<Path>) -> ImageResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| ImageError::Load {
            path: path.display().to_string(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb.pixels().map(|p| p.0).collect();

        log::debug!("Loaded image: {} ({}x{})", path.display(), width, height);

        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb8] {
        &self.pixels
    }

    /// Get pixel at integer coordinates, clamped to the image edges.
    pub fn get(&self, x: u32, y: u32) -> Rgb8 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels[(y * self.width + x) as usize]
    }

    /// Sample the nearest texel at UV coordinates. Returns a color in [0, 1].
    pub fn sample_nearest(&self, u: f32, v: f32) -> Vec3 {
        let (x, y) = self.texel_coords(u, v);
        to_color(self.get(x.floor() as u32, y.floor() as u32))
    }

    /// Sample the texture at UV coordinates with bilinear filtering.
    pub fn sample_bilinear(&self, u: f32, v: f32) -> Vec3 {
        let (x, y) = self.texel_coords(u, v);

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let p00 = to_color(self.get(x0, y0));
        let p10 = to_color(self.get(x0 + 1, y0));
        let p01 = to_color(self.get(x0, y0 + 1));
        let p11 = to_color(self.get(x0 + 1, y0 + 1));

        let top = p00 * (1.0 - fx) + p10 * fx;
        let bottom = p01 * (1.0 - fx) + p11 * fx;
        top * (1.0 - fy) + bottom * fy
    }

    /// Map UV to continuous texel coordinates in `[0, size - 1]`.
    fn texel_coords(&self, u: f32, v: f32) -> (f32, f32) {
        let u = wrap_coord(u);
        let v = wrap_coord(v);
        (
            u * (self.width - 1) as f32,
            v * (self.height - 1) as f32,
        )
    }
}

/// Bring a texture coordinate back into `[0, 1]`.
///
/// Values past 1 wrap around; negative values are reflected.
fn wrap_coord(c: f32) -> f32 {
    let c = if c >= 1.0 { c - c.floor() } else { c };
    if c < 0.0 {
        c.ceil() - c
    } else {
        c
    }
}

fn to_color(p: Rgb8) -> Vec3 {
    Vec3::new(p[0] as f32, p[1] as f32, p[2] as f32) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> RgbImage {
        // 2x2: black, white / red, blue
        RgbImage::new(
            2,
            2,
            vec![[0, 0, 0], [255, 255, 255], [255, 0, 0], [0, 0, 255]],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_bad_sizes() {
        assert!(matches!(
            RgbImage::new(2, 2, vec![[0, 0, 0]; 3]),
            Err(ImageError::SizeMismatch { actual: 3, .. })
        ));
        assert!(matches!(RgbImage::new(0, 2, vec![]), Err(ImageError::Empty)));
    }

    #[test]
    fn test_sample_nearest_corners() {
        let img = checker();

        assert_eq!(img.sample_nearest(0.0, 0.0), Vec3::ZERO);
        assert_eq!(img.sample_nearest(0.99, 0.0), Vec3::ZERO);
        assert_eq!(img.sample_nearest(1.0, 0.0), Vec3::ZERO); // wraps to 0
        assert_eq!(img.sample_nearest(0.0, 0.99), Vec3::ZERO);
    }

    #[test]
    fn test_sample_bilinear_center_is_average() {
        let img = checker();
        let c = img.sample_bilinear(0.5, 0.5);

        // (black + white + red + blue) / 4
        assert!((c.x - 0.5).abs() < 1e-4);
        assert!((c.y - 0.25).abs() < 1e-4);
        assert!((c.z - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_sample_bilinear_at_edge_stays_in_bounds() {
        let img = checker();
        let c = img.sample_bilinear(0.999_999, 0.999_999);
        assert!(c.max_element() <= 1.0);
    }

    #[test]
    fn test_wrap_coord() {
        assert_eq!(wrap_coord(0.25), 0.25);
        assert!((wrap_coord(1.25) - 0.25).abs() < 1e-6);
        assert!((wrap_coord(-0.25) - 0.25).abs() < 1e-6);
        assert!((wrap_coord(-1.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_open_missing_file() {
        let err = RgbImage::open("definitely/not/here.png").unwrap_err();
        assert!(matches!(err, ImageError::Load { .. }));
    }
}
