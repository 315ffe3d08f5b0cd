//! Ember Core - data handed to the renderer by its collaborators.
//!
//! This crate provides:
//!
//! - **Mesh buffers**: [`Mesh`], a vertex buffer plus a triangle index buffer
//! - **Texture images**: [`RgbImage`], an RGB8 image with UV sampling
//!
//! File formats are the business of whoever fills these types in; the only
//! decoder wired in here is the `image` crate behind [`RgbImage::open`].

pub mod mesh;
pub mod rgb_image;

pub use mesh::{Mesh, MeshError};
pub use rgb_image::{ImageError, ImageResult, Rgb8, RgbImage};
