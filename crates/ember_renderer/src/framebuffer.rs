//! Double-buffered output image.
//!
//! Workers write finished tiles into the back buffer under a lock. The
//! presenting side copies the back buffer into its own front buffer with
//! [`FrameBuffer::swap_into`], so it never reads while a tile is half
//! written.

use crate::pool::lock;
use crate::Tile;
use ember_core::Rgb8;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    back: Mutex<Vec<Rgb8>>,
    pixels_written: AtomicUsize,
}

impl FrameBuffer {
    /// Create a black frame buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            back: Mutex::new(vec![[0; 3]; width as usize * height as usize]),
            pixels_written: AtomicUsize::new(0),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Copy a finished tile's pixels (row-major, tile-local) into place.
    pub fn insert_tile(&self, tile: &Tile, pixels: &[Rgb8]) {
        debug_assert_eq!(pixels.len(), tile.pixel_count());
        debug_assert!(tile.x + tile.width <= self.width && tile.y + tile.height <= self.height);

        let tile_width = tile.width as usize;
        let mut back = lock(&self.back);
        for (row, src) in pixels.chunks_exact(tile_width).enumerate() {
            let start = (tile.y as usize + row) * self.width as usize + tile.x as usize;
            back[start..start + tile_width].copy_from_slice(src);
        }
        drop(back);

        self.pixels_written.fetch_add(pixels.len(), Ordering::Relaxed);
    }

    /// Replace `front` with a copy of the current back buffer.
    pub fn swap_into(&self, front: &mut Vec<Rgb8>) {
        let back = lock(&self.back);
        front.clear();
        front.extend_from_slice(&back);
    }

    /// Total pixels inserted so far.
    pub fn pixels_written(&self) -> usize {
        self.pixels_written.load(Ordering::Relaxed)
    }

    /// Fraction of the image written, in [0, 1].
    pub fn progress(&self) -> f32 {
        let total = self.width as usize * self.height as usize;
        if total == 0 {
            return 1.0;
        }
        (self.pixels_written() as f32 / total as f32).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_tile_places_rows() {
        let fb = FrameBuffer::new(4, 3);
        let tile = Tile::new(1, 1, 2, 2, 0);
        fb.insert_tile(&tile, &[[1, 1, 1], [2, 2, 2], [3, 3, 3], [4, 4, 4]]);

        let mut front = Vec::new();
        fb.swap_into(&mut front);
        assert_eq!(front.len(), 12);
        assert_eq!(front[5], [1, 1, 1]);
        assert_eq!(front[6], [2, 2, 2]);
        assert_eq!(front[9], [3, 3, 3]);
        assert_eq!(front[10], [4, 4, 4]);
        assert_eq!(front[0], [0, 0, 0]);
        assert_eq!(fb.pixels_written(), 4);
        assert!((fb.progress() - 4.0 / 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_front_is_a_snapshot() {
        let fb = FrameBuffer::new(2, 1);
        let mut front = Vec::new();
        fb.swap_into(&mut front);

        fb.insert_tile(&Tile::new(0, 0, 2, 1, 0), &[[9, 9, 9], [9, 9, 9]]);
        assert_eq!(front, vec![[0, 0, 0]; 2]);

        fb.swap_into(&mut front);
        assert_eq!(front, vec![[9, 9, 9]; 2]);
        assert_eq!(fb.progress(), 1.0);
    }
}
