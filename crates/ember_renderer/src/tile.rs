//! Tile layout for concurrent rendering.
//!
//! Divides the image into a grid of tiles (buckets) that workers render
//! independently. Edge tiles are clipped to the image.

use crate::TileOrder;
use ember_math::div_up;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of tile's top-left corner
    pub x: u32,
    /// Y coordinate of tile's top-left corner
    pub y: u32,
    /// Width of the tile in pixels
    pub width: u32,
    /// Height of the tile in pixels
    pub height: u32,
    /// Index of this tile in the render order
    pub index: usize,
}

impl Tile {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self { x, y, width, height, index }
    }

    /// Get the total number of pixels in this tile.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Nominal tile size for an image split into a `grid[0]` x `grid[1]` grid.
pub fn tile_size(width: u32, height: u32, grid: [u32; 2]) -> (u32, u32) {
    (div_up(width, grid[0].max(1)), div_up(height, grid[1].max(1)))
}

/// Cover the image with non-overlapping tiles.
///
/// Tiles are laid out row-major from the top-left corner and then put in
/// the requested order; `index` always reflects the final position.
pub fn generate_tiles(width: u32, height: u32, grid: [u32; 2], order: TileOrder) -> Vec<Tile> {
    let (tile_width, tile_height) = tile_size(width, height, grid);
    let mut tiles = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let tw = tile_width.min(width - x);
            let th = tile_height.min(height - y);
            tiles.push(Tile::new(x, y, tw, th, index));
            index += 1;
            x += tile_width;
        }
        y += tile_height;
    }

    if order == TileOrder::CenterOut {
        sort_center_out(&mut tiles, width, height);
        for (i, tile) in tiles.iter_mut().enumerate() {
            tile.index = i;
        }
    }

    tiles
}

/// Sort tiles by distance from image center, closest first.
fn sort_center_out(tiles: &mut [Tile], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let distance = |t: &Tile| {
        let dx = t.x as f32 + t.width as f32 / 2.0 - center_x;
        let dy = t.y as f32 + t.height as f32 / 2.0 - center_y;
        dx * dx + dy * dy
    };

    tiles.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covered_exactly_once(tiles: &[Tile], width: u32, height: u32) -> bool {
        let mut counts = vec![0u8; (width * height) as usize];
        for tile in tiles {
            for y in tile.y..tile.y + tile.height {
                for x in tile.x..tile.x + tile.width {
                    counts[(y * width + x) as usize] += 1;
                }
            }
        }
        counts.iter().all(|&c| c == 1)
    }

    #[test]
    fn test_tile_size_rounds_up() {
        assert_eq!(tile_size(1920, 1080, [64, 64]), (30, 17));
        assert_eq!(tile_size(100, 100, [3, 3]), (34, 34));
    }

    #[test]
    fn test_generate_tiles_exact_fit() {
        let tiles = generate_tiles(128, 128, [2, 2], TileOrder::Scanline);
        assert_eq!(tiles.len(), 4);
        assert!(covered_exactly_once(&tiles, 128, 128));
    }

    #[test]
    fn test_generate_tiles_partial_fit() {
        let tiles = generate_tiles(100, 70, [3, 4], TileOrder::Scanline);
        let total_pixels: usize = tiles.iter().map(Tile::pixel_count).sum();
        assert_eq!(total_pixels, 100 * 70);
        assert!(covered_exactly_once(&tiles, 100, 70));
    }

    #[test]
    fn test_grid_larger_than_image() {
        let tiles = generate_tiles(5, 3, [64, 64], TileOrder::CenterOut);
        assert_eq!(tiles.len(), 15);
        assert!(covered_exactly_once(&tiles, 5, 3));
    }

    #[test]
    fn test_scanline_order() {
        let tiles = generate_tiles(4, 4, [2, 2], TileOrder::Scanline);
        let origins: Vec<(u32, u32)> = tiles.iter().map(|t| (t.x, t.y)).collect();
        assert_eq!(origins, vec![(0, 0), (2, 0), (0, 2), (2, 2)]);
    }

    #[test]
    fn test_center_out_order() {
        let tiles = generate_tiles(192, 192, [3, 3], TileOrder::CenterOut);
        assert_eq!(tiles.len(), 9); // 3x3 grid

        // First tile should be the center one
        assert_eq!((tiles[0].x, tiles[0].y), (64, 64));
        for (i, tile) in tiles.iter().enumerate() {
            assert_eq!(tile.index, i);
        }
    }
}
