//! Tile-based parallel rendering.
//!
//! The image is bisected recursively until each tile holds at most a
//! threshold number of pixels. Both halves of every split are rendered
//! concurrently with `rayon::join`; leaf tiles render their pixels
//! sequentially and hand back their own pixel buffer, so no two workers
//! ever touch the same memory.

use crate::Color;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of the tile's top-left corner
    pub x: u32,
    /// Y coordinate of the tile's top-left corner
    pub y: u32,
    /// Width of the tile in pixels
    pub width: u32,
    /// Height of the tile in pixels
    pub height: u32,
}

impl Tile {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// The tile covering a whole image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Get the total number of pixels in this tile.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Halve the tile along its longer side (width on ties).
    ///
    /// The first half gets the smaller share when the side is odd.
    pub fn split(&self) -> (Tile, Tile) {
        if self.width >= self.height {
            let left = self.width / 2;
            (
                Tile::new(self.x, self.y, left, self.height),
                Tile::new(self.x + left, self.y, self.width - left, self.height),
            )
        } else {
            let top = self.height / 2;
            (
                Tile::new(self.x, self.y, self.width, top),
                Tile::new(self.x, self.y + top, self.width, self.height - top),
            )
        }
    }
}

/// Result of rendering one leaf tile.
#[derive(Debug, Clone)]
pub struct TileResult {
    /// The tile that was rendered
    pub tile: Tile,
    /// Pixel colors, row-major within the tile
    pub pixels: Vec<Color>,
}

/// Render a single tile sequentially.
pub fn render_tile<F>(tile: Tile, shade: &F) -> TileResult
where
    F: Fn(u32, u32) -> Color + ?Sized,
{
    let mut pixels = Vec::with_capacity(tile.pixel_count() as usize);
    for y in tile.y..tile.y + tile.height {
        for x in tile.x..tile.x + tile.width {
            pixels.push(shade(x, y));
        }
    }

    log::trace!(
        "Rendered tile at ({}, {}) size {}x{}",
        tile.x,
        tile.y,
        tile.width,
        tile.height
    );

    TileResult { tile, pixels }
}

/// Render a tile by recursive bisection, in parallel.
///
/// `shade` maps absolute pixel coordinates to a color. Tiles with at most
/// `threshold` pixels are rendered directly on the current worker.
pub fn render_tiles<F>(tile: Tile, threshold: u32, shade: &F) -> Vec<TileResult>
where
    F: Fn(u32, u32) -> Color + Sync + ?Sized,
{
    if tile.pixel_count() <= threshold as u64 {
        return vec![render_tile(tile, shade)];
    }

    let (first, second) = tile.split();
    let (mut results, rest) = rayon::join(
        || render_tiles(first, threshold, shade),
        || render_tiles(second, threshold, shade),
    );
    results.extend(rest);
    results
}

/// The leaf tiles `render_tiles` would produce, in the same order.
#[cfg(test)]
pub(crate) fn leaf_tiles(tile: Tile, threshold: u32) -> Vec<Tile> {
    if tile.pixel_count() <= threshold as u64 {
        return vec![tile];
    }
    let (first, second) = tile.split();
    let mut leaves = leaf_tiles(first, threshold);
    leaves.extend(leaf_tiles(second, threshold));
    leaves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_prefers_width() {
        let (left, right) = Tile::full(10, 10).split();
        assert_eq!(left, Tile::new(0, 0, 5, 10));
        assert_eq!(right, Tile::new(5, 0, 5, 10));

        let (top, bottom) = Tile::new(2, 3, 4, 7).split();
        assert_eq!(top, Tile::new(2, 3, 4, 3));
        assert_eq!(bottom, Tile::new(2, 6, 4, 4));
    }

    #[test]
    fn test_leaves_cover_image_exactly_once() {
        let (width, height) = (37, 23);
        let threshold = 100;
        let leaves = leaf_tiles(Tile::full(width, height), threshold);

        let mut coverage = vec![0u32; (width * height) as usize];
        for leaf in &leaves {
            assert!(leaf.pixel_count() <= threshold as u64);
            assert!(leaf.pixel_count() > 0);
            for y in leaf.y..leaf.y + leaf.height {
                for x in leaf.x..leaf.x + leaf.width {
                    coverage[(y * width + x) as usize] += 1;
                }
            }
        }
        assert!(coverage.iter().all(|&count| count == 1));
    }

    #[test]
    fn test_small_image_is_one_tile() {
        let leaves = leaf_tiles(Tile::full(10, 10), 100);
        assert_eq!(leaves, vec![Tile::full(10, 10)]);
    }

    #[test]
    fn test_render_tiles_matches_leaf_order() {
        let tile = Tile::full(64, 48);
        let shade = |x: u32, y: u32| Color::new(x as f64, y as f64, 0.0);

        let results = render_tiles(tile, 100, &shade);
        let leaves = leaf_tiles(tile, 100);
        assert_eq!(results.len(), leaves.len());

        for (result, leaf) in results.iter().zip(&leaves) {
            assert_eq!(result.tile, *leaf);
            assert_eq!(result.pixels.len() as u64, leaf.pixel_count());
            // Row-major within the tile
            let last = result.pixels[result.pixels.len() - 1];
            assert_eq!(last.x as u32, leaf.x + leaf.width - 1);
            assert_eq!(last.y as u32, leaf.y + leaf.height - 1);
            assert_eq!(result.pixels[0], Color::new(leaf.x as f64, leaf.y as f64, 0.0));
        }
    }
}
