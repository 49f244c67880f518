// THEORY:
// A `Tile` is a rectangular block of pixels cut from a buffer, the spatial pooling
// unit used by pixelation. Like `Pixel`, it is a "dumb" container: it holds the
// samples that fell inside its bounds and knows how to summarise them, nothing more.
//
// Tiling a buffer walks the grid in block-sized steps. Tiles on the right and bottom
// edges are clipped to the buffer, so every sample lands in exactly one tile and
// partial tiles are averaged only over what they actually contain.

pub mod tile {
    use crate::core_modules::pixel::pixel::{Gray, Pixel};
    use crate::core_modules::pixel_buffer::PixelBuffer;

    /// A clipped block of pixels and its top-left position in the source buffer.
    #[derive(Debug, Clone)]
    pub struct Tile {
        pub x: u32,
        pub y: u32,
        /// The in-bounds width of the tile in pixels.
        pub width: u32,
        /// The in-bounds height of the tile in pixels.
        pub height: u32,
        pub pixels: Vec<Pixel>,
    }

    impl Tile {
        /// Mean of per-pixel `(R + G + B) / 3` over the contained samples.
        pub fn average_gray(&self) -> Gray {
            if self.pixels.is_empty() {
                return 0.0;
            }
            let total: u64 = self.pixels.iter().map(|p| p.sum() as u64).sum();
            total as Gray / (3.0 * self.pixels.len() as Gray)
        }
    }

    /// Number of tiles along one axis of `length` pixels.
    pub fn tiles_along(length: u32, block_size: u32) -> u32 {
        length.div_ceil(block_size)
    }

    /// Splits `buffer` into `block_size`² tiles in row-major order.
    pub fn tiles(buffer: &PixelBuffer, block_size: u32) -> Vec<Tile> {
        if block_size == 0 || buffer.is_empty() {
            return Vec::new();
        }
        let (width, height) = buffer.dimensions();
        let count = (tiles_along(width, block_size) * tiles_along(height, block_size)) as usize;
        let mut out = Vec::with_capacity(count);

        for tile_y in (0..height).step_by(block_size as usize) {
            for tile_x in (0..width).step_by(block_size as usize) {
                let tile_width = block_size.min(width - tile_x);
                let tile_height = block_size.min(height - tile_y);
                let mut pixels = Vec::with_capacity((tile_width * tile_height) as usize);
                for dy in 0..tile_height {
                    for dx in 0..tile_width {
                        pixels.push(buffer.pixel(tile_x + dx, tile_y + dy));
                    }
                }
                out.push(Tile {
                    x: tile_x,
                    y: tile_y,
                    width: tile_width,
                    height: tile_height,
                    pixels,
                });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::tile::*;
    use crate::core_modules::pixel::pixel::Pixel;
    use crate::core_modules::pixel_buffer::PixelBuffer;

    #[test]
    fn edge_tiles_are_clipped() {
        let buffer = PixelBuffer::new(12, 7);
        let tiles = tiles(&buffer, 5);
        assert_eq!(tiles.len(), 3 * 2);
        let last = tiles.last().expect("six tiles");
        assert_eq!((last.x, last.y, last.width, last.height), (10, 5, 2, 2));
        let covered: usize = tiles.iter().map(|t| t.pixels.len()).sum();
        assert_eq!(covered, 12 * 7);
    }

    #[test]
    fn average_gray_is_mean_of_pixel_means() {
        let buffer = PixelBuffer::from_fn(2, 1, |x, _| {
            if x == 0 { Pixel::new(30, 30, 30, 255) } else { Pixel::new(90, 0, 0, 255) }
        });
        let tiles = tiles(&buffer, 5);
        // (30 + 30) / 2
        assert_eq!(tiles[0].average_gray(), 30.0);
    }

    #[test]
    fn zero_block_size_yields_nothing() {
        assert!(tiles(&PixelBuffer::new(4, 4), 0).is_empty());
    }
}
