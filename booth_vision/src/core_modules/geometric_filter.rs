// THEORY:
// Geometric filters move or pool pixels instead of recolouring them.
// `mirror_horizontal` is a pure index permutation. `pixelate` pools the buffer into
// tiles and emits one filled circle per tile; it produces drawing commands rather
// than a buffer because the circles are meant to be rasterised straight onto the
// destination cell.

use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::core_modules::render::{Paint, RenderCommand};
use crate::core_modules::tile::tile::tiles;

pub const DEFAULT_BLOCK_SIZE: u32 = 5;

/// Reflects the buffer about its vertical centre line.
pub fn mirror_horizontal(buffer: &PixelBuffer) -> PixelBuffer {
    let (width, height) = buffer.dimensions();
    let mut out = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            out.put_pixel(width - 1 - x, y, buffer.pixel(x, y));
        }
    }
    out
}

/// One gray circle per `block_size`² tile, centred at `tile origin + block_size / 2`
/// in buffer-local coordinates.
pub fn pixelate(buffer: &PixelBuffer, block_size: u32) -> Vec<RenderCommand> {
    let half = block_size as f32 / 2.0;
    tiles(buffer, block_size)
        .iter()
        .map(|tile| RenderCommand::FillCircle {
            cx: tile.x as f32 + half,
            cy: tile.y as f32 + half,
            diameter: block_size as f32,
            paint: Paint::gray(tile.average_gray() as f32),
        })
        .collect()
}
