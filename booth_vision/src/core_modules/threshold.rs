// THEORY:
// Thresholding turns one scalar per pixel into a black/white mask. All three
// operators share the same rule, `scalar > threshold` → 255, otherwise 0, and differ
// only in which scalar they read: a raw channel, the HSV value rescaled to 0..255,
// or unclamped Rec. 601 luma.

use crate::core_modules::pixel::pixel::Pixel;
use crate::core_modules::pixel_buffer::{Channel, PixelBuffer};

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

#[inline]
fn mask(passes: bool) -> Pixel {
    Pixel::gray(if passes { FOREGROUND } else { BACKGROUND })
}

/// White where the selected channel is strictly above `threshold`.
pub fn channel_threshold(buffer: &PixelBuffer, channel: Channel, threshold: u8) -> PixelBuffer {
    buffer.map_pixels(|pixel| mask(channel.of(&pixel) > threshold))
}

/// White where HSV value, rescaled to 0..255, is strictly above `threshold`.
pub fn value_threshold(buffer: &PixelBuffer, threshold: u8) -> PixelBuffer {
    buffer.map_pixels(|pixel| {
        // Snap to the byte grid: v / 255 * 255 can land a hair above v.
        let value = (pixel.value_hsv() * 255.0).round();
        mask(value > threshold as f64)
    })
}

/// White where unclamped luma is strictly above `threshold`.
pub fn luminance_threshold(buffer: &PixelBuffer, threshold: u8) -> PixelBuffer {
    buffer.map_pixels(|pixel| mask(pixel.luminance() > threshold as f64))
}
