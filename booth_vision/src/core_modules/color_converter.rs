// THEORY:
// Colour-space conversions over a whole buffer. Each function is a single pass
// that reads a `Pixel`, asks it for one of its single-pixel heuristics and writes
// an opaque result. They never read neighbours and never touch the input.

use crate::core_modules::pixel::pixel::{Pixel, hsv_to_rgb, to_channel};
use crate::core_modules::pixel_buffer::PixelBuffer;

/// Darkening applied on top of the plain gray mean.
pub const DARKEN_FACTOR: f64 = 0.8;

/// Gray mean reduced by 20%: `clamp(((R + G + B) / 3) * 0.8, 0, 255)`.
pub fn to_grayscale_darkened(buffer: &PixelBuffer) -> PixelBuffer {
    buffer.map_pixels(|pixel| Pixel::gray(to_channel(pixel.gray_mean() * DARKEN_FACTOR)))
}

/// Plain gray mean `(R + G + B) / 3` with no brightness change.
pub fn to_grayscale(buffer: &PixelBuffer) -> PixelBuffer {
    buffer.map_pixels(|pixel| Pixel::gray(to_channel(pixel.gray_mean())))
}

/// Converts each pixel to HSV and renders the triple back to displayable RGB.
pub fn to_hsv(buffer: &PixelBuffer) -> PixelBuffer {
    buffer.map_pixels(|pixel| {
        let (hue, saturation, value) = pixel.hsv();
        let (r, g, b) = hsv_to_rgb(hue, saturation, value);
        Pixel::new(to_channel(r), to_channel(g), to_channel(b), 255)
    })
}

/// Luma only: Y replicated into R, G and B.
pub fn to_ycbcr(buffer: &PixelBuffer) -> PixelBuffer {
    buffer.map_pixels(|pixel| Pixel::gray(to_channel(pixel.luminance())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(r: u8, g: u8, b: u8) -> PixelBuffer {
        PixelBuffer::filled(1, 1, Pixel::new(r, g, b, 7))
    }

    #[test]
    fn darkened_grayscale_matches_formula() {
        let out = to_grayscale_darkened(&single(30, 60, 90));
        // (30 + 60 + 90) / 3 = 60, * 0.8 = 48
        assert_eq!(out.pixel(0, 0), Pixel::new(48, 48, 48, 255));
    }

    #[test]
    fn darkened_white_stays_in_range() {
        let out = to_grayscale_darkened(&single(255, 255, 255));
        assert_eq!(out.pixel(0, 0), Pixel::gray(204));
    }

    #[test]
    fn plain_grayscale_is_undarkened() {
        let out = to_grayscale(&single(30, 60, 90));
        assert_eq!(out.pixel(0, 0), Pixel::gray(60));
    }

    #[test]
    fn hsv_of_primaries_renders_back_unchanged() {
        let buffer = PixelBuffer::from_fn(3, 1, |x, _| match x {
            0 => Pixel::new(255, 0, 0, 255),
            1 => Pixel::new(0, 255, 0, 255),
            _ => Pixel::new(0, 0, 255, 255),
        });
        let out = to_hsv(&buffer);
        assert_eq!(out, buffer);
    }

    #[test]
    fn ycbcr_extremes() {
        assert_eq!(to_ycbcr(&single(0, 0, 0)).pixel(0, 0), Pixel::gray(0));
        assert_eq!(to_ycbcr(&single(255, 255, 255)).pixel(0, 0), Pixel::gray(255));
    }

    #[test]
    fn outputs_keep_dimensions_and_leave_input_alone() {
        let buffer =
            PixelBuffer::from_fn(7, 5, |x, y| Pixel::new(x as u8 * 30, y as u8 * 40, 99, 10));
        let before = buffer.clone();
        for out in [to_grayscale_darkened(&buffer), to_hsv(&buffer), to_ycbcr(&buffer)] {
            assert_eq!(out.dimensions(), (7, 5));
            assert!(out.pixels().all(|p| p.alpha == 255));
        }
        assert_eq!(buffer, before);
    }
}
