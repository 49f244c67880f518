use crate::core_modules::pixel::pixel::Pixel;
use crate::core_modules::pixel_buffer::{Channel, PixelBuffer};

/// Keeps only `channel`, zeroing the other two. No thresholding.
pub fn isolate_channel(buffer: &PixelBuffer, channel: Channel) -> PixelBuffer {
    buffer.map_pixels(|pixel| {
        let mut out = Pixel::new(0, 0, 0, 255);
        match channel {
            Channel::Red => out.red = pixel.red,
            Channel::Green => out.green = pixel.green,
            Channel::Blue => out.blue = pixel.blue,
        }
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolates_each_channel_verbatim() {
        let buffer = PixelBuffer::filled(2, 2, Pixel::new(10, 20, 30, 40));
        assert_eq!(isolate_channel(&buffer, Channel::Red).pixel(1, 1), Pixel::new(10, 0, 0, 255));
        assert_eq!(isolate_channel(&buffer, Channel::Green).pixel(0, 1), Pixel::new(0, 20, 0, 255));
        assert_eq!(isolate_channel(&buffer, Channel::Blue).pixel(1, 0), Pixel::new(0, 0, 30, 255));
    }
}
