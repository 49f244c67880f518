pub mod image_helper {
    use crate::core_modules::pixel_buffer::PixelBuffer;
    use crate::error::BoothError;
    use image::ImageEncoder;
    use std::path::Path;

    /// Writes `buffer` as an RGBA PNG.
    pub fn save(path: impl AsRef<Path>, buffer: &PixelBuffer) -> Result<(), BoothError> {
        let output = std::fs::File::create(path)?;
        let encoder = image::codecs::png::PngEncoder::new(output);

        encoder.write_image(
            buffer.as_bytes(),
            buffer.width(),
            buffer.height(),
            image::ExtendedColorType::Rgba8,
        )?;

        Ok(())
    }

    /// Decodes any format the `image` crate understands into RGBA8.
    pub fn load(path: impl AsRef<Path>) -> Result<PixelBuffer, BoothError> {
        let decoded = image::open(path)?;
        Ok(decoded.to_rgba8().into())
    }
}

#[cfg(test)]
mod tests {

    use super::image_helper::*;
    use crate::core_modules::pixel::pixel::Pixel;
    use crate::core_modules::pixel_buffer::PixelBuffer;

    #[test]
    fn save_and_reload_gradient_file() {
        let width = 64u32;
        let height = 48u32;
        let mut intensity = 0u8;
        let buffer = PixelBuffer::from_fn(width, height, |_, _| {
            intensity = intensity.wrapping_add(1);
            Pixel::new(intensity, intensity, intensity, 255)
        });
        let path = std::env::temp_dir().join("booth_vision_gradient_file.png");

        save(&path, &buffer).expect("Error Saving File.");
        let reloaded = load(&path).expect("Error Loading File.");

        assert_eq!(reloaded, buffer);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn save_non_square_file_keeps_orientation() {
        let buffer = PixelBuffer::from_fn(7, 3, |x, y| Pixel::new(x as u8, y as u8, 0, 255));
        let path = std::env::temp_dir().join("booth_vision_wide_file.png");

        save(&path, &buffer).expect("Error Saving File.");
        let reloaded = load(&path).expect("Error Loading File.");

        assert_eq!(reloaded.dimensions(), (7, 3));
        assert_eq!(reloaded.pixel(6, 2), Pixel::new(6, 2, 0, 255));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        assert!(load(std::env::temp_dir().join("booth_vision_does_not_exist.png")).is_err());
    }
}
