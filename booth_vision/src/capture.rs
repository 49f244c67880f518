// THEORY:
// The capture source is an external collaborator: the booth only needs "the current
// frame" on demand. A real camera would sit behind `CaptureSource`; the two
// implementations here serve the command line driver and the tests. `StillCapture`
// replays one image file as if it were a live feed, and `SyntheticCapture` renders a
// drifting colour gradient so every frame differs.

use crate::core_modules::pixel::pixel::Pixel;
use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::core_modules::utils::image_helper::image_helper;
use crate::error::BoothError;
use std::path::Path;

/// Anything that can hand out the latest camera frame.
pub trait CaptureSource {
    /// The current frame. An empty buffer means the device has not produced one yet.
    fn frame(&mut self) -> PixelBuffer;

    fn name(&self) -> &str;
}

/// A single still image served as every frame.
pub struct StillCapture {
    name: String,
    frame: PixelBuffer,
}

impl StillCapture {
    pub fn new(name: impl Into<String>, frame: PixelBuffer) -> Self {
        Self {
            name: name.into(),
            frame,
        }
    }

    /// Loads `path` and resamples it to the requested capture resolution.
    pub fn open(path: &Path, width: u32, height: u32) -> Result<Self, BoothError> {
        let image = image_helper::load(path)?;
        if image.is_empty() {
            return Err(BoothError::EmptyCapture);
        }
        let frame = if image.dimensions() == (width, height) {
            image
        } else {
            image.resized(width, height)
        };
        tracing::info!(path = %path.display(), width, height, "opened still capture");
        Ok(Self::new(path.display().to_string(), frame))
    }
}

impl CaptureSource for StillCapture {
    fn frame(&mut self) -> PixelBuffer {
        self.frame.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A procedurally drawn feed: diagonal colour bands shifting one pixel per frame.
pub struct SyntheticCapture {
    width: u32,
    height: u32,
    tick: u32,
}

impl SyntheticCapture {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, tick: 0 }
    }
}

impl CaptureSource for SyntheticCapture {
    fn frame(&mut self) -> PixelBuffer {
        let tick = self.tick;
        self.tick = (self.tick + 1) % self.width.max(1);
        let (width, height) = (self.width.max(1), self.height.max(1));
        PixelBuffer::from_fn(self.width, self.height, |x, y| {
            let red = ((x + tick) % width * 255 / width) as u8;
            let green = (y * 255 / height) as u8;
            let blue = ((x + y) % 256) as u8 ^ (tick % 256) as u8;
            Pixel::new(red, green, blue, 255)
        })
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_frames_move() {
        let mut capture = SyntheticCapture::new(32, 24);
        let first = capture.frame();
        let second = capture.frame();
        assert_eq!(first.dimensions(), (32, 24));
        assert_ne!(first, second);
        assert!(first.pixels().all(|p| p.alpha == 255));
    }

    #[test]
    fn still_capture_repeats_its_frame() {
        let frame = PixelBuffer::filled(4, 4, Pixel::gray(9));
        let mut capture = StillCapture::new("still", frame.clone());
        assert_eq!(capture.frame(), frame);
        assert_eq!(capture.frame(), frame);
        assert_eq!(capture.name(), "still");
    }
}
