// THEORY:
// `PixelBuffer` is the one image container every component trades in: a width, a
// height and a flat row-major RGBA8 byte vector. Filters borrow a buffer and return
// a brand new one; nothing in the booth aliases or mutates another component's
// pixels. The `image` crate is only touched at the edges (loading a capture frame,
// resampling into the snapshot, writing PNGs), so the filters stay plain loops over
// `&[u8]` the way the grid code walks a frame buffer.

use crate::core_modules::pixel::pixel::Pixel;
use crate::error::BoothError;
use image::{RgbaImage, imageops::FilterType};

pub const CHANNELS: usize = 4;

/// One of the three colour channels a filter can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Byte offset of this channel inside an RGBA pixel.
    pub fn offset(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    pub fn of(self, pixel: &Pixel) -> u8 {
        match self {
            Channel::Red => pixel.red,
            Channel::Green => pixel.green,
            Channel::Blue => pixel.blue,
        }
    }
}

/// Width, height and row-major RGBA8 samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A fully transparent black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    /// A buffer where every pixel is `pixel`.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Self {
        let bytes = pixel.to_bytes();
        let data = bytes
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * CHANNELS)
            .collect();
        Self { width, height, data }
    }

    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BoothError> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(BoothError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Builds a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Pixel) -> Self {
        let mut buffer = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                buffer.put_pixel(x, y, f(x, y));
            }
        }
        buffer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (x as usize + y as usize * self.width as usize) * CHANNELS
    }

    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        let i = self.index(x, y);
        Pixel::from(&self.data[i..i + CHANNELS])
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        (x < self.width && y < self.height).then(|| self.pixel(x, y))
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        let i = self.index(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&pixel.to_bytes());
    }

    /// Iterates pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.data.chunks_exact(CHANNELS).map(Pixel::from)
    }

    /// Applies `f` to every pixel, producing an independent buffer of the same size.
    pub fn map_pixels(&self, mut f: impl FnMut(Pixel) -> Pixel) -> PixelBuffer {
        let mut data = Vec::with_capacity(self.data.len());
        for pixel in self.pixels() {
            data.extend_from_slice(&f(pixel).to_bytes());
        }
        PixelBuffer {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// The same colours with every alpha forced to 255.
    pub fn opaque(&self) -> PixelBuffer {
        self.map_pixels(|p| Pixel::new(p.red, p.green, p.blue, 255))
    }

    /// Copies the `width`×`height` rectangle at (`x`, `y`). The rectangle must lie
    /// inside the buffer.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> PixelBuffer {
        let mut out = PixelBuffer::new(width, height);
        let row_bytes = width as usize * CHANNELS;
        for row in 0..height {
            let src = self.index(x, y + row);
            let dst = out.index(0, row);
            out.data[dst..dst + row_bytes].copy_from_slice(&self.data[src..src + row_bytes]);
        }
        out
    }

    /// Resamples to `width`×`height` with a triangle (bilinear) filter.
    pub fn resized(&self, width: u32, height: u32) -> PixelBuffer {
        if self.is_empty() {
            return PixelBuffer::new(width, height);
        }
        match self.to_rgba_image() {
            Some(image) => {
                image::imageops::resize(&image, width, height, FilterType::Triangle).into()
            }
            None => PixelBuffer::new(width, height),
        }
    }

    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }
}
