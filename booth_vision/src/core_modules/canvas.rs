// THEORY:
// `Canvas` is the display surface every redraw paints into. It owns a single
// `PixelBuffer` and offers the handful of primitives the booth needs: clear, blit a
// buffer, fill or stroke an axis-aligned rectangle, and fill a circle with
// source-over alpha blending. Everything clips silently to the canvas bounds, so
// callers can draw partially off-screen shapes without checks.
//
// Rasterisation rule: a pixel is covered when its centre (x + 0.5, y + 0.5) lies
// inside the shape.

use crate::core_modules::pixel::pixel::{Pixel, to_channel};
use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::core_modules::render::{Paint, RenderCommand};
use std::ops::Range;

pub struct Canvas {
    buffer: PixelBuffer,
}

/// Pixel indices whose centres fall in `[start, end)`, clipped to `0..limit`.
fn covered_span(start: f32, end: f32, limit: u32) -> Range<u32> {
    let first = ((start - 0.5).ceil() as i64).clamp(0, limit as i64);
    let last = ((end - 0.5).ceil() as i64).clamp(0, limit as i64);
    first as u32..last.max(first) as u32
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: PixelBuffer::filled(width, height, Pixel::gray(0)),
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    pub fn clear(&mut self, gray: u8) {
        self.buffer = PixelBuffer::filled(self.width(), self.height(), Pixel::gray(gray));
    }

    fn blend(&mut self, x: u32, y: u32, paint: Paint) {
        let alpha = (paint.alpha / 255.0).clamp(0.0, 1.0) as f64;
        let dst = self.buffer.pixel(x, y);
        let mix = |src: f32, dst: u8| to_channel(src as f64 * alpha + dst as f64 * (1.0 - alpha));
        let out = Pixel::new(
            mix(paint.red, dst.red),
            mix(paint.green, dst.green),
            mix(paint.blue, dst.blue),
            255,
        );
        self.buffer.put_pixel(x, y, out);
    }

    /// Copies `source` with its top-left corner at (`x`, `y`).
    pub fn blit(&mut self, source: &PixelBuffer, x: i64, y: i64) {
        for sy in 0..source.height() {
            let dy = y + sy as i64;
            if dy < 0 || dy >= self.height() as i64 {
                continue;
            }
            for sx in 0..source.width() {
                let dx = x + sx as i64;
                if dx < 0 || dx >= self.width() as i64 {
                    continue;
                }
                self.buffer.put_pixel(dx as u32, dy as u32, source.pixel(sx, sy));
            }
        }
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: Paint) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        for py in covered_span(y, y + height, self.height()) {
            for px in covered_span(x, x + width, self.width()) {
                self.blend(px, py, paint);
            }
        }
    }

    /// Outline of `weight` pixels centred on the rectangle's edges.
    pub fn stroke_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        weight: f32,
        paint: Paint,
    ) {
        let half = weight / 2.0;
        let side = (height - weight).max(0.0);
        self.fill_rect(x - half, y - half, width + weight, weight, paint);
        self.fill_rect(x - half, y + height - half, width + weight, weight, paint);
        self.fill_rect(x - half, y + half, weight, side, paint);
        self.fill_rect(x + width - half, y + half, weight, side, paint);
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, diameter: f32, paint: Paint) {
        if diameter <= 0.0 {
            return;
        }
        let radius = diameter / 2.0;
        let radius_squared = radius * radius;
        for py in covered_span(cy - radius, cy + radius, self.height()) {
            for px in covered_span(cx - radius, cx + radius, self.width()) {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= radius_squared {
                    self.blend(px, py, paint);
                }
            }
        }
    }

    pub fn execute(&mut self, command: &RenderCommand) {
        match *command {
            RenderCommand::FillCircle {
                cx,
                cy,
                diameter,
                paint,
            } => self.fill_circle(cx, cy, diameter, paint),
            RenderCommand::FillRect {
                x,
                y,
                width,
                height,
                paint,
            } => self.fill_rect(x, y, width, height, paint),
            RenderCommand::StrokeRect {
                x,
                y,
                width,
                height,
                weight,
                paint,
            } => self.stroke_rect(x, y, width, height, weight, paint),
        }
    }

    /// Runs `commands` after shifting them by (`dx`, `dy`).
    pub fn execute_all(&mut self, commands: &[RenderCommand], dx: f32, dy: f32) {
        for command in commands {
            self.execute(&command.translated(dx, dy));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blit_clips_negative_and_overflowing_positions() {
        let mut canvas = Canvas::new(4, 4);
        canvas.blit(&PixelBuffer::filled(3, 3, Pixel::gray(200)), -1, 2);
        let out = canvas.into_buffer();
        assert_eq!(out.pixel(0, 2), Pixel::gray(200));
        assert_eq!(out.pixel(1, 3), Pixel::gray(200));
        assert_eq!(out.pixel(2, 2), Pixel::gray(0));
        assert_eq!(out.pixel(0, 1), Pixel::gray(0));
    }

    #[test]
    fn fill_rect_covers_pixel_centres() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_rect(2.0, 3.0, 4.0, 2.0, Paint::gray(90.0));
        let out = canvas.into_buffer();
        let covered = out.pixels().filter(|p| *p == Pixel::gray(90)).count();
        assert_eq!(covered, 8);
        assert_eq!(out.pixel(2, 3), Pixel::gray(90));
        assert_eq!(out.pixel(6, 3), Pixel::gray(0));
    }

    #[test]
    fn opaque_circle_of_five_fills_a_disc() {
        let mut canvas = Canvas::new(5, 5);
        canvas.fill_circle(2.5, 2.5, 5.0, Paint::gray(100.0));
        let out = canvas.into_buffer();
        assert_eq!(out.pixel(2, 2), Pixel::gray(100));
        assert_eq!(out.pixel(0, 2), Pixel::gray(100));
        // Corners fall outside a radius-2.5 disc.
        assert_eq!(out.pixel(0, 0), Pixel::gray(0));
    }

    #[test]
    fn translucent_paint_blends_source_over() {
        let mut canvas = Canvas::new(1, 1);
        canvas.clear(100);
        canvas.fill_rect(0.0, 0.0, 1.0, 1.0, Paint::rgba(255.0, 0.0, 0.0, 127.5));
        let out = canvas.into_buffer();
        let p = out.pixel(0, 0);
        assert_eq!((p.red, p.green, p.blue, p.alpha), (178, 50, 50, 255));
    }

    #[test]
    fn stroke_rect_leaves_interior_untouched() {
        let mut canvas = Canvas::new(10, 10);
        canvas.stroke_rect(2.0, 2.0, 6.0, 6.0, 2.0, Paint::gray(255.0));
        let out = canvas.into_buffer();
        assert_eq!(out.pixel(1, 1), Pixel::gray(255));
        assert_eq!(out.pixel(2, 5), Pixel::gray(255));
        assert_eq!(out.pixel(7, 7), Pixel::gray(255));
        assert_eq!(out.pixel(4, 4), Pixel::gray(0));
    }
}
