// THEORY (Single-Pixel Heuristics):
// The `Pixel` module is the smallest unit of the booth. It is a "dumb" data
// container for one RGBA sample plus the handful of metrics that can be computed
// from that sample alone: the plain gray mean, Rec. 601 luminance, and the HSV
// triple. Nothing here knows about neighbours, buffers or thresholds; every filter
// in `core_modules` is a loop that reads `Pixel`s and writes bytes.
//
// All derived math runs in f64 on normalized (0..1) or computed (0..255) channels.
// Rounding back to bytes is the caller's job, so the same heuristic can feed both
// a rendered buffer and a threshold comparison without double rounding.

pub mod pixel {
    pub type Channel = u8;
    pub type NormalizedChannel = f64;
    pub type Gray = f64;
    pub type Luminance = f64;
    pub type Hue = f64;
    pub type SaturationHSV = f64;
    pub type ValueHSV = f64;

    /// A "dumb" data container representing a single RGBA pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The alpha (transparency) channel value (0-255).
        pub alpha: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// An opaque pixel with all three colour channels set to `value`.
        pub fn gray(value: Channel) -> Self {
            Pixel::new(value, value, value, 255)
        }

        pub fn to_bytes(self) -> [u8; 4] {
            [self.red, self.green, self.blue, self.alpha]
        }

        fn normalized(&self) -> (NormalizedChannel, NormalizedChannel, NormalizedChannel) {
            (
                self.red as NormalizedChannel / 255.0,
                self.green as NormalizedChannel / 255.0,
                self.blue as NormalizedChannel / 255.0,
            )
        }

        /// Raw channel sum, 0..=765.
        pub fn sum(&self) -> u16 {
            self.red as u16 + self.green as u16 + self.blue as u16
        }

        /// Unweighted gray: (R + G + B) / 3 on the 0..255 scale.
        pub fn gray_mean(&self) -> Gray {
            self.sum() as Gray / 3.0
        }

        /// Luminance estimate (Rec. 601 luma), unclamped.
        pub fn luminance(&self) -> Luminance {
            0.299_f64 * self.red as f64
                + 0.587_f64 * self.green as f64
                + 0.114_f64 * self.blue as f64
        }

        /// HSV value (V): max(R, G, B) normalized to 0..1.
        pub fn value_hsv(&self) -> ValueHSV {
            let (r, g, b) = self.normalized();
            r.max(g).max(b)
        }

        /// HSV saturation: chroma / value, 0 for black.
        pub fn saturation_hsv(&self) -> SaturationHSV {
            let (r, g, b) = self.normalized();
            let maximum_channel = r.max(g).max(b);
            let minimum_channel = r.min(g).min(b);
            if maximum_channel == 0.0 {
                return 0.0;
            }
            (maximum_channel - minimum_channel) / maximum_channel
        }

        /// Hue angle in degrees [0, 360).
        ///
        /// Sector is picked by the first channel equal to the maximum in R, G, B
        /// order, so ties resolve toward red, then green.
        pub fn hue(&self) -> Hue {
            let (r, g, b) = self.normalized();
            let maximum_channel = r.max(g).max(b);
            let minimum_channel = r.min(g).min(b);
            let delta = maximum_channel - minimum_channel;

            let mut sector = 0.0;
            if delta != 0.0 {
                sector = if maximum_channel == r {
                    ((g - b) / delta) % 6.0
                } else if maximum_channel == g {
                    (b - r) / delta + 2.0
                } else {
                    (r - g) / delta + 4.0
                };
            }
            (sector * 60.0 + 360.0) % 360.0
        }

        /// The (H, S, V) triple, H in degrees, S and V in 0..1.
        pub fn hsv(&self) -> (Hue, SaturationHSV, ValueHSV) {
            (self.hue(), self.saturation_hsv(), self.value_hsv())
        }
    }

    impl From<&[u8]> for Pixel {
        /// Reads the first four bytes as RGBA. Short slices pad with opaque black.
        fn from(bytes: &[u8]) -> Self {
            let at = |i: usize, fallback: u8| bytes.get(i).copied().unwrap_or(fallback);
            Pixel::new(at(0, 0), at(1, 0), at(2, 0), at(3, 255))
        }
    }

    /// Standard HSV → RGB, returning channels on the 0..255 scale (unrounded).
    pub fn hsv_to_rgb(hue: Hue, saturation: SaturationHSV, value: ValueHSV) -> (f64, f64, f64) {
        let hue = hue.rem_euclid(360.0);
        let chroma = value * saturation;
        let sector = hue / 60.0;
        let x = chroma * (1.0 - ((sector % 2.0) - 1.0).abs());
        let (r, g, b) = match sector as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = value - chroma;
        ((r + m) * 255.0, (g + m) * 255.0, (b + m) * 255.0)
    }

    /// Rounds a 0..255 float onto the byte grid, saturating at both ends.
    pub fn to_channel(value: f64) -> Channel {
        value.clamp(0.0, 255.0).round() as Channel
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;

    #[test]
    fn pure_red_is_hue_zero_full_saturation() {
        let (h, s, v) = Pixel::new(255, 0, 0, 255).hsv();
        assert_eq!(h, 0.0);
        assert_eq!(s, 1.0);
        assert_eq!(v, 1.0);
    }

    #[test]
    fn white_has_no_saturation() {
        let (h, s, v) = Pixel::new(255, 255, 255, 255).hsv();
        assert_eq!(h, 0.0);
        assert_eq!(s, 0.0);
        assert_eq!(v, 1.0);
    }

    #[test]
    fn primary_hues_land_on_sector_boundaries() {
        assert_eq!(Pixel::new(0, 255, 0, 255).hue(), 120.0);
        assert_eq!(Pixel::new(0, 0, 255, 255).hue(), 240.0);
        // Magenta: red is max, (g - b) / delta = -1 wraps to 300.
        assert_eq!(Pixel::new(255, 0, 255, 255).hue(), 300.0);
    }

    #[test]
    fn red_green_tie_resolves_to_red_sector() {
        // Yellow: R == G == max. Red branch gives (1 - 0) / 1 = 1 → 60°.
        assert_eq!(Pixel::new(255, 255, 0, 255).hue(), 60.0);
    }

    #[test]
    fn black_saturation_is_zero() {
        assert_eq!(Pixel::new(0, 0, 0, 255).saturation_hsv(), 0.0);
    }

    #[test]
    fn luminance_spans_byte_range() {
        assert_eq!(Pixel::new(0, 0, 0, 255).luminance(), 0.0);
        assert!((Pixel::new(255, 255, 255, 255).luminance() - 255.0).abs() < 1e-9);
    }

    #[test]
    fn hsv_round_trips_through_rgb() {
        for pixel in [
            Pixel::new(255, 0, 0, 255),
            Pixel::new(12, 200, 90, 255),
            Pixel::new(77, 77, 77, 255),
            Pixel::new(200, 10, 240, 255),
        ] {
            let (h, s, v) = pixel.hsv();
            let (r, g, b) = hsv_to_rgb(h, s, v);
            assert_eq!(to_channel(r), pixel.red);
            assert_eq!(to_channel(g), pixel.green);
            assert_eq!(to_channel(b), pixel.blue);
        }
    }

    #[test]
    fn short_slice_pads_opaque() {
        let pixel = Pixel::from(&[9u8, 8][..]);
        assert_eq!(pixel, Pixel::new(9, 8, 0, 255));
    }
}
