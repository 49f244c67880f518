// THEORY:
// This file is the entry point for the `booth_vision` library crate.
//
// The public surface is the `Session` (snapshot, key handling, redraw), the
// background landmark `detector` loop, the `CaptureSource` seam and the booth
// configuration. The individual filters live in `core_modules` and are exported as
// well, since each is a self-contained pass over a `PixelBuffer` that is useful on
// its own.

pub mod capture;
pub mod config;
pub mod core_modules;
pub mod detector;
pub mod error;
pub mod session;

pub use config::BoothConfig;
pub use core_modules::face_region::{FaceRegion, Landmark, LandmarkSet};
pub use core_modules::pixel_buffer::{Channel, PixelBuffer};
pub use error::BoothError;
pub use session::{FilterMode, KeyAction, Session, ThresholdControl};
