// An example of how to use the `booth_vision` library on a synthetic feed.
// The `booth_tester` crate is the full driver.

use booth_vision::capture::{CaptureSource, SyntheticCapture};
use booth_vision::{BoothConfig, LandmarkSet, Session};

fn main() {
    let config = BoothConfig::default();
    let mut capture = SyntheticCapture::new(config.capture_width, config.capture_height);
    let mut session = Session::new(config);

    let frame = capture.frame();
    session.press_key('s', &frame);
    let canvas = session.redraw(&frame, &LandmarkSet::default());

    println!(
        "Booth Vision - composed a {}x{} grid from a {} frame",
        canvas.width(),
        canvas.height(),
        capture.name()
    );
}
