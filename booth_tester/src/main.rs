use anyhow::Context;
use booth_vision::capture::{CaptureSource, StillCapture, SyntheticCapture};
use booth_vision::core_modules::utils::image_helper::image_helper;
use booth_vision::detector::{FrameFeed, ScriptedDetector, spawn_detector_loop};
use booth_vision::{BoothConfig, KeyAction, LandmarkSet, PixelBuffer, Session, ThresholdControl};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Drives a booth session against a still image or a synthetic feed and writes the
/// composed grid to a PNG.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image served as the live capture feed (synthetic gradient when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to write the final composed grid
    #[arg(short, long, default_value = "booth.png")]
    output: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON array of {"x", "y"} landmarks in capture coordinates
    #[arg(short, long)]
    landmarks: Option<PathBuf>,

    /// Empty detector answers before the landmarks show up
    #[arg(long, default_value_t = 0)]
    warmup: u32,

    /// Keys to press, one every `key_interval` frames (e.g. "s3")
    #[arg(short, long, default_value = "s")]
    keys: String,

    /// Frames between scripted key presses
    #[arg(long, default_value_t = 10)]
    key_interval: u32,

    /// Number of redraw ticks to run
    #[arg(short, long, default_value_t = 60)]
    frames: u32,

    /// Red channel threshold override
    #[arg(long)]
    red: Option<u8>,

    /// Green channel threshold override
    #[arg(long)]
    green: Option<u8>,

    /// Blue channel threshold override
    #[arg(long)]
    blue: Option<u8>,

    /// Value/luminance threshold override
    #[arg(long)]
    shared: Option<u8>,
}

fn open_capture(args: &Args, config: &BoothConfig) -> anyhow::Result<Box<dyn CaptureSource>> {
    let (width, height) = config.capture_size();
    Ok(match &args.input {
        Some(path) => Box::new(
            StillCapture::open(path, width, height)
                .with_context(|| format!("opening capture image {}", path.display()))?,
        ),
        None => Box::new(SyntheticCapture::new(width, height)),
    })
}

fn scheduled_key(keys: &[char], frame_index: u32, interval: u32) -> Option<char> {
    if interval == 0 || frame_index % interval != 0 {
        return None;
    }
    keys.get((frame_index / interval) as usize).copied()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let args = Args::parse();

    // --- 1. Configuration ---
    let config = BoothConfig::load(args.config.as_deref()).context("loading configuration")?;
    let refresh = Duration::from_secs_f64(1.0 / config.refresh_hz.max(1) as f64);

    // --- 2. Capture & Detector ---
    let mut capture = open_capture(&args, &config)?;
    tracing::info!(source = capture.name(), "capture ready");

    let detector = match &args.landmarks {
        Some(path) => ScriptedDetector::from_json_file(path, args.warmup)
            .with_context(|| format!("reading landmarks {}", path.display()))?,
        None => ScriptedDetector::new(LandmarkSet::default(), 0),
    };
    let feed = FrameFeed::new();
    let handle = spawn_detector_loop(detector, feed.subscribe());

    // --- 3. Session ---
    let mut session = Session::new(config);
    for (control, value) in [
        (ThresholdControl::Red, args.red),
        (ThresholdControl::Green, args.green),
        (ThresholdControl::Blue, args.blue),
        (ThresholdControl::Shared, args.shared),
    ] {
        if let Some(value) = value {
            session.set_threshold(control, value);
        }
    }

    // --- 4. Redraw Loop ---
    let keys: Vec<char> = args.keys.chars().collect();
    let mut ticker = tokio::time::interval(refresh);
    let mut canvas = PixelBuffer::new(0, 0);
    for frame_index in 0..args.frames {
        ticker.tick().await;
        let frame = capture.frame();
        feed.publish(frame.clone());

        if let Some(key) = scheduled_key(&keys, frame_index, args.key_interval) {
            let action = session.press_key(key, &frame);
            tracing::info!(frame = frame_index, %key, ?action, "key pressed");
            if action == KeyAction::Ignored {
                tracing::warn!(%key, "key has no binding");
            }
        }

        canvas = session.redraw(&frame, &handle.landmarks.latest());
    }

    match session.face_region() {
        Some(region) => tracing::info!(
            offset = ?region.offset(),
            size = ?region.size(),
            mode = ?session.filter_mode(),
            "face region"
        ),
        None => tracing::info!("no face region extracted"),
    }

    // --- 5. Output ---
    image_helper::save(&args.output, &canvas)
        .with_context(|| format!("writing {}", args.output.display()))?;
    tracing::info!(path = %args.output.display(), frames = session.frame_count(), "grid saved");

    drop(feed);
    handle.task.await.context("detector loop")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_fire_on_interval_boundaries() {
        let keys: Vec<char> = "s3".chars().collect();
        assert_eq!(scheduled_key(&keys, 0, 10), Some('s'));
        assert_eq!(scheduled_key(&keys, 5, 10), None);
        assert_eq!(scheduled_key(&keys, 10, 10), Some('3'));
        assert_eq!(scheduled_key(&keys, 20, 10), None);
        assert_eq!(scheduled_key(&keys, 0, 0), None);
    }

    #[test]
    fn args_parse_with_defaults() {
        let args = Args::parse_from(["booth_tester", "--keys", "s1", "--shared", "90"]);
        assert_eq!(args.output, PathBuf::from("booth.png"));
        assert_eq!(args.frames, 60);
        assert_eq!(args.shared, Some(90));
        assert!(args.input.is_none());
    }
}
