// THEORY:
// The landmark detector is slow and lives outside the redraw loop. It runs as a
// background tokio task that repeats one cycle forever: take the newest capture
// frame, detect, publish the result, wait for the next frame. Results go into a
// `watch` channel, which is exactly a single-slot, last-write-wins cell: the redraw
// loop reads whatever is newest, a stale result is simply overwritten, and nothing
// ever queues up behind a slow model.
//
// Frames travel the other way through a second `watch` channel (`FrameFeed`). When
// the feed is dropped the task sees the channel close and exits, which is the only
// way the loop ends.

use crate::core_modules::face_region::LandmarkSet;
use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::error::BoothError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A facial-landmark model: one frame in, zero or one face out.
pub trait LandmarkDetector: Send + 'static {
    /// Keypoints of the first face in `frame`, or an empty set if none was found.
    fn detect(&mut self, frame: &PixelBuffer) -> LandmarkSet;
}

/// Publishes capture frames to the detector task.
pub struct FrameFeed {
    tx: watch::Sender<Option<Arc<PixelBuffer>>>,
}

impl FrameFeed {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Replaces the pending frame. Frames the detector never got to are dropped.
    pub fn publish(&self, frame: PixelBuffer) {
        self.tx.send_replace(Some(Arc::new(frame)));
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<PixelBuffer>>> {
        self.tx.subscribe()
    }
}

impl Default for FrameFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Read side of the single-slot landmark cell.
#[derive(Clone)]
pub struct LatestLandmarks {
    rx: watch::Receiver<LandmarkSet>,
}

impl LatestLandmarks {
    /// The most recent result; empty before the detector has answered once.
    pub fn latest(&self) -> LandmarkSet {
        self.rx.borrow().clone()
    }

    /// Waits for the next published result. Returns false once the detector is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

pub struct DetectorHandle {
    pub task: JoinHandle<()>,
    pub landmarks: LatestLandmarks,
}

/// Starts the detect → publish → re-arm loop on the current tokio runtime.
pub fn spawn_detector_loop<D: LandmarkDetector>(
    detector: D,
    mut frames: watch::Receiver<Option<Arc<PixelBuffer>>>,
) -> DetectorHandle {
    let (tx, rx) = watch::channel(LandmarkSet::default());

    let task = tokio::spawn(async move {
        let mut detector = detector;
        let mut runs: u64 = 0;
        loop {
            let frame = frames.borrow_and_update().clone();
            if let Some(frame) = frame {
                // Inference is blocking work; keep it off the async workers.
                let outcome = tokio::task::spawn_blocking(move || {
                    let result = detector.detect(&frame);
                    (detector, result)
                })
                .await;
                let (returned, result) = match outcome {
                    Ok(pair) => pair,
                    Err(err) => {
                        tracing::warn!(error = %err, "landmark detector task failed, stopping");
                        return;
                    }
                };
                detector = returned;
                runs += 1;
                tracing::trace!(run = runs, points = result.len(), "landmarks published");
                tx.send_replace(result);
            }
            if frames.changed().await.is_err() {
                tracing::debug!(runs, "frame feed closed, detector loop exiting");
                return;
            }
        }
    });

    DetectorHandle {
        task,
        landmarks: LatestLandmarks { rx },
    }
}

/// Replays a fixed landmark set, optionally after a number of empty warm-up answers.
#[derive(Debug, Clone)]
pub struct ScriptedDetector {
    landmarks: LandmarkSet,
    warmup: u32,
    calls: u32,
}

impl ScriptedDetector {
    pub fn new(landmarks: LandmarkSet, warmup: u32) -> Self {
        Self {
            landmarks,
            warmup,
            calls: 0,
        }
    }

    /// Reads a JSON array of `{"x": .., "y": ..}` points.
    pub fn from_json_file(path: &Path, warmup: u32) -> Result<Self, BoothError> {
        let content = std::fs::read_to_string(path)?;
        let landmarks: LandmarkSet = serde_json::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            points = landmarks.len(),
            warmup,
            "loaded scripted landmarks"
        );
        Ok(Self::new(landmarks, warmup))
    }
}

impl LandmarkDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &PixelBuffer) -> LandmarkSet {
        self.calls = self.calls.saturating_add(1);
        if self.calls <= self.warmup {
            LandmarkSet::default()
        } else {
            self.landmarks.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::face_region::Landmark;

    fn face() -> LandmarkSet {
        LandmarkSet::new(vec![Landmark::new(10.0, 10.0), Landmark::new(50.0, 90.0)])
    }

    #[test]
    fn scripted_detector_warms_up() {
        let mut detector = ScriptedDetector::new(face(), 2);
        let frame = PixelBuffer::new(1, 1);
        assert!(detector.detect(&frame).is_empty());
        assert!(detector.detect(&frame).is_empty());
        assert_eq!(detector.detect(&frame), face());
    }

    #[tokio::test]
    async fn loop_publishes_latest_result() {
        let feed = FrameFeed::new();
        let mut handle = spawn_detector_loop(ScriptedDetector::new(face(), 0), feed.subscribe());
        assert!(handle.landmarks.latest().is_empty());

        feed.publish(PixelBuffer::new(4, 4));
        assert!(handle.landmarks.changed().await);
        assert_eq!(handle.landmarks.latest(), face());
    }

    #[tokio::test]
    async fn loop_exits_when_feed_is_dropped() {
        let feed = FrameFeed::new();
        let handle = spawn_detector_loop(ScriptedDetector::new(face(), 0), feed.subscribe());
        drop(feed);
        handle.task.await.expect("detector task finishes cleanly");
    }
}
