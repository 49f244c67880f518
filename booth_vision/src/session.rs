// THEORY:
// The `session` module is the top-level API of the booth. A `Session` is the explicit
// context object that owns every piece of per-frame state: the current snapshot,
// the lazily extracted face region, the face filter mode and the threshold controls.
// Callers drive it with two kinds of input:
//
// 1.  Discrete key presses (`press_key`): take a snapshot, or pick a face filter.
// 2.  Redraw ticks (`redraw`): given the live capture frame and the newest landmark
//     set, recompute every filter from the snapshot and compose the grid.
//
// Nothing is cached between ticks except the face region, which is cleared on every
// new snapshot and filled in on the first tick where the detector has seen a face.
// An absent snapshot, an absent face or an empty landmark set are all ordinary
// states that render as placeholders, never errors.

use crate::config::{BoothConfig, Thresholds};
use crate::core_modules::canvas::Canvas;
use crate::core_modules::channel_splitter::isolate_channel;
use crate::core_modules::color_converter::{to_grayscale, to_grayscale_darkened, to_hsv, to_ycbcr};
use crate::core_modules::face_region::{self, FaceRegion, LandmarkSet, scale_factor};
use crate::core_modules::geometric_filter::{mirror_horizontal, pixelate};
use crate::core_modules::grid_layout::{CellKind, GridLayout};
use crate::core_modules::pixel_buffer::{Channel, PixelBuffer};
use crate::core_modules::render::{Paint, RenderCommand};
use crate::core_modules::threshold::{channel_threshold, luminance_threshold, value_threshold};

const NOSE_BASE_DIAMETER: f32 = 10.0;
const NOSE_PULSE_AMOUNT: f32 = 4.0;
const NOSE_PULSE_RATE: f32 = 0.1;
const FACE_BOX_WEIGHT: f32 = 2.0;
const GUIDE_WEIGHT: f32 = 1.0;

/// How the face region is rendered in its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    Identity,
    Grayscale,
    Mirror,
    Pixelate,
}

/// The four independent threshold inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdControl {
    Red,
    Green,
    Blue,
    /// Drives both the value and the luminance threshold.
    Shared,
}

impl From<Channel> for ThresholdControl {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Red => ThresholdControl::Red,
            Channel::Green => ThresholdControl::Green,
            Channel::Blue => ThresholdControl::Blue,
        }
    }
}

/// What a key press resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Snapshot,
    SetMode(FilterMode),
    Ignored,
}

impl KeyAction {
    pub fn from_key(key: char) -> Self {
        match key {
            's' | 'S' => KeyAction::Snapshot,
            '1' => KeyAction::SetMode(FilterMode::Grayscale),
            '2' => KeyAction::SetMode(FilterMode::Mirror),
            '3' => KeyAction::SetMode(FilterMode::Pixelate),
            _ => KeyAction::Ignored,
        }
    }
}

/// Every snapshot-derived output for one redraw.
#[derive(Debug, Clone)]
pub struct FilterOutputs {
    pub grayscale: PixelBuffer,
    pub channels: [PixelBuffer; 3],
    pub channel_thresholds: [PixelBuffer; 3],
    pub hsv: PixelBuffer,
    pub ycbcr: PixelBuffer,
    pub value_threshold: PixelBuffer,
    pub luminance_threshold: PixelBuffer,
}

impl FilterOutputs {
    pub fn channel(&self, channel: Channel) -> &PixelBuffer {
        &self.channels[channel.offset()]
    }

    pub fn channel_threshold(&self, channel: Channel) -> &PixelBuffer {
        &self.channel_thresholds[channel.offset()]
    }
}

/// The face cell content for the current filter mode, positioned in snapshot space.
#[derive(Debug, Clone, PartialEq)]
pub enum FaceView {
    Buffer { x: u32, y: u32, buffer: PixelBuffer },
    Commands { x: u32, y: u32, commands: Vec<RenderCommand> },
}

pub struct Session {
    config: BoothConfig,
    layout: GridLayout,
    snapshot: Option<PixelBuffer>,
    /// Size of the capture frame the snapshot was taken from.
    source_size: (u32, u32),
    face_region: Option<FaceRegion>,
    filter_mode: FilterMode,
    thresholds: Thresholds,
    frame_count: u64,
}

impl Session {
    pub fn new(config: BoothConfig) -> Self {
        let layout = GridLayout::classic(config.cell_width, config.cell_height);
        Self {
            layout,
            snapshot: None,
            source_size: config.capture_size(),
            face_region: None,
            filter_mode: FilterMode::default(),
            thresholds: config.thresholds,
            frame_count: 0,
            config,
        }
    }

    pub fn config(&self) -> &BoothConfig {
        &self.config
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn snapshot(&self) -> Option<&PixelBuffer> {
        self.snapshot.as_ref()
    }

    pub fn face_region(&self) -> Option<&FaceRegion> {
        self.face_region.as_ref()
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn threshold(&self, control: ThresholdControl) -> u8 {
        match control {
            ThresholdControl::Red => self.thresholds.red,
            ThresholdControl::Green => self.thresholds.green,
            ThresholdControl::Blue => self.thresholds.blue,
            ThresholdControl::Shared => self.thresholds.shared,
        }
    }

    pub fn set_threshold(&mut self, control: ThresholdControl, value: u8) {
        match control {
            ThresholdControl::Red => self.thresholds.red = value,
            ThresholdControl::Green => self.thresholds.green = value,
            ThresholdControl::Blue => self.thresholds.blue = value,
            ThresholdControl::Shared => self.thresholds.shared = value,
        }
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        if mode != self.filter_mode {
            tracing::debug!(?mode, "face filter mode changed");
        }
        self.filter_mode = mode;
    }

    /// Replaces the snapshot with `capture` resampled to cell size, made fully
    /// opaque, and forgets the face region. Returns false, changing nothing, if the
    /// capture has no frame yet.
    pub fn take_snapshot(&mut self, capture: &PixelBuffer) -> bool {
        if capture.is_empty() {
            tracing::debug!("snapshot requested before the capture produced a frame");
            return false;
        }
        let (width, height) = self.config.cell_size();
        self.snapshot = Some(capture.resized(width, height).opaque());
        self.source_size = capture.dimensions();
        self.face_region = None;
        tracing::debug!(source = ?self.source_size, width, height, "snapshot taken");
        true
    }

    /// Applies the action bound to `key`. `capture` is only read for a snapshot.
    pub fn press_key(&mut self, key: char, capture: &PixelBuffer) -> KeyAction {
        let action = KeyAction::from_key(key);
        match action {
            KeyAction::Snapshot => {
                self.take_snapshot(capture);
            }
            KeyAction::SetMode(mode) => self.set_filter_mode(mode),
            KeyAction::Ignored => {}
        }
        action
    }

    /// Extracts the face region if it is missing and `landmarks` has a face.
    /// Returns true when a new region was extracted.
    pub fn refresh_face_region(&mut self, landmarks: &LandmarkSet) -> bool {
        if self.face_region.is_some() || landmarks.is_empty() {
            return false;
        }
        let Some(snapshot) = self.snapshot.as_ref() else {
            return false;
        };
        self.face_region =
            face_region::extract(landmarks, self.source_size, snapshot.dimensions(), snapshot);
        if let Some(region) = &self.face_region {
            tracing::debug!(
                offset = ?region.offset(),
                size = ?region.size(),
                "face region extracted"
            );
        }
        self.face_region.is_some()
    }

    /// Recomputes every snapshot filter. `None` before the first snapshot.
    pub fn filter_outputs(&self) -> Option<FilterOutputs> {
        let snapshot = self.snapshot.as_ref()?;
        let thresholds = &self.thresholds;
        Some(FilterOutputs {
            grayscale: to_grayscale_darkened(snapshot),
            channels: Channel::ALL.map(|channel| isolate_channel(snapshot, channel)),
            channel_thresholds: Channel::ALL.map(|channel| {
                channel_threshold(snapshot, channel, self.threshold(channel.into()))
            }),
            hsv: to_hsv(snapshot),
            ycbcr: to_ycbcr(snapshot),
            value_threshold: value_threshold(snapshot, thresholds.shared),
            luminance_threshold: luminance_threshold(snapshot, thresholds.shared),
        })
    }

    /// The face region rendered through the current filter mode.
    pub fn face_view(&self) -> Option<FaceView> {
        let region = self.face_region.as_ref()?;
        let (x, y) = region.offset();
        let view = match self.filter_mode {
            FilterMode::Identity => FaceView::Buffer {
                x,
                y,
                buffer: region.buffer.clone(),
            },
            FilterMode::Grayscale => FaceView::Buffer {
                x,
                y,
                buffer: to_grayscale(&region.buffer),
            },
            FilterMode::Mirror => FaceView::Buffer {
                x,
                y,
                buffer: mirror_horizontal(&region.buffer),
            },
            FilterMode::Pixelate => FaceView::Commands {
                x,
                y,
                commands: pixelate(&region.buffer, self.config.block_size),
            },
        };
        Some(view)
    }

    /// Overlays drawn over the face cell, in cell-local coordinates.
    fn face_overlays(
        &self,
        capture_size: (u32, u32),
        landmarks: &LandmarkSet,
    ) -> Vec<RenderCommand> {
        let scale = scale_factor(capture_size, self.config.cell_size());
        let mut overlays = Vec::new();

        if self.config.show_face_box {
            if let Some(bbox) = landmarks.bounding_box().map(|b| b.scaled(scale)) {
                overlays.push(RenderCommand::StrokeRect {
                    x: bbox.min_x,
                    y: bbox.min_y,
                    width: bbox.width(),
                    height: bbox.height(),
                    weight: FACE_BOX_WEIGHT,
                    paint: Paint::rgba(0.0, 255.0, 0.0, 255.0),
                });
            }
        }

        if let Some(nose) = landmarks.nose_tip().map(|n| n.scaled(scale)) {
            let pulse = (self.frame_count as f32 * NOSE_PULSE_RATE).sin() * NOSE_PULSE_AMOUNT;
            overlays.push(RenderCommand::FillCircle {
                cx: nose.x,
                cy: nose.y,
                diameter: NOSE_BASE_DIAMETER + pulse,
                paint: Paint::rgba(255.0, 0.0, 0.0, 150.0),
            });
        }
        overlays
    }

    fn draw_face_cell(
        &self,
        canvas: &mut Canvas,
        origin: (u32, u32),
        capture_size: (u32, u32),
        landmarks: &LandmarkSet,
    ) {
        let (cell_width, cell_height) = self.config.cell_size();
        let (ox, oy) = (origin.0 as f32, origin.1 as f32);
        let placeholder = Paint::gray(self.config.placeholder_gray as f32);
        canvas.fill_rect(ox, oy, cell_width as f32, cell_height as f32, placeholder);

        let Some(view) = self.face_view() else {
            return;
        };
        match &view {
            FaceView::Buffer { x, y, buffer } => {
                canvas.blit(buffer, (origin.0 + x) as i64, (origin.1 + y) as i64);
            }
            FaceView::Commands { x, y, commands } => {
                canvas.execute_all(commands, ox + *x as f32, oy + *y as f32);
            }
        }
        canvas.execute_all(&self.face_overlays(capture_size, landmarks), ox, oy);
    }

    fn draw_cell(
        &self,
        canvas: &mut Canvas,
        kind: CellKind,
        origin: (u32, u32),
        outputs: &FilterOutputs,
    ) {
        let snapshot = match &self.snapshot {
            Some(snapshot) => snapshot,
            None => return,
        };
        let buffer = match kind {
            CellKind::Snapshot => snapshot,
            CellKind::Grayscale => &outputs.grayscale,
            CellKind::Channel(channel) => outputs.channel(channel),
            CellKind::ChannelThreshold(channel) => outputs.channel_threshold(channel),
            CellKind::Hsv => &outputs.hsv,
            CellKind::YCbCr => &outputs.ycbcr,
            CellKind::ValueThreshold => &outputs.value_threshold,
            CellKind::LuminanceThreshold => &outputs.luminance_threshold,
            // Drawn by `draw_face_cell`.
            CellKind::Face => return,
        };
        canvas.blit(buffer, origin.0 as i64, origin.1 as i64);
    }

    /// One display tick: refresh the face region from `landmarks`, recompute every
    /// filter and compose the grid. Before the first snapshot the canvas shows the
    /// live `capture` in the first cell.
    pub fn redraw(&mut self, capture: &PixelBuffer, landmarks: &LandmarkSet) -> PixelBuffer {
        self.frame_count += 1;
        self.refresh_face_region(landmarks);

        let (canvas_width, canvas_height) = self.layout.canvas_size();
        let (cell_width, cell_height) = self.config.cell_size();
        let mut canvas = Canvas::new(canvas_width, canvas_height);
        canvas.clear(self.config.background_gray);

        let guide = Paint::gray(self.config.guide_gray as f32);
        for (x, y) in self.layout.slots() {
            canvas.stroke_rect(
                x as f32,
                y as f32,
                cell_width as f32,
                cell_height as f32,
                GUIDE_WEIGHT,
                guide,
            );
        }

        let Some(outputs) = self.filter_outputs() else {
            if !capture.is_empty() {
                let (x, y) = self.layout.origin_of(CellKind::Snapshot).unwrap_or((0, 0));
                let live = capture.resized(cell_width, cell_height).opaque();
                canvas.blit(&live, x as i64, y as i64);
            }
            return canvas.into_buffer();
        };

        let capture_size = if capture.is_empty() {
            self.source_size
        } else {
            capture.dimensions()
        };
        for cell in &self.layout.cells {
            let origin = self.layout.origin(cell.column, cell.row);
            match cell.kind {
                CellKind::Face => self.draw_face_cell(&mut canvas, origin, capture_size, landmarks),
                kind => self.draw_cell(&mut canvas, kind, origin, &outputs),
            }
        }
        canvas.into_buffer()
    }
}
