// THEORY:
// The face region bridges the landmark detector's coordinate space (the capture
// frame, e.g. 320×240) and the snapshot's (160×120). Landmarks arrive as a loose
// cloud of points; we take their axis-aligned bounding box, scale it per axis into
// snapshot space, floor it onto the pixel grid and crop.
//
// "No face" is a normal state, not an error: an empty set yields `None` and the
// caller simply tries again on the next redraw. Degenerate boxes are widened to at
// least one pixel and every rectangle is clamped to the snapshot, so a non-empty
// landmark set always produces a usable buffer.

use crate::core_modules::pixel_buffer::PixelBuffer;
use serde::{Deserialize, Serialize};

/// Index of the nose tip in the face-mesh keypoint ordering.
pub const NOSE_TIP_INDEX: usize = 1;

/// A 2D point in capture-frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scaled(&self, scale: (f32, f32)) -> Landmark {
        Landmark::new(self.x * scale.0, self.y * scale.1)
    }
}

/// Ordered keypoints for one detected face. Empty means no face this frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    pub points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// The nose tip, present only when the set has more than one keypoint.
    pub fn nose_tip(&self) -> Option<Landmark> {
        if self.points.len() > NOSE_TIP_INDEX {
            Some(self.points[NOSE_TIP_INDEX])
        } else {
            None
        }
    }

    /// Min/max over every keypoint, `None` for an empty set.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.points.first()?;
        let mut bbox = BoundingBox {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for point in &self.points[1..] {
            bbox.min_x = bbox.min_x.min(point.x);
            bbox.min_y = bbox.min_y.min(point.y);
            bbox.max_x = bbox.max_x.max(point.x);
            bbox.max_y = bbox.max_y.max(point.y);
        }
        Some(bbox)
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(points: Vec<Landmark>) -> Self {
        Self::new(points)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl BoundingBox {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn scaled(&self, scale: (f32, f32)) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x * scale.0,
            min_y: self.min_y * scale.1,
            max_x: self.max_x * scale.0,
            max_y: self.max_y * scale.1,
        }
    }
}

/// Per-axis factor mapping `source` coordinates onto `target`.
pub fn scale_factor(source: (u32, u32), target: (u32, u32)) -> (f32, f32) {
    let axis = |s: u32, t: u32| if s == 0 { 1.0 } else { t as f32 / s as f32 };
    (axis(source.0, target.0), axis(source.1, target.1))
}

/// The landmark bounding box mapped into target space, for overlays.
pub fn scaled_box(
    landmarks: &LandmarkSet,
    source: (u32, u32),
    target: (u32, u32),
) -> Option<BoundingBox> {
    Some(landmarks.bounding_box()?.scaled(scale_factor(source, target)))
}

/// A crop of the snapshot bounding the detected face.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceRegion {
    /// Left edge within the snapshot.
    pub x: u32,
    /// Top edge within the snapshot.
    pub y: u32,
    pub buffer: PixelBuffer,
}

impl FaceRegion {
    pub fn offset(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    pub fn size(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }
}

/// Integer crop rectangle: floor the scaled box, widen to ≥ 1, clamp to `bounds`.
fn crop_rect(bbox: &BoundingBox, bounds: (u32, u32)) -> (u32, u32, u32, u32) {
    let (bound_w, bound_h) = (bounds.0 as i64, bounds.1 as i64);

    let x = (bbox.min_x.floor() as i64).clamp(0, bound_w - 1);
    let y = (bbox.min_y.floor() as i64).clamp(0, bound_h - 1);
    let width = (bbox.width().floor() as i64).max(1).min(bound_w - x);
    let height = (bbox.height().floor() as i64).max(1).min(bound_h - y);

    (x as u32, y as u32, width as u32, height as u32)
}

/// Crops the face out of `snapshot`.
///
/// `source` is the capture-frame size the landmarks were measured in, `target` the
/// snapshot size they are mapped onto. Returns `None` for an empty landmark set or
/// an empty snapshot.
pub fn extract(
    landmarks: &LandmarkSet,
    source: (u32, u32),
    target: (u32, u32),
    snapshot: &PixelBuffer,
) -> Option<FaceRegion> {
    if snapshot.is_empty() {
        return None;
    }
    let bbox = scaled_box(landmarks, source, target)?;
    let (x, y, width, height) = crop_rect(&bbox, snapshot.dimensions());
    Some(FaceRegion {
        x,
        y,
        buffer: snapshot.crop(x, y, width, height),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel::pixel::Pixel;

    fn snapshot() -> PixelBuffer {
        PixelBuffer::from_fn(160, 120, |x, y| Pixel::new(x as u8, y as u8, 0, 255))
    }

    fn set(points: &[(f32, f32)]) -> LandmarkSet {
        points.iter().map(|&(x, y)| Landmark::new(x, y)).collect::<Vec<_>>().into()
    }

    #[test]
    fn square_of_landmarks_maps_to_half_scale() {
        let landmarks = set(&[(10.0, 10.0), (50.0, 10.0), (10.0, 90.0), (50.0, 90.0)]);
        let region = extract(&landmarks, (320, 240), (160, 120), &snapshot()).expect("face");
        assert_eq!(region.offset(), (5, 5));
        assert_eq!(region.size(), (20, 40));
        assert_eq!(region.buffer.pixel(0, 0), Pixel::new(5, 5, 0, 255));
    }

    #[test]
    fn empty_landmarks_yield_none() {
        assert_eq!(extract(&LandmarkSet::default(), (320, 240), (160, 120), &snapshot()), None);
    }

    #[test]
    fn single_point_is_widened_to_one_pixel() {
        let region =
            extract(&set(&[(100.0, 60.0)]), (320, 240), (160, 120), &snapshot()).expect("face");
        assert_eq!(region.offset(), (50, 30));
        assert_eq!(region.size(), (1, 1));
    }

    #[test]
    fn out_of_range_box_is_clamped() {
        let landmarks = set(&[(-40.0, -10.0), (400.0, 300.0)]);
        let region = extract(&landmarks, (320, 240), (160, 120), &snapshot()).expect("face");
        assert_eq!(region.offset(), (0, 0));
        assert_eq!(region.size(), (160, 120));

        let far = set(&[(1000.0, 1000.0), (1010.0, 1010.0)]);
        let region = extract(&far, (320, 240), (160, 120), &snapshot()).expect("face");
        assert_eq!(region.offset(), (159, 119));
        assert_eq!(region.size(), (1, 1));
    }

    #[test]
    fn fractional_box_floors_each_term() {
        // Scaled: min (5.5, 5.5), size (10.25, 10.75) → offset (5, 5), size (10, 10).
        let landmarks = set(&[(11.0, 11.0), (31.5, 32.5)]);
        let region = extract(&landmarks, (320, 240), (160, 120), &snapshot()).expect("face");
        assert_eq!(region.offset(), (5, 5));
        assert_eq!(region.size(), (10, 10));
    }

    #[test]
    fn nose_tip_needs_two_points() {
        assert_eq!(set(&[(1.0, 1.0)]).nose_tip(), None);
        assert_eq!(set(&[(1.0, 1.0), (7.0, 8.0)]).nose_tip(), Some(Landmark::new(7.0, 8.0)));
    }

    #[test]
    fn landmark_set_reads_plain_json_array() {
        let parsed: LandmarkSet = serde_json::from_str(r#"[{"x": 1.5, "y": 2.0}]"#).expect("json");
        assert_eq!(parsed, set(&[(1.5, 2.0)]));
    }
}
