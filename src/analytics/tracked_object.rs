use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable track identity assigned by the external tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TrackId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Integer pixel bounding box in TLBR format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i64; 4]", into = "[i64; 4]")]
pub struct BBox {
    /// Top-left x coordinate
    pub x1: i64,
    /// Top-left y coordinate
    pub y1: i64,
    /// Bottom-right x coordinate
    pub x2: i64,
    /// Bottom-right y coordinate
    pub y2: i64,
}

impl BBox {
    #[inline]
    pub fn from_tlbr(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[inline]
    pub fn to_tlbr(&self) -> [i64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Center point, rounded toward negative infinity.
    #[inline]
    pub fn center(&self) -> (i64, i64) {
        (midpoint(self.x1, self.x2), midpoint(self.y1, self.y2))
    }
}

/// Floor of the midpoint; always representable, whatever the inputs.
#[inline]
fn midpoint(a: i64, b: i64) -> i64 {
    (a as i128 + b as i128).div_euclid(2) as i64
}

/// Truncate a floating point coordinate to a whole pixel.
///
/// `None` for non-finite values and values outside the `i32` range, which no
/// frame can contain and which would otherwise saturate silently.
pub(crate) fn pixel_from_f32(v: f32) -> Option<i64> {
    const LIMIT: f32 = i32::MAX as f32;
    (v.is_finite() && (-LIMIT..=LIMIT).contains(&v)).then_some(v as i64)
}

impl From<[i64; 4]> for BBox {
    fn from([x1, y1, x2, y2]: [i64; 4]) -> Self {
        Self::from_tlbr(x1, y1, x2, y2)
    }
}

impl From<BBox> for [i64; 4] {
    fn from(bbox: BBox) -> Self {
        bbox.to_tlbr()
    }
}

/// One object reported by the external tracker for a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedObject {
    #[serde(rename = "id")]
    pub track_id: TrackId,
    pub bbox: BBox,
    /// Tentative tracks are reported with `confirmed == false` and ignored
    #[serde(default = "default_confirmed")]
    pub confirmed: bool,
}

fn default_confirmed() -> bool {
    true
}

impl TrackedObject {
    pub fn new(track_id: impl Into<TrackId>, bbox: BBox, confirmed: bool) -> Self {
        Self {
            track_id: track_id.into(),
            bbox,
            confirmed,
        }
    }

    /// A confirmed track with the given TLBR box.
    pub fn confirmed(id: u64, x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self::new(id, BBox::from_tlbr(x1, y1, x2, y2), true)
    }

    pub fn center(&self) -> (i64, i64) {
        self.bbox.center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center() {
        let bbox = BBox::from_tlbr(100, 50, 301, 150);
        assert_eq!(bbox.center(), (200, 100));
    }

    #[test]
    fn test_center_floors_negative() {
        let bbox = BBox::from_tlbr(-3, -3, 0, 0);
        assert_eq!(bbox.center(), (-2, -2));
    }

    #[test]
    fn test_center_of_extreme_coordinates() {
        let bbox = BBox::from_tlbr(i64::MAX, i64::MIN, i64::MAX, i64::MAX);
        assert_eq!(bbox.center(), (i64::MAX, -1));
    }

    #[test]
    fn test_pixel_from_f32() {
        assert_eq!(pixel_from_f32(300.9), Some(300));
        assert_eq!(pixel_from_f32(-12.5), Some(-12));
        assert_eq!(pixel_from_f32(1e30), None);
        assert_eq!(pixel_from_f32(f32::NEG_INFINITY), None);
        assert_eq!(pixel_from_f32(f32::NAN), None);
    }

    #[test]
    fn test_deserialize_defaults_confirmed() {
        let obj: TrackedObject = serde_json::from_str(r#"{"id": 7, "bbox": [1, 2, 3, 4]}"#).unwrap();
        assert_eq!(obj.track_id, TrackId(7));
        assert_eq!(obj.bbox, BBox::from_tlbr(1, 2, 3, 4));
        assert!(obj.confirmed);
    }
}
