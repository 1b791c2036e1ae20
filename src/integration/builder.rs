//! Builder for creating TrackedObject values from various input formats.

use crate::analytics::{BBox, TrackId, TrackedObject, pixel_from_f32};
use crate::error::{AnalyticsError, Result};

/// Builder for creating [`TrackedObject`] values from tracker outputs that
/// use floating point boxes in TLBR, XYWH or TLWH format.
///
/// Coordinates are truncated to whole pixels on [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct TrackedObjectBuilder {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    track_id: Option<u64>,
    confirmed: bool,
}

impl Default for TrackedObjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackedObjectBuilder {
    /// Create a new builder for a confirmed track.
    pub fn new() -> Self {
        Self {
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 0.0,
            track_id: None,
            confirmed: true,
        }
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.x1 = cx - w / 2.0;
        self.y1 = cy - h / 2.0;
        self.x2 = cx + w / 2.0;
        self.y2 = cy + h / 2.0;
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, l: f32, t: f32, w: f32, h: f32) -> Self {
        self.x1 = l;
        self.y1 = t;
        self.x2 = l + w;
        self.y2 = t + h;
        self
    }

    /// Set the stable track identity.
    pub fn id(mut self, track_id: u64) -> Self {
        self.track_id = Some(track_id);
        self
    }

    /// Mark the track as confirmed or tentative.
    pub fn confirmed(mut self, confirmed: bool) -> Self {
        self.confirmed = confirmed;
        self
    }

    /// Build the final [`TrackedObject`].
    ///
    /// Fails when no id was set or a coordinate is not a finite number within
    /// the pixel range.
    pub fn build(self) -> Result<TrackedObject> {
        let track_id = self
            .track_id
            .ok_or_else(|| AnalyticsError::invalid_track("track has no identity"))?;

        let coords = [self.x1, self.y1, self.x2, self.y2];
        let invalid = || {
            AnalyticsError::invalid_track(format!("track {track_id}: invalid box {coords:?}"))
        };

        let bbox = BBox::from_tlbr(
            pixel_from_f32(self.x1).ok_or_else(invalid)?,
            pixel_from_f32(self.y1).ok_or_else(invalid)?,
            pixel_from_f32(self.x2).ok_or_else(invalid)?,
            pixel_from_f32(self.y2).ok_or_else(invalid)?,
        );
        Ok(TrackedObject::new(TrackId(track_id), bbox, self.confirmed))
    }
}
