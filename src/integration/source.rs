//! Traits for the external collaborators of the analytics pipeline.

use ndarray::{Array2, ArrayView2};

use crate::analytics::{BBox, TrackId, TrackedObject, pixel_from_f32};
use crate::error::{AnalyticsError, BoxError, Result};

/// A decoded video frame.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Raw image bytes (format depends on the source)
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Detector output for a single object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Bounding box in TLBR format
    pub bbox: BBox,
    /// Detection confidence score
    pub score: f32,
}

impl Detection {
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64, score: f32) -> Self {
        Self {
            bbox: BBox::from_tlbr(x1, y1, x2, y2),
            score,
        }
    }
}

/// Source of frames, e.g. a video file or a camera stream.
pub trait FrameSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Pull the next frame. `Ok(None)` means the stream has ended.
    fn next_frame(&mut self) -> std::result::Result<Option<Frame>, Self::Error>;

    /// Release the underlying device or file. Called once the run is over.
    fn release(&mut self) {}
}

/// Trait for object detection inference backends.
///
/// # Example
///
/// ```ignore
/// use traffic_analytics::{Detection, DetectionSource};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<Detection>, Self::Error> {
///         // Run inference and return detections
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run inference on raw image data and return detections.
    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> std::result::Result<Vec<Detection>, Self::Error>;
}

/// Multi-object tracker assigning stable identities to detections.
pub trait ObjectTracker {
    /// Tracker output, anything convertible into tracked objects.
    type Output: IntoTrackedObjects;
    type Error: std::error::Error + Send + Sync + 'static;

    fn update(
        &mut self,
        detections: Vec<Detection>,
    ) -> std::result::Result<Self::Output, Self::Error>;
}

/// Helper trait for converting tracker-specific outputs to [`TrackedObject`].
pub trait IntoTrackedObjects {
    fn into_tracked_objects(self) -> Result<Vec<TrackedObject>>;
}

impl IntoTrackedObjects for Vec<TrackedObject> {
    fn into_tracked_objects(self) -> Result<Vec<TrackedObject>> {
        Ok(self)
    }
}

/// Tracker output matrix with one row per track:
/// `[x1, y1, x2, y2, track_id]` or `[x1, y1, x2, y2, track_id, confirmed]`.
///
/// Coordinates are truncated to whole pixels. Without the sixth column every
/// row is taken as confirmed; otherwise any non-zero value is.
impl IntoTrackedObjects for ArrayView2<'_, f32> {
    fn into_tracked_objects(self) -> Result<Vec<TrackedObject>> {
        let cols = self.ncols();
        if self.nrows() > 0 && cols < 5 {
            return Err(AnalyticsError::invalid_track(format!(
                "expected at least 5 columns per track, got {cols}"
            )));
        }

        self.rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                if let Some(v) = row.iter().find(|v| !v.is_finite()) {
                    return Err(AnalyticsError::invalid_track(format!(
                        "row {i}: non-numeric value {v}"
                    )));
                }

                let id = row[4];
                if id < 0.0 || id.fract() != 0.0 {
                    return Err(AnalyticsError::invalid_track(format!(
                        "row {i}: {id} is not a valid track id"
                    )));
                }

                let confirmed = cols < 6 || row[5] != 0.0;
                let mut coords = [0i64; 4];
                for (c, &v) in coords.iter_mut().zip(row.iter()) {
                    *c = pixel_from_f32(v).ok_or_else(|| {
                        AnalyticsError::invalid_track(format!(
                            "row {i}: coordinate {v} outside the pixel range"
                        ))
                    })?;
                }
                let bbox = BBox::from(coords);
                Ok(TrackedObject::new(TrackId(id as u64), bbox, confirmed))
            })
            .collect()
    }
}

impl IntoTrackedObjects for Array2<f32> {
    fn into_tracked_objects(self) -> Result<Vec<TrackedObject>> {
        self.view().into_tracked_objects()
    }
}

/// Per-frame supply of tracked objects for the pipeline.
pub trait TrackFeed {
    /// Tracked objects for the next frame.
    ///
    /// `None` ends the stream. An input error only fails that frame; any
    /// other error stops the run.
    fn next_tracks(&mut self) -> Option<Result<Vec<TrackedObject>>>;

    /// Release whatever the feed holds open.
    fn release(&mut self) {}
}

impl<T: TrackFeed + ?Sized> TrackFeed for Box<T> {
    fn next_tracks(&mut self) -> Option<Result<Vec<TrackedObject>>> {
        (**self).next_tracks()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Composes a frame source, a detector and a tracker into a [`TrackFeed`].
pub struct DetectAndTrack<F, D, T> {
    source: F,
    detector: D,
    tracker: T,
}

impl<F, D, T> DetectAndTrack<F, D, T>
where
    F: FrameSource,
    D: DetectionSource,
    T: ObjectTracker,
{
    pub fn new(source: F, detector: D, tracker: T) -> Self {
        Self {
            source,
            detector,
            tracker,
        }
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    fn track_frame(&mut self, frame: &Frame) -> Result<Vec<TrackedObject>> {
        let detections = self
            .detector
            .detect(&frame.data, frame.width, frame.height)
            .map_err(collaborator)?;
        self.tracker
            .update(detections)
            .map_err(collaborator)?
            .into_tracked_objects()
    }
}

fn collaborator<E: std::error::Error + Send + Sync + 'static>(err: E) -> AnalyticsError {
    AnalyticsError::Collaborator(BoxError::from(err))
}

impl<F, D, T> TrackFeed for DetectAndTrack<F, D, T>
where
    F: FrameSource,
    D: DetectionSource,
    T: ObjectTracker,
{
    fn next_tracks(&mut self) -> Option<Result<Vec<TrackedObject>>> {
        match self.source.next_frame() {
            Ok(Some(frame)) => Some(self.track_frame(&frame)),
            Ok(None) => None,
            Err(e) => Some(Err(AnalyticsError::Source(Box::new(e)))),
        }
    }

    fn release(&mut self) {
        self.source.release();
    }
}
