use std::convert::Infallible;
use std::io::Cursor;

use ndarray::Array2;
use traffic_analytics::{
    CongestionLevel, CsvRecordSink, DetectAndTrack, Detection, DetectionSource, EntryExitStatus,
    Frame, FrameSource, MovementDirection, ObjectTracker, OutputRecord, StopReason, StopSignal,
    TrackId, TrackLogReplay, TrackedObject, TrafficPipeline,
};

/// Confirmed track whose box center lands exactly on (cx, cy).
fn at(id: u64, cx: i64, cy: i64) -> TrackedObject {
    TrackedObject::confirmed(id, cx - 20, cy - 10, cx + 20, cy + 10)
}

fn frame_line(tracks: &[TrackedObject]) -> String {
    let tracks: Vec<String> = tracks
        .iter()
        .map(|t| {
            let [x1, y1, x2, y2] = t.bbox.to_tlbr();
            format!(
                r#"{{"id": {}, "bbox": [{x1}, {y1}, {x2}, {y2}], "confirmed": {}}}"#,
                t.track_id, t.confirmed
            )
        })
        .collect();
    format!("{{\"tracks\": [{}]}}\n", tracks.join(", "))
}

#[test]
fn test_heavy_three_frame_run() {
    // Frame 1: track 1 at (200, 100) plus 11 other vehicles
    let mut frame1 = vec![at(1, 200, 100)];
    frame1.extend((2..=12).map(|id| at(id, 500 + id as i64 * 10, 300)));
    // Frame 2: track 1 moves left, one tentative track
    let mut tentative = at(99, 100, 100);
    tentative.confirmed = false;
    let frame2 = vec![at(1, 150, 100), tentative];
    // Frame 3: track 1 leaves past the exit boundary
    let frame3 = vec![at(1, 1100, 120)];

    let log: String = [&frame1[..], &frame2[..], &frame3[..]]
        .iter()
        .map(|f| frame_line(f))
        .collect();

    let feed = TrackLogReplay::new(Cursor::new(log));
    let sink = CsvRecordSink::new(Vec::new()).unwrap();
    let mut pipeline = TrafficPipeline::with_default_config(feed, sink);

    let outcome = pipeline.run(&StopSignal::new()).unwrap();
    assert_eq!(outcome.stop, StopReason::EndOfStream);
    assert_eq!(outcome.frames, 3);
    assert_eq!(outcome.records, 12 + 1 + 1);

    let csv = String::from_utf8(pipeline.into_sink().into_inner().unwrap()).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(
        rows[0],
        "Frame,ObjectID,Class,TrafficStatus,MovementDirection,EntryExitStatus"
    );
    assert_eq!(rows[1], "1,1,Vehicle,Heavy,Right,Entered");
    assert_eq!(rows[13], "2,1,Vehicle,Light,Left,Entered");
    assert_eq!(rows[14], "3,1,Vehicle,Light,Right,Exited");
    assert_eq!(rows.len(), 15);

    let report = outcome.report.render();
    assert!(report.contains("Total Frames Processed: 3\n"));
    assert!(report.contains("Final Traffic Status: Light Traffic\n"));
    assert!(report.contains("Object 1 final position: (1100, 120)\n"));
    assert!(!report.contains("Object 99"));
    assert!(report.ends_with("Recommendations:\n"));
}

#[test]
fn test_records_match_confirmed_tracks() {
    let frames = vec![
        vec![at(1, 100, 0), at(2, 900, 0)],
        vec![],
        vec![at(1, 120, 0), at(3, 600, 0), at(4, 850, 0)],
    ];
    let log: String = frames.iter().map(|f| frame_line(f)).collect();

    let mut pipeline =
        TrafficPipeline::with_default_config(TrackLogReplay::new(Cursor::new(log)), Vec::new());
    pipeline.run(&StopSignal::new()).unwrap();

    let records: &Vec<OutputRecord> = pipeline.sink();
    for (i, frame) in frames.iter().enumerate() {
        let n = records.iter().filter(|r| r.frame == i as u64 + 1).count();
        assert_eq!(n, frame.len());
    }

    // Track 2 first seen right of the right boundary never entered
    let track2 = records.iter().find(|r| r.track_id == TrackId(2)).unwrap();
    assert_eq!(track2.entry_exit, EntryExitStatus::InZone);
    assert_eq!(track2.direction, MovementDirection::Right);
}

#[test]
fn test_finalize_twice_is_identical() {
    let log = frame_line(&(1..=7).map(|id| at(id, 100 * id as i64, 50)).collect::<Vec<_>>());
    let mut pipeline =
        TrafficPipeline::with_default_config(TrackLogReplay::new(Cursor::new(log)), Vec::new());
    let outcome = pipeline.run(&StopSignal::new()).unwrap();

    assert_eq!(outcome.report.congestion, CongestionLevel::Moderate);
    assert_eq!(
        pipeline.finalize().render().into_bytes(),
        pipeline.finalize().render().into_bytes()
    );
    assert_eq!(pipeline.finalize(), outcome.report);
}

struct CountingSource {
    remaining: usize,
}

impl FrameSource for CountingSource {
    type Error = std::io::Error;

    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some(Frame {
            data: vec![0; 4],
            width: 2,
            height: 2,
        }))
    }
}

struct FixedDetector;

impl DetectionSource for FixedDetector {
    type Error = Infallible;

    fn detect(
        &mut self,
        _input: &[u8],
        _width: u32,
        _height: u32,
    ) -> Result<Vec<Detection>, Self::Error> {
        Ok(vec![Detection::new(180, 90, 220, 110, 0.9)])
    }
}

/// Moves every detection 30px left per frame and reports it as track 5.
struct ShiftingTracker {
    frame: i64,
}

impl ObjectTracker for ShiftingTracker {
    type Output = Array2<f32>;
    type Error = Infallible;

    fn update(&mut self, detections: Vec<Detection>) -> Result<Self::Output, Self::Error> {
        let shift = (30 * self.frame) as f32;
        self.frame += 1;
        let mut out = Array2::zeros((detections.len(), 6));
        for (i, det) in detections.iter().enumerate() {
            let [x1, y1, x2, y2] = det.bbox.to_tlbr();
            out[[i, 0]] = x1 as f32 - shift;
            out[[i, 1]] = y1 as f32;
            out[[i, 2]] = x2 as f32 - shift;
            out[[i, 3]] = y2 as f32;
            out[[i, 4]] = 5.0;
            out[[i, 5]] = 1.0;
        }
        Ok(out)
    }
}

#[test]
fn test_detect_and_track_feed() {
    let feed = DetectAndTrack::new(
        CountingSource { remaining: 3 },
        FixedDetector,
        ShiftingTracker { frame: 0 },
    );

    let mut pipeline = TrafficPipeline::with_default_config(feed, Vec::new());
    let outcome = pipeline.run(&StopSignal::new()).unwrap();
    assert_eq!(outcome.frames, 3);

    let directions: Vec<MovementDirection> =
        pipeline.sink().iter().map(|r| r.direction).collect();
    assert_eq!(
        directions,
        vec![
            MovementDirection::Right,
            MovementDirection::Left,
            MovementDirection::Left
        ]
    );
    assert_eq!(
        outcome.report.final_positions,
        vec![(TrackId(5), (140, 100))]
    );
}
