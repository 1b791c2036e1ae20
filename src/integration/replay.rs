//! Replays a recorded track log as a [`TrackFeed`].

use std::fs::File;
use std::io::{self, BufRead, BufReader, StdinLock};
use std::path::Path;

use serde::Deserialize;

use crate::analytics::TrackedObject;
use crate::error::Result;
use crate::integration::TrackFeed;

#[derive(Deserialize)]
struct FrameLine {
    #[serde(default)]
    tracks: Vec<TrackedObject>,
}

/// Reads tracker output recorded as JSON lines, one frame per line:
///
/// ```text
/// {"tracks": [{"id": 1, "bbox": [150, 80, 250, 120], "confirmed": true}]}
/// ```
///
/// Blank lines are skipped. A line that does not parse, including one that is
/// not valid UTF-8, fails only its own frame; a read error ends the stream
/// after being reported once.
pub struct TrackLogReplay<R> {
    reader: Option<R>,
    line: Vec<u8>,
}

impl TrackLogReplay<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl TrackLogReplay<StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> TrackLogReplay<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            line: Vec::new(),
        }
    }
}

impl<R: BufRead> TrackFeed for TrackLogReplay<R> {
    fn next_tracks(&mut self) -> Option<Result<Vec<TrackedObject>>> {
        let reader = self.reader.as_mut()?;
        loop {
            self.line.clear();
            match reader.read_until(b'\n', &mut self.line) {
                Ok(0) => {
                    self.reader = None;
                    return None;
                }
                Ok(_) if self.line.iter().all(u8::is_ascii_whitespace) => continue,
                Ok(_) => {
                    let parsed = serde_json::from_slice::<FrameLine>(&self.line)
                        .map(|frame| frame.tracks)
                        .map_err(Into::into);
                    return Some(parsed);
                }
                Err(e) => {
                    self.reader = None;
                    return Some(Err(e.into()));
                }
            }
        }
    }

    fn release(&mut self) {
        self.reader = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::TrackId;
    use crate::error::AnalyticsError;
    use std::io::Cursor;

    #[test]
    fn test_replay_frames() {
        let log = "\
{\"tracks\": [{\"id\": 1, \"bbox\": [150, 80, 250, 120]}]}

{\"tracks\": []}
{\"tracks\": [{\"id\": 2, \"bbox\": [0, 0, 10, 10], \"confirmed\": false}]}
";
        let mut feed = TrackLogReplay::new(Cursor::new(log));

        let first = feed.next_tracks().unwrap().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].track_id, TrackId(1));
        assert_eq!(first[0].center(), (200, 100));

        assert!(feed.next_tracks().unwrap().unwrap().is_empty());

        let third = feed.next_tracks().unwrap().unwrap();
        assert!(!third[0].confirmed);

        assert!(feed.next_tracks().is_none());
        assert!(feed.next_tracks().is_none());
    }

    #[test]
    fn test_malformed_line_fails_only_its_frame() {
        let log = "\
{\"tracks\": [{\"id\": 1, \"bbox\": [\"a\", 0, 10, 10]}]}
{\"tracks\": [{\"bbox\": [0, 0, 10, 10]}]}
{\"tracks\": [{\"id\": 3, \"bbox\": [0, 0, 10, 10]}]}
";
        let mut feed = TrackLogReplay::new(Cursor::new(log));

        let err = feed.next_tracks().unwrap().unwrap_err();
        assert!(matches!(err, AnalyticsError::Json(_)));
        assert!(err.is_input_error());

        // Missing identity
        assert!(feed.next_tracks().unwrap().is_err());

        assert_eq!(feed.next_tracks().unwrap().unwrap()[0].track_id, TrackId(3));
    }

    #[test]
    fn test_invalid_utf8_line_fails_only_its_frame() {
        let mut log = b"{\"tracks\": [{\"id\": 1, \"bbox\": [0, 0, 10, 10]}]}\n".to_vec();
        log.extend_from_slice(b"{\"tracks\": [\xff]}\n");
        log.extend_from_slice(b"{\"tracks\": [{\"id\": 3, \"bbox\": [0, 0, 10, 10]}]}\n");
        let mut feed = TrackLogReplay::new(Cursor::new(log));

        assert_eq!(feed.next_tracks().unwrap().unwrap()[0].track_id, TrackId(1));

        let err = feed.next_tracks().unwrap().unwrap_err();
        assert!(matches!(err, AnalyticsError::Json(_)));
        assert!(err.is_input_error());

        assert_eq!(feed.next_tracks().unwrap().unwrap()[0].track_id, TrackId(3));
        assert!(feed.next_tracks().is_none());
    }

    #[test]
    fn test_release_ends_stream() {
        let mut feed = TrackLogReplay::new(Cursor::new("{\"tracks\": []}\n"));
        feed.release();
        assert!(feed.next_tracks().is_none());
    }
}
