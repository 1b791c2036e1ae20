//! TrafficPipeline driving a track feed through the aggregator.

use std::io::Write;

use tracing::{error, info, warn};

use crate::analytics::{FrameAggregator, FrameMetrics, TrackStateStore};
use crate::config::AnalyticsConfig;
use crate::error::{AnalyticsError, Result};
use crate::integration::{StopSignal, TrackFeed};
use crate::output::{MetricsCsvWriter, OutputSink, SummaryReport};

/// Consumer of per-frame results, e.g. a renderer drawing the overlay.
///
/// Observers only see finished frames and never influence aggregation.
pub trait FrameObserver {
    fn on_frame(&mut self, metrics: &FrameMetrics, store: &TrackStateStore) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<W: Write> FrameObserver for MetricsCsvWriter<W> {
    fn on_frame(&mut self, metrics: &FrameMetrics, _store: &TrackStateStore) -> Result<()> {
        self.write(metrics)
    }

    fn finish(&mut self) -> Result<()> {
        self.flush()
    }
}

/// Why the driver loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    Cancelled,
    FrameLimit,
    SourceFailed,
}

/// Summary of a finished run.
#[derive(Debug)]
pub struct RunOutcome {
    pub frames: u64,
    pub records: u64,
    /// Frames whose input was rejected
    pub skipped_frames: u64,
    pub stop: StopReason,
    /// Set when `stop == StopReason::SourceFailed`
    pub source_error: Option<AnalyticsError>,
    pub report: SummaryReport,
}

/// Bundles a track feed, the aggregator and an output sink into the
/// sequential per-frame driver loop.
pub struct TrafficPipeline<F: TrackFeed, S: OutputSink> {
    feed: F,
    sink: S,
    aggregator: FrameAggregator,
    observers: Vec<Box<dyn FrameObserver>>,
    max_frames: Option<u64>,
}

impl<F: TrackFeed, S: OutputSink> TrafficPipeline<F, S> {
    /// Create a pipeline. The config is validated here, before any frame is
    /// pulled.
    pub fn new(feed: F, sink: S, config: AnalyticsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            feed,
            sink,
            aggregator: FrameAggregator::new(config.thresholds, config.regions),
            observers: Vec::new(),
            max_frames: None,
        })
    }

    /// Create a pipeline with the default configuration.
    pub fn with_default_config(feed: F, sink: S) -> Self {
        let config = AnalyticsConfig::default();
        Self {
            feed,
            sink,
            aggregator: FrameAggregator::new(config.thresholds, config.regions),
            observers: Vec::new(),
            max_frames: None,
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn FrameObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Stop after this many frames have been pulled.
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    /// Run until the feed ends, `stop` is raised or the frame limit is hit.
    ///
    /// The feed is released and the summary report produced on every one of
    /// these paths. A failing output sink or observer aborts the run with its
    /// error, after the feed has been released.
    pub fn run(&mut self, stop: &StopSignal) -> Result<RunOutcome> {
        let result = self.drive(stop);
        self.feed.release();
        result
    }

    fn drive(&mut self, stop: &StopSignal) -> Result<RunOutcome> {
        info!(
            thresholds = ?self.aggregator.thresholds(),
            regions = ?self.aggregator.bounds(),
            "traffic analysis started"
        );

        let mut records = 0u64;
        let mut skipped_frames = 0u64;
        let mut source_error = None;

        let stop_reason = loop {
            if stop.is_stopped() {
                break StopReason::Cancelled;
            }
            if self
                .max_frames
                .is_some_and(|max| self.aggregator.frame_count() >= max)
            {
                break StopReason::FrameLimit;
            }

            let result = match self.feed.next_tracks() {
                None => break StopReason::EndOfStream,
                Some(Ok(tracks)) => self.aggregator.process_frame(&tracks),
                Some(Err(e)) if e.is_input_error() => {
                    self.aggregator.skip_frame();
                    Err(e)
                }
                Some(Err(e)) => {
                    error!(error = %e, "frame source failed, stopping");
                    source_error = Some(e);
                    break StopReason::SourceFailed;
                }
            };

            match result {
                Ok(output) => {
                    for record in &output.records {
                        self.sink.append(record)?;
                    }
                    records += output.records.len() as u64;
                    for observer in &mut self.observers {
                        observer.on_frame(&output.metrics, self.aggregator.store())?;
                    }
                }
                Err(e) => {
                    warn!(frame = self.aggregator.frame_count(), error = %e, "skipping frame");
                    skipped_frames += 1;
                }
            }
        };

        self.sink.finish()?;
        for observer in &mut self.observers {
            observer.finish()?;
        }

        let report = self.finalize();
        info!(
            frames = report.frames,
            records,
            skipped_frames,
            tracks = report.final_positions.len(),
            stop = ?stop_reason,
            congestion = %report.congestion,
            "traffic analysis finished"
        );

        Ok(RunOutcome {
            frames: report.frames,
            records,
            skipped_frames,
            stop: stop_reason,
            source_error,
            report,
        })
    }

    /// Summary report for the current state. Safe to call repeatedly.
    pub fn finalize(&self) -> SummaryReport {
        SummaryReport::finalize(
            self.aggregator.frame_count(),
            self.aggregator.last_congestion(),
            *self.aggregator.thresholds(),
            self.aggregator.store(),
        )
    }

    pub fn aggregator(&self) -> &FrameAggregator {
        &self.aggregator
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
