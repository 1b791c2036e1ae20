use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use traffic_analytics::{
    AnalyticsConfig, CsvRecordSink, MetricsCsvWriter, StopReason, StopSignal, TrackFeed,
    TrackLogReplay, TrafficPipeline,
};

#[derive(Parser, Debug)]
#[command(
    name = "traffic-analytics",
    about = "Traffic analytics over recorded tracker output"
)]
struct Args {
    /// Recorded track log, one JSON object per frame ("-" for stdin)
    #[arg(long, value_name = "PATH")]
    tracks: PathBuf,
    /// YAML config with thresholds and regions
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[arg(long)]
    heavy_threshold: Option<usize>,
    #[arg(long)]
    moderate_threshold: Option<usize>,
    #[arg(long)]
    left_region: Option<i64>,
    #[arg(long)]
    right_region: Option<i64>,
    #[arg(long)]
    exit_region: Option<i64>,
    /// Per-object record stream
    #[arg(long, default_value = "traffic_analysis_output.csv")]
    output: PathBuf,
    /// Closing summary report
    #[arg(long, default_value = "business_insights.txt")]
    report: PathBuf,
    /// Optional per-frame metrics CSV
    #[arg(long, value_name = "PATH")]
    metrics: Option<PathBuf>,
    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,
    /// Do not watch stdin for `q` to stop early
    #[arg(long)]
    quiet_stdin: bool,
}

impl Args {
    fn analytics_config(&self) -> Result<AnalyticsConfig> {
        let mut config = match &self.config {
            Some(path) => AnalyticsConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => AnalyticsConfig::default(),
        };

        if let Some(v) = self.heavy_threshold {
            config.thresholds.heavy = v;
        }
        if let Some(v) = self.moderate_threshold {
            config.thresholds.moderate = v;
        }
        if let Some(v) = self.left_region {
            config.regions.left = v;
        }
        if let Some(v) = self.right_region {
            config.regions.right = v;
        }
        if let Some(v) = self.exit_region {
            config.regions.exit = v;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    fn reads_stdin(&self) -> bool {
        self.tracks.as_os_str() == "-"
    }
}

/// Stop the run when the user types `q` on stdin.
fn watch_stdin(stop: StopSignal) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) if line.trim() == "q" => {
                    info!("stop requested");
                    stop.stop();
                    break;
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("traffic_analytics=info")),
        )
        .init();

    let args = Args::parse();
    let config = args.analytics_config()?;

    let feed: Box<dyn TrackFeed> = if args.reads_stdin() {
        Box::new(TrackLogReplay::stdin())
    } else {
        Box::new(
            TrackLogReplay::open(&args.tracks)
                .with_context(|| format!("opening track log {}", args.tracks.display()))?,
        )
    };

    let sink = CsvRecordSink::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let mut pipeline = TrafficPipeline::new(feed, sink, config)?;
    if let Some(path) = &args.metrics {
        let writer = MetricsCsvWriter::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(writer));
    }
    if let Some(max) = args.max_frames {
        pipeline = pipeline.with_max_frames(max);
    }

    let stop = StopSignal::new();
    if !args.quiet_stdin && !args.reads_stdin() {
        watch_stdin(stop.clone());
    }

    let outcome = pipeline
        .run(&stop)
        .context("running traffic analysis")?;
    drop(pipeline);

    outcome
        .report
        .write_to_path(&args.report)
        .with_context(|| format!("writing {}", args.report.display()))?;

    info!(
        frames = outcome.frames,
        records = outcome.records,
        output = %args.output.display(),
        report = %args.report.display(),
        "results saved"
    );
    if outcome.skipped_frames > 0 {
        warn!(skipped = outcome.skipped_frames, "some frames were skipped");
    }

    if outcome.stop == StopReason::SourceFailed {
        match outcome.source_error {
            Some(e) => return Err(e).context("track log could not be read to the end"),
            None => bail!("track log could not be read to the end"),
        }
    }
    Ok(())
}
