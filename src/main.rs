use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use zone_dwell::{
    AlertSink, CsvAlertSink, LogAlertSink, MonitorConfig, ReplayReader, ZoneMonitor,
};

#[derive(Parser)]
#[command(
    name = "zone-dwell",
    version,
    about = "Replay recorded detections through the forbidden-zone monitor",
    long_about = None
)]
struct Cli {
    /// JSON-lines file of recorded frames
    #[arg(short, long)]
    input: PathBuf,

    /// Monitor config (JSON); built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV file alerts are appended to. Rows carry the wall-clock time they
    /// were written and the frame timestamp of the replayed frame.
    #[arg(short, long, default_value = "data/forbidden_zone_events.csv")]
    log: PathBuf,

    /// Print every raised alert as a JSON line on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Respect RUST_LOG; default to info
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => MonitorConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MonitorConfig::default(),
    };
    let mut monitor = ZoneMonitor::from_config(&config).context("building monitor")?;

    let csv = CsvAlertSink::open(&cli.log)
        .with_context(|| format!("opening alert log {}", cli.log.display()))?;
    let mut sink = (LogAlertSink, csv);

    let reader = ReplayReader::open(&cli.input)
        .with_context(|| format!("opening replay {}", cli.input.display()))?;

    info!(
        input = %cli.input.display(),
        zones = config.zones.len(),
        classes = ?config.allowed_classes,
        "replaying"
    );

    let mut frames = 0usize;
    let mut alerts = 0usize;
    let mut last_timestamp = f64::NEG_INFINITY;

    for frame in reader {
        let frame = frame.context("reading replay")?;
        if frame.timestamp < last_timestamp {
            warn!(
                timestamp = frame.timestamp,
                previous = last_timestamp,
                "frame timestamp went backwards"
            );
        }
        last_timestamp = frame.timestamp;

        let report =
            monitor.process_frame(&frame.detections, frame.width, frame.height, frame.timestamp);
        for alert in &report.alerts {
            sink.record(alert).context("recording alert")?;
            if cli.json {
                println!("{}", serde_json::to_string(alert)?);
            }
        }

        frames += 1;
        alerts += report.alerts.len();
    }

    info!(
        frames,
        alerts,
        live_tracks = monitor.tracker().len(),
        log = %cli.log.display(),
        "replay finished"
    );
    Ok(())
}
