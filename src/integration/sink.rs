//! Destinations for raised alerts.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::error::SinkError;
use crate::tracker::Alert;

/// Column names of the alert log. `timestamp` is the wall-clock time the row
/// was written; `frame_time` is the capture timestamp of the alerting frame.
pub const CSV_HEADER: [&str; 6] = [
    "timestamp",
    "zone",
    "class",
    "dwell_seconds",
    "bbox[x1,y1,x2,y2]",
    "frame_time",
];

/// Somewhere alerts are persisted or forwarded to.
pub trait AlertSink {
    fn record(&mut self, alert: &Alert) -> Result<(), SinkError>;
}

/// Collects alerts in memory.
impl AlertSink for Vec<Alert> {
    fn record(&mut self, alert: &Alert) -> Result<(), SinkError> {
        self.push(alert.clone());
        Ok(())
    }
}

impl<S: AlertSink + ?Sized> AlertSink for &mut S {
    fn record(&mut self, alert: &Alert) -> Result<(), SinkError> {
        (**self).record(alert)
    }
}

impl<S: AlertSink + ?Sized> AlertSink for Box<S> {
    fn record(&mut self, alert: &Alert) -> Result<(), SinkError> {
        (**self).record(alert)
    }
}

/// Fan out to both sinks, first one first.
impl<A: AlertSink, B: AlertSink> AlertSink for (A, B) {
    fn record(&mut self, alert: &Alert) -> Result<(), SinkError> {
        self.0.record(alert)?;
        self.1.record(alert)
    }
}

/// Reports alerts through `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn record(&mut self, alert: &Alert) -> Result<(), SinkError> {
        info!(
            track_id = alert.track_id,
            zone = %alert.zone,
            class = %alert.class_name,
            dwell_seconds = alert.dwell_seconds,
            "forbidden object in zone"
        );
        Ok(())
    }
}

/// Appends one row per alert to a CSV file.
///
/// The header is written only when the file is created or empty, so
/// successive runs extend the same log.
pub struct CsvAlertSink {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl CsvAlertSink {
    /// Open `path` for appending, creating parent directories and the file
    /// as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::Writer::from_writer(file);
        if needs_header {
            writer.write_record(CSV_HEADER)?;
            writer.flush()?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            writer,
        })
    }

    /// Get the path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AlertSink for CsvAlertSink {
    fn record(&mut self, alert: &Alert) -> Result<(), SinkError> {
        let [x1, y1, x2, y2] = alert.bbox.to_pixels();
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();

        self.writer.write_record([
            timestamp,
            alert.zone.clone(),
            alert.class_name.clone(),
            format!("{:.2}", alert.dwell_seconds),
            format!("[{x1}, {y1}, {x2}, {y2}]"),
            format!("{:.3}", alert.timestamp),
        ])?;
        self.writer.flush()?;
        Ok(())
    }
}
