//! Integration module for connecting detectors, alert logs and recorded
//! streams to a [`ZoneMonitor`](crate::ZoneMonitor).

mod builder;
mod detector;
mod pipeline;
mod replay;
mod sink;

pub use builder::DetectionBuilder;
pub use detector::DetectionSource;
pub use pipeline::{MonitorPipeline, PipelineError};
pub use replay::{RecordedFrame, ReplayReader};
pub use sink::{AlertSink, CSV_HEADER, CsvAlertSink, LogAlertSink};
