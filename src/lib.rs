//! Forbidden-zone intrusion detection on top of a per-frame object detector.
//!
//! Detections are gated by class and zone, associated into tracks by IoU,
//! and a track raises a single [`Alert`] once it has dwelt in its zone for
//! long enough.
//!
//! ```
//! use zone_dwell::{Detection, MonitorConfig, ZoneMonitor};
//!
//! let mut monitor = ZoneMonitor::from_config(&MonitorConfig::default()).unwrap();
//! let knife = [Detection::new(100.0, 300.0, 140.0, 360.0, "knife", 0.9)];
//!
//! let mut alerts = Vec::new();
//! for now in [0.0, 0.3, 0.6, 0.9] {
//!     alerts.extend(monitor.process_frame(&knife, 640, 480, now).alerts);
//! }
//! assert_eq!(alerts.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod integration;
pub mod monitor;
pub mod tracker;
pub mod zone;

pub use config::{MonitorConfig, ZoneConfig};
pub use error::{ConfigError, GeometryError, ReplayError, SinkError};
pub use geometry::BoundingBox;
pub use integration::{
    AlertSink, CsvAlertSink, DetectionBuilder, DetectionSource, LogAlertSink, MonitorPipeline,
    PipelineError, RecordedFrame, ReplayReader,
};
pub use monitor::{FrameReport, ZoneMonitor};
pub use tracker::{
    Alert, Detection, DetectionFilter, FilteredDetection, Track, TrackManager, TrackState,
    TrackerConfig,
};
pub use zone::{Zone, ZoneRegistry, ZoneSpec};
