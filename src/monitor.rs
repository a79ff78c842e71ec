//! Per-frame orchestration: zones, filtering, tracking and alerting.

use crate::config::MonitorConfig;
use crate::error::ConfigError;
use crate::tracker::{Alert, Detection, DetectionFilter, Track, TrackManager, TrackerConfig};
use crate::zone::{Zone, ZoneRegistry, ZoneSpec};

/// Outcome of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Detached copy of every live track, for rendering
    pub tracks: Vec<Track>,
    /// Alerts raised on this frame, in track order
    pub alerts: Vec<Alert>,
}

/// Drives one camera stream.
///
/// Feed it every frame, in non-decreasing timestamp order, with whatever
/// the detector reported for that frame.
#[derive(Debug, Clone)]
pub struct ZoneMonitor {
    zones: ZoneRegistry,
    filter: DetectionFilter,
    tracker: TrackManager,
}

impl ZoneMonitor {
    /// Create a new monitor from validated zones, a class filter and tracker
    /// thresholds.
    pub fn new(zones: Vec<ZoneSpec>, filter: DetectionFilter, tracker_config: TrackerConfig) -> Self {
        Self {
            zones: ZoneRegistry::new(zones),
            filter,
            tracker: TrackManager::new(tracker_config),
        }
    }

    /// Create a new monitor from a [`MonitorConfig`], validating it first.
    ///
    /// ```
    /// use zone_dwell::{ConfigError, MonitorConfig, ZoneMonitor};
    ///
    /// let monitor = ZoneMonitor::from_config(&MonitorConfig::default()).unwrap();
    /// assert_eq!(monitor.registry().specs()[0].name(), "No-Blade Zone 1");
    /// assert!(monitor.filter().allowed_classes().contains("knife"));
    /// assert!(monitor.tracker().is_empty());
    ///
    /// let bad = MonitorConfig {
    ///     iou_threshold: 2.0,
    ///     ..MonitorConfig::default()
    /// };
    /// assert!(matches!(
    ///     ZoneMonitor::from_config(&bad),
    ///     Err(ConfigError::InvalidThreshold { .. })
    /// ));
    /// ```
    pub fn from_config(config: &MonitorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let filter = DetectionFilter::new(config.allowed_classes.iter().cloned())
            .with_min_confidence(config.min_confidence);
        Ok(Self::new(config.zone_specs()?, filter, config.tracker_config()))
    }

    /// Run one frame observed at `now` seconds on a `width` x `height` image.
    pub fn process_frame(
        &mut self,
        detections: &[Detection],
        width: u32,
        height: u32,
        now: f64,
    ) -> FrameReport {
        let zones = self.zones.resolve(width, height);
        let filtered = self.filter.filter(detections, zones);
        self.tracker.update(filtered, now);
        let alerts = self.tracker.raise_alerts(now);

        FrameReport {
            tracks: self.tracker.snapshot(),
            alerts,
        }
    }

    /// Pixel-space zones from the most recent frame, for drawing overlays.
    pub fn zones(&mut self, width: u32, height: u32) -> &[Zone] {
        self.zones.resolve(width, height)
    }

    /// Get a reference to the zone registry.
    pub fn registry(&self) -> &ZoneRegistry {
        &self.zones
    }

    /// Get a reference to the detection filter.
    pub fn filter(&self) -> &DetectionFilter {
        &self.filter
    }

    /// Get a reference to the track manager.
    pub fn tracker(&self) -> &TrackManager {
        &self.tracker
    }

    /// Forget all tracks, e.g. when the source is rewound.
    pub fn reset(&mut self) {
        self.tracker.clear();
    }
}
