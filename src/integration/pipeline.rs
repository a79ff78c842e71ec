//! MonitorPipeline for combining detection with zone monitoring.

use thiserror::Error;

use crate::error::SinkError;
use crate::monitor::{FrameReport, ZoneMonitor};

use super::{AlertSink, DetectionSource};

/// Failure of one pipeline step. Tracking itself never fails.
#[derive(Debug, Error)]
pub enum PipelineError<E> {
    #[error("detection failed: {0}")]
    Detection(E),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Bundles a detector, a [`ZoneMonitor`] and an alert sink so a host loop
/// only has to hand over frames.
pub struct MonitorPipeline<D: DetectionSource, S: AlertSink> {
    detector: D,
    monitor: ZoneMonitor,
    sink: S,
}

impl<D: DetectionSource, S: AlertSink> MonitorPipeline<D, S> {
    /// Create a new pipeline.
    pub fn new(detector: D, monitor: ZoneMonitor, sink: S) -> Self {
        Self {
            detector,
            monitor,
            sink,
        }
    }

    /// Detect, track and persist alerts for a single frame.
    ///
    /// Every alert of the frame is offered to the sink even if the sink
    /// fails on one of them; the first sink error is returned after the
    /// frame has been fully processed.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `now` - Capture timestamp in seconds
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
        now: f64,
    ) -> Result<FrameReport, PipelineError<D::Error>> {
        let detections = self
            .detector
            .detect(input, width, height)
            .map_err(PipelineError::Detection)?;
        let report = self.monitor.process_frame(&detections, width, height, now);

        let mut first_err = None;
        for alert in &report.alerts {
            if let Err(err) = self.sink.record(alert) {
                first_err = first_err.or(Some(err));
            }
        }
        match first_err {
            Some(err) => Err(err.into()),
            None => Ok(report),
        }
    }

    /// Get a reference to the detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the monitor.
    pub fn monitor(&self) -> &ZoneMonitor {
        &self.monitor
    }

    /// Get a mutable reference to the monitor.
    pub fn monitor_mut(&mut self) -> &mut ZoneMonitor {
        &mut self.monitor
    }

    /// Get a reference to the alert sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Tear the pipeline apart, e.g. to flush or inspect the sink.
    pub fn into_parts(self) -> (D, ZoneMonitor, S) {
        (self.detector, self.monitor, self.sink)
    }
}
