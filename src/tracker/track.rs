//! A single tracked object scoped to one class in one zone.

use crate::geometry::BoundingBox;
use crate::tracker::detection::FilteredDetection;
use crate::tracker::track_state::TrackState;

/// Single object track.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Identifier unique within the owning track manager
    pub track_id: u64,
    pub state: TrackState,
    /// Most recently matched box
    pub bbox: BoundingBox,
    pub class_name: String,
    pub zone_name: String,
    /// Confidence of the most recently matched detection
    pub confidence: f32,
    /// Timestamp (seconds) of the detection that spawned the track
    pub first_seen: f64,
    /// Timestamp (seconds) of the most recent match
    pub last_seen: f64,
    /// Seconds accumulated across matched frames
    pub dwell: f64,
    /// Set once when dwell first reaches the alert threshold
    pub alerted: bool,
}

impl Track {
    pub(crate) fn spawn(track_id: u64, detection: FilteredDetection, now: f64) -> Self {
        Self {
            track_id,
            state: TrackState::New,
            bbox: detection.bbox,
            class_name: detection.class_name,
            zone_name: detection.zone_name,
            confidence: detection.confidence,
            first_seen: now,
            last_seen: now,
            dwell: 0.0,
            alerted: false,
        }
    }

    /// Absorb a matched detection and accrue the time since the last match.
    ///
    /// The step is never negative, and is clamped to `max_step` when set.
    pub(crate) fn update(&mut self, detection: &FilteredDetection, now: f64, max_step: Option<f64>) {
        let mut step = (now - self.last_seen).max(0.0);
        if let Some(max_step) = max_step {
            step = step.min(max_step);
        }

        self.dwell += step;
        self.bbox = detection.bbox;
        self.confidence = detection.confidence;
        self.last_seen = now;
        self.state = TrackState::Tracked;
    }

    pub(crate) fn mark_lost(&mut self) {
        self.state = TrackState::Lost;
    }

    /// Whether the track has gone unmatched for longer than `ttl` seconds.
    #[inline]
    pub fn is_expired(&self, now: f64, ttl: f64) -> bool {
        now - self.last_seen > ttl
    }

    /// Class and zone must both agree before IoU is even considered.
    #[inline]
    pub fn same_key(&self, detection: &FilteredDetection) -> bool {
        self.class_name == detection.class_name && self.zone_name == detection.zone_name
    }

    /// Overlay caption, e.g. `knife (No-Blade Zone 1)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.class_name, self.zone_name)
    }
}
