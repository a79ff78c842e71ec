//! Track lifecycle: expiry, greedy IoU association, dwell accrual, spawning.

use tracing::{debug, trace};

use crate::tracker::alert::{self, Alert};
use crate::tracker::detection::FilteredDetection;
use crate::tracker::matching::{self, AssignmentResult};
use crate::tracker::track::Track;

/// Configuration for the TrackManager.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Minimum IoU for a detection to continue an existing track
    pub iou_threshold: f32,
    /// Seconds a track may go unmatched before it is dropped
    pub ttl_seconds: f64,
    /// Dwell (seconds) at which a track raises its alert
    pub dwell_threshold_seconds: f64,
    /// Upper bound on a single dwell accrual step; `None` leaves it unbounded
    pub max_dwell_step_seconds: Option<f64>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            iou_threshold: 0.35,
            ttl_seconds: 1.0,
            dwell_threshold_seconds: 0.7,
            max_dwell_step_seconds: None,
        }
    }
}

/// Owns the tracks of one stream. Instantiate one per camera.
#[derive(Debug, Clone, Default)]
pub struct TrackManager {
    tracks: Vec<Track>,
    config: TrackerConfig,
    next_id: u64,
}

impl TrackManager {
    /// Create a new, empty manager. Track ids start at 1.
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            tracks: Vec::new(),
            config,
            next_id: 0,
        }
    }

    /// Get a reference to the tracker configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Current tracks in collection order: survivors first, then tracks
    /// spawned on the latest update.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Owned copy of the current tracks, safe to hand to another thread.
    pub fn snapshot(&self) -> Vec<Track> {
        self.tracks.clone()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Drop all tracks. Identifiers keep increasing.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Advance the tracker by one frame observed at `now` (seconds).
    ///
    /// Frames are expected in non-decreasing timestamp order; an earlier
    /// timestamp never reduces dwell but is otherwise taken at face value.
    pub fn update(&mut self, detections: Vec<FilteredDetection>, now: f64) -> &[Track] {
        // Step 1: Expire tracks unmatched for longer than the TTL
        let ttl = self.config.ttl_seconds;
        self.tracks.retain(|track| {
            let expired = track.is_expired(now, ttl);
            if expired {
                debug!(
                    track_id = track.track_id,
                    class = %track.class_name,
                    zone = %track.zone_name,
                    dwell = track.dwell,
                    "track expired"
                );
            }
            !expired
        });

        // Step 2: Greedy association, same class and zone only
        let ious = matching::gated_iou(&self.tracks, &detections);
        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = matching::greedy_assignment(&ious, self.config.iou_threshold);

        // Step 3: Update matched tracks
        for (itrack, idet) in matches {
            let track = &mut self.tracks[itrack];
            track.update(&detections[idet], now, self.config.max_dwell_step_seconds);
            trace!(
                track_id = track.track_id,
                iou = ious[[itrack, idet]],
                dwell = track.dwell,
                "track matched"
            );
        }
        for itrack in unmatched_tracks {
            self.tracks[itrack].mark_lost();
        }

        // Step 4: Spawn tracks for unmatched detections
        let mut unmatched = unmatched_detections.into_iter().peekable();
        for (idet, det) in detections.into_iter().enumerate() {
            if unmatched.next_if_eq(&idet).is_none() {
                continue;
            }
            self.next_id += 1;
            debug!(
                track_id = self.next_id,
                class = %det.class_name,
                zone = %det.zone_name,
                "track spawned"
            );
            self.tracks.push(Track::spawn(self.next_id, det, now));
        }

        &self.tracks
    }

    /// Flag tracks whose dwell reached the configured threshold and return
    /// one alert for each, stamped with `now`. Tracks that already alerted
    /// stay silent for the rest of their lifetime.
    pub fn raise_alerts(&mut self, now: f64) -> Vec<Alert> {
        alert::raise_alerts(&mut self.tracks, self.config.dwell_threshold_seconds, now)
    }
}
