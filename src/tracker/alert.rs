use serde::Serialize;

use crate::geometry::BoundingBox;
use crate::tracker::track::Track;

/// Raised once per track when its dwell first reaches the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    /// Frame timestamp (seconds) on which the threshold was crossed
    pub timestamp: f64,
    pub track_id: u64,
    pub zone: String,
    pub class_name: String,
    pub dwell_seconds: f64,
    #[serde(serialize_with = "serialize_tlbr")]
    pub bbox: BoundingBox,
}

impl Alert {
    fn from_track(track: &Track, timestamp: f64) -> Self {
        Self {
            timestamp,
            track_id: track.track_id,
            zone: track.zone_name.clone(),
            class_name: track.class_name.clone(),
            dwell_seconds: track.dwell,
            bbox: track.bbox,
        }
    }
}

fn serialize_tlbr<S: serde::Serializer>(bbox: &BoundingBox, serializer: S) -> Result<S::Ok, S::Error> {
    bbox.to_tlbr().serialize(serializer)
}

/// Flag every track whose dwell reached `dwell_threshold` and has not alerted
/// yet, returning one alert per newly flagged track in collection order.
pub fn raise_alerts(tracks: &mut [Track], dwell_threshold: f64, now: f64) -> Vec<Alert> {
    tracks
        .iter_mut()
        .filter(|track| !track.alerted && track.dwell >= dwell_threshold)
        .map(|track| {
            track.alerted = true;
            Alert::from_track(track, now)
        })
        .collect()
}
