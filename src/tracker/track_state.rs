/// Where a track stands after the most recent update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Spawned from an unmatched detection on the latest update
    #[default]
    New,
    /// Matched to a detection on the latest update
    Tracked,
    /// Not matched on the latest update; dwell is frozen until it is
    /// matched again or its time-to-live runs out
    Lost,
}
