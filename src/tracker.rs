mod alert;
mod detection;
mod filter;
mod matching;
mod track;
mod track_manager;
mod track_state;

pub use alert::{Alert, raise_alerts};
pub use detection::{Detection, FilteredDetection};
pub use filter::DetectionFilter;
pub use matching::{AssignmentResult, gated_iou, greedy_assignment};
pub use track::Track;
pub use track_manager::{TrackManager, TrackerConfig};
pub use track_state::TrackState;
