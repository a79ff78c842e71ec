//! Matching utilities for track/detection association.

use ndarray::Array2;

use crate::geometry::BoundingBox;
use crate::tracker::detection::FilteredDetection;
use crate::tracker::track::Track;

/// Score for a track/detection pair whose class or zone differ. Lower than
/// any real IoU so such a pair can never be selected.
const KEY_MISMATCH: f32 = -1.0;

/// IoU matrix of shape (tracks, detections), with pairs whose class or zone
/// differ masked out.
pub fn gated_iou(tracks: &[Track], detections: &[FilteredDetection]) -> Array2<f32> {
    let track_boxes: Vec<BoundingBox> = tracks.iter().map(|t| t.bbox).collect();
    let det_boxes: Vec<BoundingBox> = detections.iter().map(|d| d.bbox).collect();
    let mut ious = crate::geometry::iou_batch(&track_boxes, &det_boxes);

    for (i, track) in tracks.iter().enumerate() {
        for (j, det) in detections.iter().enumerate() {
            if !track.same_key(det) {
                ious[[i, j]] = KEY_MISMATCH;
            }
        }
    }
    ious
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Greedy per-row assignment over an IoU matrix.
///
/// Rows are visited in order; each takes the unused column with the highest
/// strictly positive IoU, the earliest column winning ties. The pair is kept
/// only if that IoU reaches `thresh`, otherwise the column stays available
/// for later rows. This is not a globally optimal assignment.
pub fn greedy_assignment(ious: &Array2<f32>, thresh: f32) -> AssignmentResult {
    let (num_rows, num_cols) = ious.dim();
    let mut used = vec![false; num_cols];
    let mut matches = Vec::new();
    let mut unmatched_tracks = Vec::new();

    for row in 0..num_rows {
        let mut best: Option<usize> = None;
        let mut best_iou = 0.0_f32;
        for col in 0..num_cols {
            if used[col] {
                continue;
            }
            let iou = ious[[row, col]];
            if iou > best_iou {
                best_iou = iou;
                best = Some(col);
            }
        }

        match best {
            Some(col) if best_iou >= thresh => {
                used[col] = true;
                matches.push((row, col));
            }
            _ => unmatched_tracks.push(row),
        }
    }

    let unmatched_detections = used
        .iter()
        .enumerate()
        .filter_map(|(j, &u)| if u { None } else { Some(j) })
        .collect();

    AssignmentResult {
        matches,
        unmatched_tracks,
        unmatched_detections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_empty_inputs() {
        let no_tracks = Array2::<f32>::zeros((0, 3));
        let result = greedy_assignment(&no_tracks, 0.35);
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_detections, vec![0, 1, 2]);

        let no_dets = Array2::<f32>::zeros((2, 0));
        let result = greedy_assignment(&no_dets, 0.35);
        assert_eq!(result.unmatched_tracks, vec![0, 1]);
        assert!(result.unmatched_detections.is_empty());
    }

    #[test]
    fn test_below_threshold_is_unmatched() {
        let ious = array![[0.2_f32]];
        let result = greedy_assignment(&ious, 0.35);
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_tracks, vec![0]);
        assert_eq!(result.unmatched_detections, vec![0]);
    }

    #[test]
    fn test_greedy_is_order_dependent() {
        // Track 0 grabs detection 0 even though an optimal assignment would
        // give it detection 1 and leave detection 0 for track 1.
        let ious = array![[0.9_f32, 0.8], [0.85, 0.0]];
        let result = greedy_assignment(&ious, 0.35);
        assert_eq!(result.matches, vec![(0, 0)]);
        assert_eq!(result.unmatched_tracks, vec![1]);
        assert_eq!(result.unmatched_detections, vec![1]);
    }

    #[test]
    fn test_ties_go_to_first_column() {
        let ious = array![[0.5_f32, 0.5]];
        let result = greedy_assignment(&ious, 0.35);
        assert_eq!(result.matches, vec![(0, 0)]);
    }

    #[test]
    fn test_rejected_column_stays_available() {
        // Row 0's best is below threshold, so row 1 may still take column 0.
        let ious = array![[0.3_f32], [0.6]];
        let result = greedy_assignment(&ious, 0.35);
        assert_eq!(result.matches, vec![(1, 0)]);
        assert_eq!(result.unmatched_tracks, vec![0]);
    }

    #[test]
    fn test_zero_threshold_still_needs_overlap() {
        let ious = array![[0.0_f32]];
        let result = greedy_assignment(&ious, 0.0);
        assert!(result.matches.is_empty());
    }

    #[test]
    fn test_masked_pairs_never_match() {
        let ious = array![[KEY_MISMATCH, 0.4]];
        let result = greedy_assignment(&ious, 0.0);
        assert_eq!(result.matches, vec![(0, 1)]);
    }
}
