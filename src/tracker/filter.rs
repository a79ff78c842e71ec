//! Class and zone gating of raw detector output.

use std::collections::HashSet;

use tracing::warn;

use crate::tracker::detection::{Detection, FilteredDetection};
use crate::zone::{self, Zone};

/// Keeps only detections of allowed classes whose box center lies in a zone.
#[derive(Debug, Clone, Default)]
pub struct DetectionFilter {
    allowed_classes: HashSet<String>,
    min_confidence: Option<f32>,
}

impl DetectionFilter {
    /// Create a new filter accepting exactly `allowed_classes`, with no
    /// confidence gate.
    pub fn new<I, S>(allowed_classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed_classes: HashSet<String> =
            allowed_classes.into_iter().map(Into::into).collect();
        if allowed_classes.is_empty() {
            warn!("detection filter has an empty class allow-list; every detection will be dropped");
        }
        Self {
            allowed_classes,
            min_confidence: None,
        }
    }

    /// Also drop detections scoring below `min_confidence`.
    pub fn with_min_confidence(mut self, min_confidence: Option<f32>) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Get a reference to the class allow-list.
    pub fn allowed_classes(&self) -> &HashSet<String> {
        &self.allowed_classes
    }

    /// Get the confidence gate, if any.
    pub fn min_confidence(&self) -> Option<f32> {
        self.min_confidence
    }

    /// Tag each surviving detection with the zone containing its box center.
    ///
    /// Output preserves input order. Boxes that fail validation are dropped
    /// rather than tracked.
    pub fn filter(&self, detections: &[Detection], zones: &[Zone]) -> Vec<FilteredDetection> {
        detections
            .iter()
            .filter(|det| self.allowed_classes.contains(&det.class_name))
            .filter(|det| self.min_confidence.is_none_or(|min| det.confidence >= min))
            .filter(|det| match det.bbox.validate() {
                Ok(()) => true,
                Err(err) => {
                    warn!(class = %det.class_name, %err, "dropping detection with invalid box");
                    false
                }
            })
            .filter_map(|det| {
                let (cx, cy) = det.bbox.center();
                zone::classify(zones, cx, cy)
                    .map(|zone| FilteredDetection::new(det.clone(), zone.name.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PixelPoint;

    fn square_zone(name: &str, x1: i32, y1: i32, x2: i32, y2: i32) -> Zone {
        Zone {
            name: name.to_string(),
            polygon: vec![
                PixelPoint::new(x1, y1),
                PixelPoint::new(x2, y1),
                PixelPoint::new(x2, y2),
                PixelPoint::new(x1, y2),
            ],
        }
    }

    #[test]
    fn test_filter_by_class_and_zone() {
        let zones = [square_zone("Z", 0, 0, 10, 10)];
        let filter = DetectionFilter::new(["knife"]);
        let detections = vec![
            Detection::new(2.0, 2.0, 4.0, 4.0, "knife", 0.9),
            Detection::new(2.0, 2.0, 4.0, 4.0, "person", 0.99),
            Detection::new(20.0, 20.0, 24.0, 24.0, "knife", 0.99),
        ];

        let filtered = filter.filter(&detections, &zones);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].class_name, "knife");
        assert_eq!(filtered[0].zone_name, "Z");
        assert_eq!(filtered[0].bbox, detections[0].bbox);
    }

    #[test]
    fn test_center_decides_membership() {
        // Box straddles the zone edge; only its center matters.
        let zones = [square_zone("Z", 0, 0, 10, 10)];
        let filter = DetectionFilter::new(["knife"]);
        let inside = Detection::new(6.0, 6.0, 12.0, 12.0, "knife", 0.5);
        let outside = Detection::new(8.0, 8.0, 16.0, 16.0, "knife", 0.5);

        let filtered = filter.filter(&[inside, outside], &zones);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].bbox.x1, 6.0);
    }

    #[test]
    fn test_preserves_input_order_and_tags_zones() {
        let zones = [
            square_zone("left", 0, 0, 50, 50),
            square_zone("right", 50, 0, 100, 50),
        ];
        let filter = DetectionFilter::new(["knife", "scissors"]);
        let detections = vec![
            Detection::new(60.0, 10.0, 70.0, 20.0, "scissors", 0.7),
            Detection::new(10.0, 10.0, 20.0, 20.0, "knife", 0.8),
            Detection::new(80.0, 10.0, 90.0, 20.0, "knife", 0.6),
        ];

        let filtered = filter.filter(&detections, &zones);
        let tags: Vec<(&str, &str)> = filtered
            .iter()
            .map(|f| (f.class_name.as_str(), f.zone_name.as_str()))
            .collect();
        assert_eq!(
            tags,
            vec![("scissors", "right"), ("knife", "left"), ("knife", "right")]
        );
    }

    #[test]
    fn test_no_zones_drops_everything() {
        let filter = DetectionFilter::new(["knife"]);
        let detections = vec![Detection::new(2.0, 2.0, 4.0, 4.0, "knife", 1.0)];
        assert!(filter.filter(&detections, &[]).is_empty());
    }

    #[test]
    fn test_min_confidence_gate() {
        let zones = [square_zone("Z", 0, 0, 10, 10)];
        let filter = DetectionFilter::new(["knife"]).with_min_confidence(Some(0.45));
        let detections = vec![
            Detection::new(2.0, 2.0, 4.0, 4.0, "knife", 0.30),
            Detection::new(2.0, 2.0, 4.0, 4.0, "knife", 0.45),
        ];

        let filtered = filter.filter(&detections, &zones);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].confidence, 0.45);
    }

    #[test]
    fn test_invalid_box_is_dropped() {
        let zones = [square_zone("Z", 0, 0, 10, 10)];
        let filter = DetectionFilter::new(["knife"]);
        let inverted = Detection::new(6.0, 6.0, 2.0, 2.0, "knife", 0.9);
        assert!(filter.filter(&[inverted], &zones).is_empty());
    }
}
