use crate::geometry::BoundingBox;

/// One object reported by the detector for a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Bounding box in TLBR format (x1, y1, x2, y2)
    pub bbox: BoundingBox,
    /// Detector class label, e.g. `"knife"`
    pub class_name: String,
    /// Detection confidence score
    pub confidence: f32,
}

impl Detection {
    pub fn new(
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        class_name: impl Into<String>,
        confidence: f32,
    ) -> Self {
        Self::from_bbox(BoundingBox::new(x1, y1, x2, y2), class_name, confidence)
    }

    pub fn from_bbox(bbox: BoundingBox, class_name: impl Into<String>, confidence: f32) -> Self {
        Self {
            bbox,
            class_name: class_name.into(),
            confidence,
        }
    }
}

/// A detection that passed the class allow-list and landed inside a zone.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredDetection {
    pub bbox: BoundingBox,
    pub class_name: String,
    pub confidence: f32,
    /// Name of the first declared zone containing the box center
    pub zone_name: String,
}

impl FilteredDetection {
    pub fn new(detection: Detection, zone_name: impl Into<String>) -> Self {
        Self {
            bbox: detection.bbox,
            class_name: detection.class_name,
            confidence: detection.confidence,
            zone_name: zone_name.into(),
        }
    }
}
