use ndarray::Array2;

use crate::error::GeometryError;

/// Guards the IoU denominator against a zero union.
const IOU_EPSILON: f32 = 1e-9;

/// Axis-aligned bounding box in pixel space.
///
/// Stored as TLBR (top-left x, top-left y, bottom-right x, bottom-right y),
/// which is the layout detectors hand out. Use [`BoundingBox::try_new`] at
/// ingestion boundaries; [`BoundingBox::new`] does not check ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    /// Create a box from TLBR coordinates without validation.
    #[inline]
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a box from TLBR coordinates, rejecting inverted or non-finite input.
    pub fn try_new(x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Self, GeometryError> {
        let bbox = Self::new(x1, y1, x2, y2);
        bbox.validate()?;
        Ok(bbox)
    }

    /// Create a box from TLWH format (top-left x, top-left y, width, height).
    #[inline]
    pub fn from_tlwh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Create a box from its center point and dimensions.
    #[inline]
    pub fn from_xywh(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(
            cx - width / 2.0,
            cy - height / 2.0,
            cx + width / 2.0,
            cy + height / 2.0,
        )
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [f32; 4] {
        [self.x1, self.y1, self.width(), self.height()]
    }

    /// TLBR truncated to whole pixels, as written to alert logs.
    #[inline]
    pub fn to_pixels(&self) -> [i32; 4] {
        [
            self.x1 as i32,
            self.y1 as i32,
            self.x2 as i32,
            self.y2 as i32,
        ]
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        if !self.to_tlbr().iter().all(|v| v.is_finite()) {
            return Err(GeometryError::NonFiniteBox);
        }
        if self.x1 > self.x2 || self.y1 > self.y2 {
            return Err(GeometryError::InvertedBox {
                x1: self.x1,
                y1: self.y1,
                x2: self.x2,
                y2: self.y2,
            });
        }
        Ok(())
    }

    /// Calculate Intersection over Union (IoU) with another bounding box.
    ///
    /// Returns exactly `0.0` when the boxes do not overlap. The result is
    /// symmetric and lies in `[0, 1]` for valid boxes.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        let inter_width = (x2 - x1).max(0.0);
        let inter_height = (y2 - y1).max(0.0);
        let inter_area = inter_width * inter_height;
        if inter_area == 0.0 {
            return 0.0;
        }

        let union_area = self.area() + other.area() - inter_area;
        inter_area / (union_area + IOU_EPSILON)
    }
}

/// Calculate the IoU matrix between two sets of bounding boxes.
///
/// Returns a matrix of shape (M, N) where M is the length of `boxes_a`
/// and N is the length of `boxes_b`.
pub fn iou_batch(boxes_a: &[BoundingBox], boxes_b: &[BoundingBox]) -> Array2<f32> {
    let mut ious = Array2::zeros((boxes_a.len(), boxes_b.len()));
    for (i, a) in boxes_a.iter().enumerate() {
        for (j, b) in boxes_b.iter().enumerate() {
            ious[[i, j]] = a.iou(b);
        }
    }
    ious
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_conversions() {
        let bbox = BoundingBox::from_tlwh(10.0, 20.0, 30.0, 40.0);
        assert_eq!(bbox.to_tlbr(), [10.0, 20.0, 40.0, 60.0]);
        assert_eq!(bbox.to_tlwh(), [10.0, 20.0, 30.0, 40.0]);
        assert_eq!(bbox.center(), (25.0, 40.0));

        let centered = BoundingBox::from_xywh(25.0, 40.0, 30.0, 40.0);
        assert_eq!(centered, bbox);
    }

    #[test]
    fn test_to_pixels_truncates() {
        let bbox = BoundingBox::new(1.9, 2.2, 10.7, 20.5);
        assert_eq!(bbox.to_pixels(), [1, 2, 10, 20]);
    }

    #[test]
    fn test_try_new_rejects_inverted() {
        assert_eq!(
            BoundingBox::try_new(5.0, 0.0, 1.0, 4.0),
            Err(GeometryError::InvertedBox {
                x1: 5.0,
                y1: 0.0,
                x2: 1.0,
                y2: 4.0
            })
        );
        assert_eq!(
            BoundingBox::try_new(0.0, f32::NAN, 1.0, 4.0),
            Err(GeometryError::NonFiniteBox)
        );
        assert!(BoundingBox::try_new(0.0, 0.0, 0.0, 0.0).is_ok());
    }

    #[test]
    fn test_iou() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 5.0, 15.0, 15.0);

        // Intersection: 5x5 = 25
        // Union: 100 + 100 - 25 = 175
        let iou = a.iou(&b);
        assert!((iou - 25.0 / 175.0).abs() < 1e-6);
        assert_eq!(iou, b.iou(&a));
    }

    #[test]
    fn test_iou_no_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.iou(&b), 0.0);

        // Touching edges share no area.
        let c = BoundingBox::new(10.0, 0.0, 20.0, 10.0);
        assert_eq!(a.iou(&c), 0.0);
    }

    #[test]
    fn test_iou_same_box() {
        let a = BoundingBox::new(2.0, 2.0, 4.0, 4.0);
        assert!((a.iou(&a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_degenerate_box() {
        let point = BoundingBox::new(3.0, 3.0, 3.0, 3.0);
        assert_eq!(point.iou(&point), 0.0);
    }

    #[test]
    fn test_iou_batch_shape() {
        let a = [
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            BoundingBox::new(50.0, 50.0, 60.0, 60.0),
        ];
        let b = [BoundingBox::new(0.0, 0.0, 10.0, 10.0)];
        let ious = iou_batch(&a, &b);
        assert_eq!(ious.dim(), (2, 1));
        assert!((ious[[0, 0]] - 1.0).abs() < 1e-6);
        assert_eq!(ious[[1, 0]], 0.0);
    }
}
