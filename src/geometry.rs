//! Geometry primitives: axis-aligned boxes, IoU and polygon membership.

mod bbox;
mod polygon;

pub use bbox::{BoundingBox, iou_batch};
pub use polygon::{
    NormalizedPoint, PixelPoint, point_in_polygon, scale_polygon, validate_polygon,
};
