//! Polygon membership and normalized-to-pixel scaling.

use nalgebra::Point2;

use crate::error::GeometryError;

/// Polygon vertex in normalized `0..1` frame coordinates.
pub type NormalizedPoint = Point2<f64>;

/// Polygon vertex in integer pixel coordinates.
pub type PixelPoint = Point2<i32>;

/// Ray-casting parity test.
///
/// The polygon is a closed loop: the last vertex connects back to the first.
/// Points exactly on an edge fall on whichever side the parity test puts them.
pub fn point_in_polygon(x: f32, y: f32, polygon: &[PixelPoint]) -> bool {
    let (x, y) = (f64::from(x), f64::from(y));
    let n = polygon.len();
    let mut inside = false;

    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let (x1, y1) = (f64::from(a.x), f64::from(a.y));
        let (x2, y2) = (f64::from(b.x), f64::from(b.y));

        // The straddle check guarantees y1 != y2 below.
        if (y1 > y) != (y2 > y) && x < (x2 - x1) * (y - y1) / (y2 - y1) + x1 {
            inside = !inside;
        }
    }
    inside
}

/// Multiply each normalized vertex by the frame size and truncate to pixels.
pub fn scale_polygon(normalized: &[NormalizedPoint], width: u32, height: u32) -> Vec<PixelPoint> {
    let (w, h) = (f64::from(width), f64::from(height));
    normalized
        .iter()
        .map(|p| PixelPoint::new((p.x * w) as i32, (p.y * h) as i32))
        .collect()
}

/// Reject polygons that cannot enclose an area, or whose vertices are not
/// finite normalized coordinates in `0..=1`.
pub fn validate_polygon(points: &[NormalizedPoint]) -> Result<(), GeometryError> {
    if points.len() < 3 {
        return Err(GeometryError::TooFewPoints(points.len()));
    }
    if let Some(index) = points
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite()))
    {
        return Err(GeometryError::NonFiniteVertex { index });
    }
    let unit = 0.0..=1.0;
    if let Some((index, p)) = points
        .iter()
        .enumerate()
        .find(|(_, p)| !(unit.contains(&p.x) && unit.contains(&p.y)))
    {
        return Err(GeometryError::OutOfRange {
            index,
            x: p.x,
            y: p.y,
        });
    }
    Ok(())
}
