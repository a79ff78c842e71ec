use tracing::{debug, warn};

use crate::error::GeometryError;
use crate::geometry::{self, NormalizedPoint, PixelPoint};

/// A configured zone in normalized `0..1` coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSpec {
    name: String,
    polygon: Vec<NormalizedPoint>,
}

impl ZoneSpec {
    /// Create a zone, rejecting polygons with fewer than 3 vertices or any
    /// vertex outside the finite `0..=1` square.
    pub fn new(
        name: impl Into<String>,
        polygon: Vec<NormalizedPoint>,
    ) -> Result<Self, GeometryError> {
        geometry::validate_polygon(&polygon)?;
        Ok(Self {
            name: name.into(),
            polygon,
        })
    }

    /// Get the zone name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a reference to the normalized vertices, in declaration order.
    pub fn polygon(&self) -> &[NormalizedPoint] {
        &self.polygon
    }

    /// Scale into pixel space for a frame of the given size.
    pub fn to_pixels(&self, width: u32, height: u32) -> Zone {
        Zone {
            name: self.name.clone(),
            polygon: geometry::scale_polygon(&self.polygon, width, height),
        }
    }
}

/// A zone resolved into pixel space for one frame resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub name: String,
    pub polygon: Vec<PixelPoint>,
}

impl Zone {
    /// Ray-casting membership test in pixel space.
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        geometry::point_in_polygon(x, y, &self.polygon)
    }

    /// Where a renderer should place the zone's name: left edge of the
    /// polygon, just above its top, kept inside the frame.
    pub fn label_anchor(&self) -> (i32, i32) {
        let x = self.polygon.iter().map(|p| p.x).min().unwrap_or(0);
        let y = self
            .polygon
            .iter()
            .map(|p| p.y)
            .min()
            .unwrap_or(0)
            .saturating_sub(8);
        (x, y.max(15))
    }
}

/// Return the first zone, in declaration order, that contains the point.
///
/// Overlapping zones resolve to the earliest declared one.
pub fn classify(zones: &[Zone], x: f32, y: f32) -> Option<&Zone> {
    zones.iter().find(|zone| zone.contains(x, y))
}

/// Holds the configured zones and their pixel-space polygons for the most
/// recently seen frame size.
#[derive(Debug, Clone)]
pub struct ZoneRegistry {
    specs: Vec<ZoneSpec>,
    resolution: Option<(u32, u32)>,
    resolved: Vec<Zone>,
}

impl ZoneRegistry {
    /// Create a new registry. Nothing is resolved until the first
    /// [`resolve`](Self::resolve).
    pub fn new(specs: Vec<ZoneSpec>) -> Self {
        if specs.is_empty() {
            warn!("zone registry has no zones; no detection can ever raise an alert");
        }
        Self {
            specs,
            resolution: None,
            resolved: Vec::new(),
        }
    }

    /// Get a reference to the configured zones.
    pub fn specs(&self) -> &[ZoneSpec] {
        &self.specs
    }

    /// Whether no zones are configured.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Pixel-space zones for a `width` x `height` frame.
    ///
    /// Polygons are rescaled only when the frame size differs from the
    /// previous call.
    pub fn resolve(&mut self, width: u32, height: u32) -> &[Zone] {
        if self.resolution != Some((width, height)) {
            debug!(
                width,
                height,
                zones = self.specs.len(),
                "rescaling zone polygons"
            );
            self.resolved = self
                .specs
                .iter()
                .map(|spec| spec.to_pixels(width, height))
                .collect();
            self.resolution = Some((width, height));
        }
        &self.resolved
    }

    /// Frame size the cached polygons were computed for, if any.
    pub fn resolution(&self) -> Option<(u32, u32)> {
        self.resolution
    }

    /// Name of the first zone containing the point, using the polygons from
    /// the last [`resolve`](Self::resolve). Returns `None` before any resolve.
    pub fn classify(&self, x: f32, y: f32) -> Option<&str> {
        classify(&self.resolved, x, y).map(|zone| zone.name.as_str())
    }
}
