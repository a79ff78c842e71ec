//! Forbidden zones: configured polygons and their per-resolution pixel cache.

mod registry;

pub use registry::{Zone, ZoneRegistry, ZoneSpec, classify};
