//! Error types for configuration, ingestion and alert persistence.
//!
//! The per-frame path (filtering, association, alerting) is total and never
//! produces these; they are raised when inputs cross into the crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Malformed geometry rejected at configuration or ingestion time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("bounding box is inverted: ({x1}, {y1}, {x2}, {y2})")]
    InvertedBox { x1: f32, y1: f32, x2: f32, y2: f32 },

    #[error("bounding box has a non-finite coordinate")]
    NonFiniteBox,

    #[error("polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    #[error("polygon vertex {index} is not finite")]
    NonFiniteVertex { index: usize },

    #[error("polygon vertex {index} ({x}, {y}) lies outside the normalized 0..1 range")]
    OutOfRange { index: usize, x: f64, y: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be finite and within {range}, got {value}")]
    InvalidThreshold {
        name: &'static str,
        value: f64,
        range: &'static str,
    },

    #[error("zone name must not be empty (zone #{index})")]
    EmptyZoneName { index: usize },

    #[error("duplicate zone name `{0}`")]
    DuplicateZone(String),

    #[error("zone `{zone}`: {source}")]
    InvalidZone {
        zone: String,
        #[source]
        source: GeometryError,
    },

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("alert log I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("alert log CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read replay input: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: malformed frame record: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: detection #{index}: {source}")]
    InvalidDetection {
        line: usize,
        index: usize,
        #[source]
        source: GeometryError,
    },
}
