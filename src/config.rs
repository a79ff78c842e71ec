//! Startup configuration: allowed classes, zones and tracker thresholds.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::geometry::NormalizedPoint;
use crate::tracker::TrackerConfig;
use crate::zone::ZoneSpec;

fn default_iou_threshold() -> f32 {
    0.35
}

fn default_ttl_seconds() -> f64 {
    1.0
}

fn default_dwell_threshold_seconds() -> f64 {
    0.7
}

/// A zone as written in the config file, vertices in `0..1` frame units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub name: String,
    pub polygon: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub allowed_classes: Vec<String>,
    pub zones: Vec<ZoneConfig>,
    #[serde(default = "default_iou_threshold")]
    pub iou_threshold: f32,
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: f64,
    #[serde(default = "default_dwell_threshold_seconds")]
    pub dwell_threshold_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_dwell_step_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f32>,
}

impl Default for MonitorConfig {
    /// Knives, scissors and bottles in the lower-left band of the frame.
    fn default() -> Self {
        Self {
            allowed_classes: vec!["knife".into(), "scissors".into(), "bottle".into()],
            zones: vec![ZoneConfig {
                name: "No-Blade Zone 1".into(),
                polygon: vec![[0.05, 0.60], [0.60, 0.60], [0.60, 0.95], [0.05, 0.95]],
            }],
            iou_threshold: default_iou_threshold(),
            ttl_seconds: default_ttl_seconds(),
            dwell_threshold_seconds: default_dwell_threshold_seconds(),
            max_dwell_step_seconds: None,
            min_confidence: None,
        }
    }
}

impl MonitorConfig {
    /// Parse and validate a JSON config. Missing thresholds take their
    /// defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config from disk, see [`MonitorConfig::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Check thresholds and zone geometry.
    ///
    /// Empty zone or class lists are accepted with a warning: the monitor
    /// runs but can never alert.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("iou_threshold", f64::from(self.iou_threshold), 0.0, 1.0, "[0, 1]")?;
        check_non_negative("ttl_seconds", self.ttl_seconds)?;
        check_non_negative("dwell_threshold_seconds", self.dwell_threshold_seconds)?;
        if let Some(step) = self.max_dwell_step_seconds {
            check_non_negative("max_dwell_step_seconds", step)?;
        }
        if let Some(conf) = self.min_confidence {
            check_range("min_confidence", f64::from(conf), 0.0, 1.0, "[0, 1]")?;
        }

        self.zone_specs()?;

        if self.zones.is_empty() {
            warn!("no zones configured; alerts can never fire");
        }
        if self.allowed_classes.is_empty() {
            warn!("no allowed classes configured; alerts can never fire");
        }
        Ok(())
    }

    /// Validated zones in declaration order.
    pub fn zone_specs(&self) -> Result<Vec<ZoneSpec>, ConfigError> {
        let mut seen = HashSet::new();
        self.zones
            .iter()
            .enumerate()
            .map(|(index, zone)| {
                if zone.name.trim().is_empty() {
                    return Err(ConfigError::EmptyZoneName { index });
                }
                if !seen.insert(zone.name.as_str()) {
                    return Err(ConfigError::DuplicateZone(zone.name.clone()));
                }
                let polygon = zone
                    .polygon
                    .iter()
                    .map(|&[x, y]| NormalizedPoint::new(x, y))
                    .collect();
                ZoneSpec::new(zone.name.clone(), polygon).map_err(|source| {
                    ConfigError::InvalidZone {
                        zone: zone.name.clone(),
                        source,
                    }
                })
            })
            .collect()
    }

    /// Tracker thresholds carried by this config.
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            iou_threshold: self.iou_threshold,
            ttl_seconds: self.ttl_seconds,
            dwell_threshold_seconds: self.dwell_threshold_seconds,
            max_dwell_step_seconds: self.max_dwell_step_seconds,
        }
    }
}

fn check_range(
    name: &'static str,
    value: f64,
    min: f64,
    max: f64,
    range: &'static str,
) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { name, value, range })
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    check_range(name, value, 0.0, f64::MAX, ">= 0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;

    #[test]
    fn test_defaults_are_valid() {
        let config = MonitorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.tracker_config(), TrackerConfig::default());
        assert_eq!(config.zone_specs().unwrap()[0].name(), "No-Blade Zone 1");
    }

    #[test]
    fn test_json_defaults_for_thresholds() {
        let config = MonitorConfig::from_json_str(
            r#"{
                "allowed_classes": ["knife"],
                "zones": [{"name": "Z", "polygon": [[0, 0], [1, 0], [1, 1], [0, 1]]}]
            }"#,
        )
        .unwrap();
        assert_eq!(config.iou_threshold, 0.35);
        assert_eq!(config.ttl_seconds, 1.0);
        assert_eq!(config.dwell_threshold_seconds, 0.7);
        assert_eq!(config.max_dwell_step_seconds, None);
        assert_eq!(config.min_confidence, None);
    }

    #[test]
    fn test_rejects_short_polygon() {
        let mut config = MonitorConfig::default();
        config.zones[0].polygon.truncate(2);
        match config.validate() {
            Err(ConfigError::InvalidZone { zone, source }) => {
                assert_eq!(zone, "No-Blade Zone 1");
                assert_eq!(source, GeometryError::TooFewPoints(2));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_zone_in_pixel_coordinates() {
        let result = MonitorConfig::from_json_str(
            r#"{
                "allowed_classes": ["knife"],
                "zones": [{"name": "Px", "polygon": [[100, 100], [300, 100], [300, 300], [100, 300]]}]
            }"#,
        );
        match result {
            Err(ConfigError::InvalidZone { zone, source }) => {
                assert_eq!(zone, "Px");
                assert_eq!(
                    source,
                    GeometryError::OutOfRange {
                        index: 0,
                        x: 100.0,
                        y: 100.0
                    }
                );
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_duplicate_and_empty_names() {
        let mut config = MonitorConfig::default();
        config.zones.push(config.zones[0].clone());
        assert!(matches!(config.validate(), Err(ConfigError::DuplicateZone(_))));

        let mut config = MonitorConfig::default();
        config.zones[0].name = "  ".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyZoneName { index: 0 })
        ));
    }

    #[test]
    fn test_rejects_bad_thresholds() {
        let config = MonitorConfig {
            iou_threshold: 1.5,
            ..MonitorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold { name: "iou_threshold", .. })
        ));

        let config = MonitorConfig {
            ttl_seconds: f64::NAN,
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = MonitorConfig {
            max_dwell_step_seconds: Some(-0.1),
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_zones_only_warn() {
        let config = MonitorConfig {
            zones: Vec::new(),
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            MonitorConfig::from_json_str("{\"zones\": 3}"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.json");
        fs::write(&path, serde_json::to_string(&MonitorConfig::default()).unwrap()).unwrap();
        assert_eq!(
            MonitorConfig::from_json_file(&path).unwrap(),
            MonitorConfig::default()
        );

        let missing = MonitorConfig::from_json_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
