//! Tunable interaction parameters.

use crate::hit_test::{DEFAULT_HANDLE_RADIUS, DEFAULT_HIT_TOLERANCE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Interaction tunables, in percentage units unless noted.
///
/// Missing fields in a JSON config fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    /// Extra distance around elements that still counts as a hit.
    pub hit_tolerance: f64,
    /// Radius of image corner handles.
    pub handle_radius: f64,
    /// Smooth pen strokes with a [`LineStabilizer`](crate::stabilizer::LineStabilizer).
    pub stabilize: bool,
    /// Minimum point spacing for pen strokes when not stabilizing.
    pub raw_min_distance: f64,
    /// Net movement below which a drag or resize is not recorded for undo.
    pub move_epsilon: f64,
    /// Smallest width or height a resize can produce.
    pub min_resize: f64,
    /// Offset applied to both axes when duplicating.
    pub duplicate_offset: f64,
    /// Edge length of newly placed stickers.
    pub sticker_size: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            hit_tolerance: DEFAULT_HIT_TOLERANCE,
            handle_radius: DEFAULT_HANDLE_RADIUS,
            stabilize: true,
            raw_min_distance: 0.3,
            move_epsilon: 0.5,
            min_resize: 5.0,
            duplicate_offset: 2.0,
            sticker_size: 10.0,
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject negative or non-finite tunables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("hitTolerance", self.hit_tolerance),
            ("handleRadius", self.handle_radius),
            ("rawMinDistance", self.raw_min_distance),
            ("moveEpsilon", self.move_epsilon),
            ("minResize", self.min_resize),
            ("duplicateOffset", self.duplicate_offset),
            ("stickerSize", self.sticker_size),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = CanvasConfig::from_json(r#"{"hitTolerance": 2.5, "stabilize": false}"#).unwrap();
        assert!((config.hit_tolerance - 2.5).abs() < f64::EPSILON);
        assert!(!config.stabilize);
        assert!((config.min_resize - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_negative_values() {
        let err = CanvasConfig::from_json(r#"{"minResize": -1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "minResize", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            CanvasConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
