//! Tunable limits for the canvas engine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geometry::{Size2D, Vector2D};
use crate::state::Background;
use crate::{CanvasError, CanvasResult};

/// Canvas engine configuration.
///
/// Every field has a default, so a config file only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Logical canvas size, independent of the device screen.
    pub canvas_size: Size2D,
    /// Smallest scale an object can be shrunk to.
    pub object_scale_floor: f64,
    /// Smallest scale a fit-to-viewport may choose.
    pub fit_scale_floor: f64,
    /// Initial lower bound of the viewport zoom.
    pub minimum_scale: f64,
    /// Upper bound of the viewport zoom.
    pub maximum_scale: f64,
    /// Canvas-space offset applied to duplicated objects.
    pub duplicate_offset: Vector2D,
    /// Forwarded to every feedback request.
    pub reduce_motion: bool,
    /// Initial background.
    pub background: Background,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            canvas_size: Size2D::new(1024.0, 768.0),
            object_scale_floor: 0.1,
            fit_scale_floor: 0.1,
            minimum_scale: 0.5,
            maximum_scale: 5.0,
            duplicate_offset: Vector2D::new(20.0, 20.0),
            reduce_motion: false,
            background: Background::default(),
        }
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values are invalid.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn from_file(path: impl AsRef<Path>) -> CanvasResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check that all limits are finite, positive and consistent.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> CanvasResult<()> {
        let positive = [
            ("canvas_size.width", self.canvas_size.width),
            ("canvas_size.height", self.canvas_size.height),
            ("object_scale_floor", self.object_scale_floor),
            ("fit_scale_floor", self.fit_scale_floor),
            ("minimum_scale", self.minimum_scale),
            ("maximum_scale", self.maximum_scale),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CanvasError::InvalidConfig(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        if !self.duplicate_offset.is_finite() {
            return Err(CanvasError::InvalidConfig(
                "duplicate_offset must be finite".to_string(),
            ));
        }
        if self.minimum_scale > self.maximum_scale {
            return Err(CanvasError::InvalidConfig(format!(
                "minimum_scale ({}) exceeds maximum_scale ({})",
                self.minimum_scale, self.maximum_scale
            )));
        }
        if self.fit_scale_floor > self.maximum_scale {
            return Err(CanvasError::InvalidConfig(format!(
                "fit_scale_floor ({}) exceeds maximum_scale ({})",
                self.fit_scale_floor, self.maximum_scale
            )));
        }
        Ok(())
    }
}
