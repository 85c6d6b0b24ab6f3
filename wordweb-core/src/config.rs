//! Engine configuration.
//!
//! Everything is optional when loaded from JSON; missing fields fall back to the
//! defaults below.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::LayoutConfig;
use crate::tree::Point;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Width and height of the square canvas the map is drawn on.
    pub map_size: f64,
    pub layout: LayoutConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            map_size: 4000.0,
            layout: LayoutConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON object. Blank input yields the defaults.
    pub fn from_json(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: EngineConfig =
            serde_json::from_str(input).map_err(|e| Error::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.map_size.is_finite() && self.map_size > 0.0) {
            return Err(Error::Config(format!(
                "map_size must be positive, got {}",
                self.map_size
            )));
        }
        if self.layout.depth_offset <= 0.0 {
            return Err(Error::Config("layout.depth_offset must be positive".to_string()));
        }
        Ok(())
    }

    /// Where the root is placed: the middle of the canvas.
    pub fn center(&self) -> Point {
        Point::new(self.map_size / 2.0, self.map_size / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_default() {
        assert_eq!(EngineConfig::from_json("").unwrap(), EngineConfig::default());
        assert_eq!(EngineConfig::from_json("  ").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_nested_override() {
        let cfg =
            EngineConfig::from_json(r#"{ "map_size": 2000, "layout": { "iterations": 80 } }"#)
                .unwrap();
        assert_eq!(cfg.map_size, 2000.0);
        assert_eq!(cfg.layout.iterations, 80);
        assert_eq!(cfg.layout.padding, 10.0);
        assert_eq!(cfg.center(), Point::new(1000.0, 1000.0));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(EngineConfig::from_json(r#"{ "map_size": -5 }"#), Err(Error::Config(_))));
        assert!(matches!(EngineConfig::from_json("{ not json"), Err(Error::Config(_))));
    }
}
