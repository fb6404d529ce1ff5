//! Engine configuration.
//!
//! Every section defaults to the standard engine constants, so a JSON file
//! only needs the values it overrides:
//!
//! ```json
//! { "router": { "standOff": 30 }, "render": { "hopRadius": 4 } }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::WireCheckError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrcConfig {
    /// Largest voltage difference still considered a match
    pub voltage_tolerance: f64,
}

impl Default for DrcConfig {
    fn default() -> Self {
        Self {
            voltage_tolerance: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouterOptions {
    /// Length of the leg a wire travels along the port normal before turning
    pub stand_off: f64,
    /// Keep-out margin added around every obstacle
    pub clearance: f64,
    /// Extra cost per bend, in canvas units
    pub bend_penalty: f64,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            stand_off: 20.0,
            clearance: 10.0,
            bend_penalty: 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Upper bound for corner arcs
    pub corner_radius: f64,
    /// Radius of the semicircle drawn over a crossing wire
    pub hop_radius: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            corner_radius: 8.0,
            hop_radius: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatcherConfig {
    pub label_confidence: u8,
    pub power_confidence: u8,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            label_confidence: 85,
            power_confidence: 90,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub drc: DrcConfig,
    pub router: RouterOptions,
    pub render: RenderOptions,
    pub matcher: MatcherConfig,
}

impl EngineConfig {
    pub fn from_json_str(content: &str) -> Result<Self, WireCheckError> {
        let config: EngineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, WireCheckError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        tracing::debug!("Loaded engine config from {:?}", path);
        Ok(config)
    }

    fn validate(&self) -> Result<(), WireCheckError> {
        let lengths = [
            ("drc.voltageTolerance", self.drc.voltage_tolerance),
            ("router.standOff", self.router.stand_off),
            ("router.clearance", self.router.clearance),
            ("router.bendPenalty", self.router.bend_penalty),
            ("render.cornerRadius", self.render.corner_radius),
            ("render.hopRadius", self.render.hop_radius),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(WireCheckError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        for (name, value) in [
            ("matcher.labelConfidence", self.matcher.label_confidence),
            ("matcher.powerConfidence", self.matcher.power_confidence),
        ] {
            if value > 100 {
                return Err(WireCheckError::InvalidConfig(format!(
                    "{} must be within 0..=100, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}
