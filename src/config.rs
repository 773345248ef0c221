//! Navigation configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};

/// Transport mode passed to the route service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    #[default]
    Automobile,
    Walking,
}

/// Which geofence entries may advance the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancePolicy {
    /// Only the region of the step right after the current one.
    #[default]
    NextOnly,
    /// Any later step, for when a region was passed without a fix inside it.
    ///
    /// Relaxes the next-region-only rule: the index still never moves
    /// backwards, but intermediate steps may be skipped.
    AllowSkip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Radius of step regions and step circles in meters (default: 20)
    pub geofence_radius_m: f64,
    /// Prefix of region identifiers; the step index follows it (default: "")
    pub region_id_prefix: String,
    /// Width of the place-search box in degrees (default: 0.1)
    pub search_span_deg: f64,
    pub transport: TransportMode,
    pub advance: AdvancePolicy,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            geofence_radius_m: 20.0,
            region_id_prefix: String::new(),
            search_span_deg: 0.1,
            transport: TransportMode::default(),
            advance: AdvancePolicy::default(),
        }
    }
}

impl NavConfig {
    /// Parse a JSON configuration and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: NavConfig = serde_json::from_str(json)
            .map_err(|e| NavError::Config(format!("invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.geofence_radius_m <= 0.0 {
            return Err(NavError::Config(format!(
                "geofence_radius_m must be positive, got {}",
                self.geofence_radius_m
            )));
        }
        if self.search_span_deg <= 0.0 {
            return Err(NavError::Config(format!(
                "search_span_deg must be positive, got {}",
                self.search_span_deg
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = NavConfig::from_json("{}").unwrap();
        assert_eq!(config, NavConfig::default());
        assert_eq!(config.geofence_radius_m, 20.0);
        assert_eq!(config.transport, TransportMode::Automobile);
        assert_eq!(config.advance, AdvancePolicy::NextOnly);
    }

    #[test]
    fn overrides_are_applied() {
        let json = r#"{"geofence_radius_m": 40, "region_id_prefix": "s", "advance": "allow_skip", "transport": "walking"}"#;
        let config = NavConfig::from_json(json).unwrap();
        assert_eq!(config.geofence_radius_m, 40.0);
        assert_eq!(config.region_id_prefix, "s");
        assert_eq!(config.advance, AdvancePolicy::AllowSkip);
        assert_eq!(config.transport, TransportMode::Walking);
        assert_eq!(config.search_span_deg, 0.1);
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        let result = NavConfig::from_json(r#"{"geofence_radius_m": 0}"#);
        assert!(matches!(result, Err(NavError::Config(_))));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(NavConfig::from_json("not json"), Err(NavError::Config(_))));
    }
}
