// Data-driven planner configuration.
//
// Every tunable the engine reads lives in `PlannerConfig`: the snap tolerance,
// the stock→placement jitter band, the viewport strip geometry that decides
// when a drop returns a block to stock, and the fixed saturation/lightness of
// the block palette. Logic never hard-codes these; it reads the config owned
// by `PlannerSession`.
//
// The config loads from JSON. Missing fields fall back to the defaults below,
// so a config file only needs to list what it overrides.
//
// See also: `session.rs` which owns the config, `placement.rs` for the
// snapping and drop rules that consume it, `color.rs` for the palette.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Maximum distance (foundation units) at which a block edge is pulled
    /// onto a foundation edge or another placed block's edge.
    pub snap_tolerance: f64,

    /// A block leaving stock lands at the foundation center offset by an
    /// integer drawn uniformly from `[-jitter_radius, jitter_radius]` on each
    /// axis, so repeated placements don't stack exactly.
    pub jitter_radius: u32,

    /// Height in pixels of the stock strip beneath the editing viewport.
    pub inventory_height: f64,

    /// Extra pixels below the editing viewport's bottom edge before a drop
    /// counts as "return to stock".
    pub stock_drop_margin: f64,

    /// Palette saturation, percent.
    pub color_saturation: u8,

    /// Palette lightness, percent.
    pub color_lightness: u8,

    /// Foundation `(length, width)` offered when the front end doesn't ask
    /// for one. `None` means the foundation must be supplied explicitly.
    pub default_foundation: Option<(f64, f64)>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            snap_tolerance: 8.0,
            jitter_radius: 10,
            inventory_height: 180.0,
            stock_drop_margin: 80.0,
            color_saturation: 60,
            color_lightness: 70,
            default_foundation: Some((2130.0, 660.0)),
        }
    }
}

impl PlannerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_editor_constants() {
        let config = PlannerConfig::default();
        assert_eq!(config.snap_tolerance, 8.0);
        assert_eq!(config.jitter_radius, 10);
        assert_eq!(config.inventory_height, 180.0);
        assert_eq!(config.stock_drop_margin, 80.0);
        assert_eq!(config.default_foundation, Some((2130.0, 660.0)));
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = PlannerConfig::from_json(r#"{"snap_tolerance": 12.5}"#).unwrap();
        assert_eq!(config.snap_tolerance, 12.5);
        assert_eq!(config.jitter_radius, 10);
        assert_eq!(config.color_lightness, 70);
    }

    #[test]
    fn explicit_null_foundation_disables_the_preset() {
        let config = PlannerConfig::from_json(r#"{"default_foundation": null}"#).unwrap();
        assert_eq!(config.default_foundation, None);
    }

    #[test]
    fn json_roundtrip() {
        let mut config = PlannerConfig::default();
        config.jitter_radius = 3;
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(PlannerConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn wrong_types_are_rejected() {
        let err = PlannerConfig::from_json(r#"{"jitter_radius": "wide"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.json");
        std::fs::write(&path, r#"{"stock_drop_margin": 40}"#).unwrap();
        let config = PlannerConfig::load(&path).unwrap();
        assert_eq!(config.stock_drop_margin, 40.0);
        assert!(matches!(
            PlannerConfig::load(&dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
