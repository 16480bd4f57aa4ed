//! Combat configuration

use std::path::Path;

use armada_core::LoopConfig;
use armada_physics::PhysicsConfig;
use serde::{Deserialize, Serialize};

use crate::ai::DEFAULT_FIRE_RANGE;
use crate::damage::DamageConfig;
use crate::loadout::BaseStats;
use crate::targeting::DEFAULT_TARGETING_RANGE;
use crate::CombatResult;

/// Everything tunable in the combat simulation. Missing JSON fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    #[serde(rename = "loop")]
    pub loop_config: LoopConfig,
    pub physics: PhysicsConfig,
    pub damage: DamageConfig,
    pub player: BaseStats,
    #[serde(flatten)]
    pub ranges: RangeConfig,
}

/// Engagement distances and collision damage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Enemies only shoot at targets closer than this
    pub enemy_fire_range: f32,
    /// Lock-on and turret range
    pub targeting_range: f32,
    /// Mass damage per unit of ramming impact
    pub ram_damage_scale: f32,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            enemy_fire_range: DEFAULT_FIRE_RANGE,
            targeting_range: DEFAULT_TARGETING_RANGE,
            ram_damage_scale: 0.05,
        }
    }
}

impl CombatConfig {
    /// Parse from a JSON string and validate the loop settings
    pub fn from_json_str(json: &str) -> CombatResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.loop_config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> CombatResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> CombatResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CombatError;

    #[test]
    fn test_defaults() {
        let config = CombatConfig::default();
        assert_eq!(config.ranges.enemy_fire_range, 500.0);
        assert_eq!(config.ranges.targeting_range, 800.0);
        assert_eq!(config.damage.bleed_through, 0.5);
        assert_eq!(config.damage.default_disable_threshold, 0.33);
        assert_eq!(config.physics.player_drag, 0.992);
    }

    #[test]
    fn test_partial_json() {
        let config = CombatConfig::from_json_str(
            r#"{
                "loop": { "use_fixed_timestep": true },
                "damage": { "bleed_through": 0.25 },
                "enemy_fire_range": 650.0
            }"#,
        )
        .unwrap();
        assert!(config.loop_config.use_fixed_timestep);
        assert_eq!(config.loop_config.max_updates_per_frame, 5);
        assert_eq!(config.damage.bleed_through, 0.25);
        assert_eq!(config.damage.default_disable_threshold, 0.33);
        assert_eq!(config.ranges.enemy_fire_range, 650.0);
        assert_eq!(config.ranges.targeting_range, 800.0);
    }

    #[test]
    fn test_round_trip() {
        let config = CombatConfig::default();
        let json = config.to_json_pretty().unwrap();
        assert_eq!(CombatConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(CombatConfig::from_json_str("{ nope"), Err(CombatError::Parse(_))));
        assert!(matches!(
            CombatConfig::from_json_str(r#"{ "loop": { "fixed_timestep": -1.0 } }"#),
            Err(CombatError::Loop(_))
        ));
        assert!(matches!(
            CombatConfig::from_json_file("/nonexistent/armada.json"),
            Err(CombatError::Io(_))
        ));
    }
}
