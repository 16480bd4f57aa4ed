//! # Armada Physics
//!
//! 2D ship physics for the Armada combat simulation.
//!
//! ## Features
//! - Velocity integration, per-frame drag and directional thrust
//! - Speed limiting and shortest-arc rotation
//! - Homing turn helpers for missiles
//! - Circle, point, beam and rectangle collision tests
//! - Overlap resolution, bounce response and impact severity
//! - Docking range checks

pub mod body;
pub mod collision;

use armada_core::math::Vec2;
use serde::{Deserialize, Serialize};

pub use body::{
    Body, accelerate, angle_to_target, apply_drag, apply_forward_thrust, apply_reverse_thrust,
    apply_thrust, apply_velocity, dampen, distance_squared, is_within_range, limit_speed,
    rotate_towards, stop, track_target, update_rotation,
};
pub use collision::{
    HitClass, MIN_SEPARATION, apply_collision_response, check_beam_collision,
    check_circle_collision, check_point_collision, check_rect_collision, collision_normal,
    impact_magnitude, resolve_overlap,
};

/// Physics tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Per-frame drag on the player ship
    pub player_drag: f32,
    /// Per-frame drag on enemy ships
    pub enemy_drag: f32,
    /// Per-frame drag on disabled ships
    pub disabled_drag: f32,
    /// Speed and thrust multiplier while boosting
    pub boost_multiplier: f32,
    /// Energy drained per second of boost
    pub boost_energy_cost: f32,
    /// Energy regained per second
    pub energy_regen: f32,
    /// Player turn speed in radians per second
    pub player_rotation_speed: f32,
    /// Per-tick missile speed multiplier while tracking
    pub missile_acceleration: f32,
    pub dock_range: f32,
    pub dock_speed_threshold: f32,
    pub dock_cancel_range: f32,
    pub dock_cancel_speed: f32,
    /// Bounce factor for ship-ship collisions
    pub restitution: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            player_drag: 0.992,
            enemy_drag: 0.98,
            disabled_drag: 0.95,
            boost_multiplier: 1.5,
            boost_energy_cost: 25.0,
            energy_regen: 12.0,
            player_rotation_speed: 8.0,
            missile_acceleration: 1.01,
            dock_range: 80.0,
            dock_speed_threshold: 50.0,
            dock_cancel_range: 150.0,
            dock_cancel_speed: 100.0,
            restitution: 0.8,
        }
    }
}

impl PhysicsConfig {
    /// Close enough and slow enough to dock at `station`
    pub fn can_dock(&self, body: &Body, station: Vec2) -> bool {
        body.position.distance(station) < self.dock_range && body.speed() < self.dock_speed_threshold
    }

    /// Drifted too far or moving too fast to stay docked
    pub fn should_cancel_docking(&self, body: &Body, station: Vec2) -> bool {
        body.position.distance(station) > self.dock_cancel_range
            || body.speed() > self.dock_cancel_speed
    }
}

/// Scale diagonal movement input to unit length; axis-aligned input passes
/// through unchanged
pub fn normalize_movement_input(input: Vec2) -> Vec2 {
    if input.x != 0.0 && input.y != 0.0 {
        input / input.length()
    } else {
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_config_defaults() {
        let config = PhysicsConfig::default();
        assert_eq!(config.player_drag, 0.992);
        assert_eq!(config.enemy_drag, 0.98);
        assert_eq!(config.disabled_drag, 0.95);
        // Disabled ships lose speed fastest, the player slowest
        assert!(config.disabled_drag < config.enemy_drag && config.enemy_drag < config.player_drag);
    }

    #[test]
    fn test_docking() {
        let config = PhysicsConfig::default();
        let station = Vec2::new(100.0, 100.0);

        let slow = Body::new(Vec2::new(140.0, 100.0), 0.0).with_velocity(Vec2::new(10.0, 0.0));
        assert!(config.can_dock(&slow, station));
        assert!(!config.should_cancel_docking(&slow, station));

        let fast = slow.with_velocity(Vec2::new(120.0, 0.0));
        assert!(!config.can_dock(&fast, station));
        assert!(config.should_cancel_docking(&fast, station));

        let far = Body::new(Vec2::new(400.0, 100.0), 0.0);
        assert!(config.should_cancel_docking(&far, station));
    }

    #[test]
    fn test_normalize_movement_input() {
        let diagonal = normalize_movement_input(Vec2::new(1.0, -1.0));
        assert!((diagonal.length() - 1.0).abs() < 1e-6);
        assert_eq!(normalize_movement_input(Vec2::new(0.0, 1.0)), Vec2::new(0.0, 1.0));
        assert_eq!(normalize_movement_input(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: PhysicsConfig = serde_json::from_str(r#"{"enemy_drag": 0.9}"#).unwrap();
        assert_eq!(config.enemy_drag, 0.9);
        assert_eq!(config.player_drag, 0.992);
    }
}
