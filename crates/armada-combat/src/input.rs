//! Abstract per-frame input from the host

use armada_core::math::Vec2;
use armada_physics::normalize_movement_input;

use crate::targeting::TargetCommand;
use crate::weapons::WeaponSlot;

/// Player intent for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    /// Movement direction, unit length or zero
    pub movement: Vec2,
    pub moving: bool,
    pub boost: bool,
    pub primary_fire: bool,
    pub missile_fire: bool,
    /// World-space aim point
    pub aim: Vec2,
    /// One-shot weapon switch, consumed by the next gameplay tick
    pub select_weapon: Option<WeaponSlot>,
    /// One-shot targeting command, consumed by the next gameplay tick
    pub target_command: Option<TargetCommand>,
}

impl InputState {
    /// Set movement from raw axes in `[-1, 1]`; diagonals are normalized
    pub fn set_movement_axes(&mut self, x: f32, y: f32) {
        self.movement = normalize_movement_input(Vec2::new(x, y));
        self.moving = x != 0.0 || y != 0.0;
    }

    /// Release every held control
    pub fn release(&mut self) {
        *self = Self {
            aim: self.aim,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_axes() {
        let mut input = InputState::default();
        input.set_movement_axes(1.0, 1.0);
        assert!(input.moving);
        assert!((input.movement.length() - 1.0).abs() < 1e-6);

        input.set_movement_axes(0.0, 0.0);
        assert!(!input.moving);
        assert_eq!(input.movement, Vec2::ZERO);
    }

    #[test]
    fn test_release_keeps_aim() {
        let mut input = InputState {
            aim: Vec2::new(5.0, 5.0),
            primary_fire: true,
            boost: true,
            ..InputState::default()
        };
        input.release();
        assert!(!input.primary_fire && !input.boost);
        assert_eq!(input.aim, Vec2::new(5.0, 5.0));
    }
}
