//! Projectiles, homing missiles and beam pulses

use armada_core::math::{self, Vec2};
use armada_physics::{self as physics, Body};
use serde::{Deserialize, Serialize};

use crate::damage::{DamageSplit, calculate_damage_split};
use crate::ship::{Ship, ShipId};
use crate::weapons::{PROJECTILE_RADIUS, WeaponType};

/// Missile turn rate in rad/s
pub const MISSILE_TURN_RATE: f32 = 3.0;

/// Beam pulse lifetime in seconds
pub const BEAM_LIFETIME: f32 = 0.1;

pub const DEFAULT_BEAM_LENGTH: f32 = 300.0;
pub const DEFAULT_BEAM_HALF_WIDTH: f32 = 8.0;
pub const DEFAULT_BEAM_DAMAGE: f32 = 5.0;

/// Which side fired a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Hostile,
}

/// A straight-flying shot
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub body: Body,
    pub weapon: WeaponType,
    pub damage: f32,
    /// Seconds left; the projectile is alive while this is positive
    pub lifetime: f32,
    pub owner: Side,
}

impl Projectile {
    /// Launch a `weapon` shot from `origin` along `angle`
    pub fn new(origin: Vec2, angle: f32, weapon: WeaponType, damage: f32) -> Self {
        let profile = weapon.profile();
        Self {
            body: Body::new(origin, angle).with_velocity(math::direction(angle) * profile.speed),
            weapon,
            damage,
            lifetime: profile.lifetime,
            owner: weapon.owner(),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Advance position and age
    pub fn update(&mut self, dt: f32) {
        physics::apply_velocity(&mut self.body, dt);
        self.lifetime -= dt;
    }

    pub fn is_alive(&self) -> bool {
        self.lifetime > 0.0
    }

    /// Overlaps a ship's hit circle
    pub fn hits(&self, ship: &Ship) -> bool {
        physics::check_circle_collision(
            self.body.position,
            ship.position(),
            PROJECTILE_RADIUS,
            ship.hit_radius(),
        )
    }

    /// Energy/mass split of this shot's damage
    pub fn damage_split(&self) -> DamageSplit {
        calculate_damage_split(self.weapon, self.damage)
    }
}

/// A homing projectile
#[derive(Debug, Clone, PartialEq)]
pub struct Missile {
    pub projectile: Projectile,
    pub target: Option<ShipId>,
    /// Max heading change in rad/s
    pub turn_rate: f32,
}

impl Missile {
    pub fn new(origin: Vec2, angle: f32, target: Option<ShipId>, damage: f32) -> Self {
        Self {
            projectile: Projectile::new(origin, angle, WeaponType::Missile, damage),
            target,
            turn_rate: MISSILE_TURN_RATE,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.projectile.position()
    }

    /// Steer toward the target by at most `turn_rate × dt`, then multiply
    /// speed by `acceleration`. Does nothing without a live target.
    ///
    /// Returns whether the missile tracked this tick.
    pub fn track(&mut self, target: Option<&Ship>, dt: f32, acceleration: f32) -> bool {
        let Some(target) = target.filter(|ship| ship.is_targetable()) else {
            return false;
        };
        let body = &mut self.projectile.body;
        physics::track_target(body, target.position(), self.turn_rate, dt);
        physics::accelerate(body, acceleration);
        true
    }

    pub fn update(&mut self, dt: f32) {
        self.projectile.update(dt);
    }

    pub fn is_alive(&self) -> bool {
        self.projectile.is_alive()
    }

    pub fn hits(&self, ship: &Ship) -> bool {
        self.projectile.hits(ship)
    }

    pub fn damage_split(&self) -> DamageSplit {
        self.projectile.damage_split()
    }
}

/// A short beam pulse. Damage applies once per ship per pulse.
#[derive(Debug, Clone, PartialEq)]
pub struct Beam {
    pub origin: Vec2,
    pub angle: f32,
    pub length: f32,
    pub half_width: f32,
    pub damage: f32,
    pub lifetime: f32,
    pub owner: Side,
    /// Ships already hit by this pulse
    pub hit: Vec<ShipId>,
}

impl Beam {
    pub fn new(origin: Vec2, angle: f32, damage: f32) -> Self {
        Self {
            origin,
            angle,
            length: DEFAULT_BEAM_LENGTH,
            half_width: DEFAULT_BEAM_HALF_WIDTH,
            damage,
            lifetime: BEAM_LIFETIME,
            owner: Side::Player,
            hit: Vec::new(),
        }
    }

    pub fn with_length(mut self, length: f32) -> Self {
        self.length = length;
        self
    }

    pub fn with_half_width(mut self, half_width: f32) -> Self {
        self.half_width = half_width;
        self
    }

    pub fn update(&mut self, dt: f32) {
        self.lifetime -= dt;
    }

    pub fn is_alive(&self) -> bool {
        self.lifetime > 0.0
    }

    /// Ship lies on the beam and has not been hit by this pulse yet
    pub fn hits(&self, ship: &Ship) -> bool {
        !self.hit.contains(&ship.id)
            && physics::check_beam_collision(
                self.origin,
                self.angle,
                ship.position(),
                self.length,
                self.half_width + ship.hit_radius(),
            )
    }

    pub fn damage_split(&self) -> DamageSplit {
        calculate_damage_split(WeaponType::Beam, self.damage)
    }
}
