//! Weapon types, kinematic profiles and player weapon slots

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CombatError, Side};

/// Collision radius shared by every projectile
pub const PROJECTILE_RADIUS: f32 = 5.0;

/// Weapon families. Each one has a fixed flight profile and damage split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponType {
    /// Forward laser
    Primary,
    Spread,
    Heavy,
    Turret,
    Missile,
    Beam,
    /// Hostile ship fire
    Enemy,
}

/// Flight parameters of a projectile weapon
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectileProfile {
    /// Travel speed in units per second
    pub speed: f32,
    /// Seconds before the projectile expires
    pub lifetime: f32,
    /// Visual width and length, for the renderer only
    pub size: (f32, f32),
}

impl WeaponType {
    pub const ALL: [WeaponType; 7] = [
        WeaponType::Primary,
        WeaponType::Spread,
        WeaponType::Heavy,
        WeaponType::Turret,
        WeaponType::Missile,
        WeaponType::Beam,
        WeaponType::Enemy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WeaponType::Primary => "primary",
            WeaponType::Spread => "spread",
            WeaponType::Heavy => "heavy",
            WeaponType::Turret => "turret",
            WeaponType::Missile => "missile",
            WeaponType::Beam => "beam",
            WeaponType::Enemy => "enemy",
        }
    }

    /// Resolve a weapon key, falling back to the primary laser
    pub fn from_key_or_default(key: &str) -> Self {
        key.parse().unwrap_or_else(|_| {
            log::warn!("Unknown weapon type '{}', using primary", key);
            WeaponType::Primary
        })
    }

    /// Flight profile. Beams are instantaneous and use the primary profile
    /// only as a placeholder.
    pub fn profile(&self) -> ProjectileProfile {
        match self {
            WeaponType::Primary | WeaponType::Beam => ProjectileProfile {
                speed: 900.0,
                lifetime: 1.5,
                size: (2.0, 15.0),
            },
            WeaponType::Spread => ProjectileProfile {
                speed: 800.0,
                lifetime: 1.0,
                size: (1.5, 10.0),
            },
            WeaponType::Heavy => ProjectileProfile {
                speed: 600.0,
                lifetime: 2.5,
                size: (4.0, 25.0),
            },
            WeaponType::Turret => ProjectileProfile {
                speed: 750.0,
                lifetime: 1.2,
                size: (2.0, 12.0),
            },
            WeaponType::Missile => ProjectileProfile {
                speed: 400.0,
                lifetime: 4.0,
                size: (3.0, 20.0),
            },
            WeaponType::Enemy => ProjectileProfile {
                speed: 450.0,
                lifetime: 2.0,
                size: (2.0, 10.0),
            },
        }
    }

    /// Side that owns shots of this type
    pub fn owner(&self) -> Side {
        match self {
            WeaponType::Enemy => Side::Hostile,
            _ => Side::Player,
        }
    }

    /// Fraction of nominal damage delivered as energy damage
    pub fn energy_fraction(&self) -> f32 {
        match self {
            WeaponType::Missile => 0.3,
            WeaponType::Turret => 0.5,
            WeaponType::Beam => 1.0,
            WeaponType::Primary | WeaponType::Spread | WeaponType::Heavy | WeaponType::Enemy => 0.8,
        }
    }

    /// Explosion scale when a shot of this type hits
    pub fn explosion_size(&self) -> f32 {
        match self {
            WeaponType::Missile => 0.8,
            _ => 0.3,
        }
    }
}

impl fmt::Display for WeaponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WeaponType {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" | "laser" => Ok(WeaponType::Primary),
            "spread" => Ok(WeaponType::Spread),
            "heavy" => Ok(WeaponType::Heavy),
            "turret" => Ok(WeaponType::Turret),
            "missile" => Ok(WeaponType::Missile),
            "beam" => Ok(WeaponType::Beam),
            "enemy" => Ok(WeaponType::Enemy),
            _ => Err(CombatError::UnknownWeapon(s.to_string())),
        }
    }
}

/// Selectable forward weapons on the player ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponSlot {
    #[default]
    PulseCannon,
    SpreadShot,
    BeamLaser,
    HeavyCannon,
}

impl WeaponSlot {
    pub const ALL: [WeaponSlot; 4] = [
        WeaponSlot::PulseCannon,
        WeaponSlot::SpreadShot,
        WeaponSlot::BeamLaser,
        WeaponSlot::HeavyCannon,
    ];

    /// Slot by index, clamped into range
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// HUD name
    pub fn display_name(&self) -> &'static str {
        match self {
            WeaponSlot::PulseCannon => "PULSE CANNON",
            WeaponSlot::SpreadShot => "SPREAD SHOT",
            WeaponSlot::BeamLaser => "BEAM LASER",
            WeaponSlot::HeavyCannon => "HEAVY CANNON",
        }
    }

    /// HUD mount description
    pub fn mount(&self) -> &'static str {
        match self {
            WeaponSlot::PulseCannon => "PRIMARY - FORWARD MOUNT",
            WeaponSlot::SpreadShot => "SPREAD - FORWARD MOUNT",
            WeaponSlot::BeamLaser => "CONTINUOUS BEAM",
            WeaponSlot::HeavyCannon => "HEAVY - FORWARD MOUNT",
        }
    }

    /// Weapon type fired from this slot
    pub fn weapon_type(&self) -> WeaponType {
        match self {
            WeaponSlot::PulseCannon => WeaponType::Primary,
            WeaponSlot::SpreadShot => WeaponType::Spread,
            WeaponSlot::BeamLaser => WeaponType::Beam,
            WeaponSlot::HeavyCannon => WeaponType::Heavy,
        }
    }
}

/// Spread shot fan: projectile count and angular offset between shots
pub const SPREAD_SHOT_COUNT: usize = 3;
pub const SPREAD_SHOT_ANGLE: f32 = 0.15;

/// Heading offsets for a fan of `count` shots `spread` radians apart,
/// centred on zero
pub fn fan_offsets(count: usize, spread: f32) -> impl Iterator<Item = f32> {
    let center = (count.saturating_sub(1)) as f32 / 2.0;
    (0..count).map(move |i| (i as f32 - center) * spread)
}
