//! Ships, ship classes and factions

use std::fmt;
use std::str::FromStr;

use armada_core::Cooldown;
use armada_core::math::Vec2;
use armada_physics::{Body, HitClass};
use serde::{Deserialize, Serialize};

use crate::ai::{AiState, Behavior, firing_parameters};
use crate::damage::Pools;
use crate::CombatError;

/// Stable ship identifier. Targets are always referenced by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShipId(pub u32);

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hull classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipClass {
    Fighter,
    Heavy,
    Boss,
    Player,
}

/// Spawn-time stats of a ship class
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassStats {
    pub max_shield: f32,
    pub max_armor: f32,
    pub shield_recharge: f32,
    pub armor_recharge: f32,
    /// Multiplier on the 2 rad/s base AI turn speed
    pub turn_rate: f32,
    /// Multiplier on base AI thrust and top speed
    pub speed_factor: f32,
    pub mass: f32,
    /// Credits paid for the kill
    pub bounty: u32,
}

impl ShipClass {
    pub const ENEMIES: [ShipClass; 3] = [ShipClass::Fighter, ShipClass::Heavy, ShipClass::Boss];

    pub fn name(&self) -> &'static str {
        match self {
            ShipClass::Fighter => "fighter",
            ShipClass::Heavy => "heavy",
            ShipClass::Boss => "boss",
            ShipClass::Player => "player",
        }
    }

    /// Resolve a class key, falling back to fighter
    pub fn from_key_or_default(key: &str) -> Self {
        key.parse().unwrap_or_else(|_| {
            log::warn!("Unknown ship class '{}', using fighter", key);
            ShipClass::Fighter
        })
    }

    pub fn stats(&self) -> ClassStats {
        match self {
            ShipClass::Fighter => ClassStats {
                max_shield: 25.0,
                max_armor: 15.0,
                shield_recharge: 5.0,
                armor_recharge: 0.0,
                turn_rate: 1.2,
                speed_factor: 1.2,
                mass: 1.0,
                bounty: 100,
            },
            ShipClass::Heavy => ClassStats {
                max_shield: 60.0,
                max_armor: 50.0,
                shield_recharge: 4.0,
                armor_recharge: 0.5,
                turn_rate: 0.7,
                speed_factor: 0.8,
                mass: 3.0,
                bounty: 250,
            },
            ShipClass::Boss => ClassStats {
                max_shield: 200.0,
                max_armor: 250.0,
                shield_recharge: 8.0,
                armor_recharge: 2.0,
                turn_rate: 0.4,
                speed_factor: 0.6,
                mass: 10.0,
                bounty: 1000,
            },
            ShipClass::Player => ClassStats {
                max_shield: 50.0,
                max_armor: 100.0,
                shield_recharge: 3.0,
                armor_recharge: 0.0,
                turn_rate: 1.0,
                speed_factor: 1.0,
                mass: 2.0,
                bounty: 0,
            },
        }
    }

    pub fn hit_class(&self) -> HitClass {
        match self {
            ShipClass::Fighter => HitClass::Fighter,
            ShipClass::Heavy => HitClass::Heavy,
            ShipClass::Boss => HitClass::Boss,
            ShipClass::Player => HitClass::Player,
        }
    }

    pub fn hit_radius(&self) -> f32 {
        self.hit_class().radius()
    }

    /// Explosion scale when a ship of this class is destroyed
    pub fn explosion_size(&self) -> f32 {
        match self {
            ShipClass::Boss => 3.0,
            ShipClass::Heavy => 1.5,
            _ => 0.8,
        }
    }
}

impl fmt::Display for ShipClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShipClass {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fighter" => Ok(ShipClass::Fighter),
            "heavy" => Ok(ShipClass::Heavy),
            "boss" => Ok(ShipClass::Boss),
            "player" => Ok(ShipClass::Player),
            _ => Err(CombatError::UnknownShipClass(s.to_string())),
        }
    }
}

/// Factions a ship can fly for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Faction {
    TerranConfederacy,
    UnitedEarth,
    SecondRebellion,
    Cau,
    Bhu,
    GalacticPolice,
    FreeCompanies,
    Helionova,
    Seti,
    Voinian,
    Emalgha,
    Hinwar,
    Gadzair,
    Simnuvia,
    Kliaphin,
    Miranu,
    Talramuv,
    Katuri,
    TheAliens,
    #[default]
    Pirates,
    Renegades,
}

impl Faction {
    pub const ALL: [Faction; 21] = [
        Faction::TerranConfederacy,
        Faction::UnitedEarth,
        Faction::SecondRebellion,
        Faction::Cau,
        Faction::Bhu,
        Faction::GalacticPolice,
        Faction::FreeCompanies,
        Faction::Helionova,
        Faction::Seti,
        Faction::Voinian,
        Faction::Emalgha,
        Faction::Hinwar,
        Faction::Gadzair,
        Faction::Simnuvia,
        Faction::Kliaphin,
        Faction::Miranu,
        Faction::Talramuv,
        Faction::Katuri,
        Faction::TheAliens,
        Faction::Pirates,
        Faction::Renegades,
    ];

    /// Key used in configuration and logs
    pub fn key(&self) -> &'static str {
        match self {
            Faction::TerranConfederacy => "terranConfederacy",
            Faction::UnitedEarth => "unitedEarth",
            Faction::SecondRebellion => "secondRebellion",
            Faction::Cau => "cau",
            Faction::Bhu => "bhu",
            Faction::GalacticPolice => "galacticPolice",
            Faction::FreeCompanies => "freeCompanies",
            Faction::Helionova => "helionova",
            Faction::Seti => "seti",
            Faction::Voinian => "voinian",
            Faction::Emalgha => "emalgha",
            Faction::Hinwar => "hinwar",
            Faction::Gadzair => "gadzair",
            Faction::Simnuvia => "simnuvia",
            Faction::Kliaphin => "kliaphin",
            Faction::Miranu => "miranu",
            Faction::Talramuv => "talramuv",
            Faction::Katuri => "katuri",
            Faction::TheAliens => "theAliens",
            Faction::Pirates => "pirates",
            Faction::Renegades => "renegades",
        }
    }

    /// Resolve a faction key, falling back to pirates
    pub fn from_key_or_default(key: &str) -> Self {
        key.parse().unwrap_or_else(|_| {
            log::warn!("Unknown faction '{}', using pirates", key);
            Faction::Pirates
        })
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Faction {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Faction::ALL
            .into_iter()
            .find(|faction| faction.key() == s)
            .ok_or_else(|| CombatError::UnknownFaction(s.to_string()))
    }
}

/// Stat block written by the shipyard on purchase or upgrade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipStats {
    pub max_shield: f32,
    pub max_armor: f32,
    pub shield_recharge: f32,
    pub armor_recharge: f32,
    pub turn_rate: f32,
}

/// A player or AI-controlled ship
#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub id: ShipId,
    pub class: ShipClass,
    pub faction: Faction,
    pub body: Body,
    pub pools: Pools,
    /// Per-frame drag coefficient
    pub drag: f32,
    pub turn_rate: f32,
    pub speed_factor: f32,
    pub bounty: u32,
    pub behavior: Behavior,
    pub ai_state: AiState,
    /// Set by the AI when the ship wants to shoot this tick
    pub wants_fire: bool,
    pub fire_cooldown: Cooldown,
}

impl Ship {
    /// A ship of `class` at `position` with full pools
    pub fn new(id: ShipId, class: ShipClass, position: Vec2) -> Self {
        let stats = class.stats();
        let drag = if class == ShipClass::Player { 0.992 } else { 0.98 };
        Self {
            id,
            class,
            faction: Faction::default(),
            body: Body::new(position, 0.0).with_mass(stats.mass),
            pools: Pools::new(stats.max_shield, stats.max_armor)
                .with_recharge(stats.shield_recharge, stats.armor_recharge),
            drag,
            turn_rate: stats.turn_rate,
            speed_factor: stats.speed_factor,
            bounty: stats.bounty,
            behavior: Behavior::default(),
            ai_state: AiState::default(),
            wants_fire: false,
            fire_cooldown: Cooldown::new(firing_parameters(class).interval),
        }
    }

    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.faction = faction;
        self
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.body.rotation = rotation;
        self
    }

    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_disable_threshold(mut self, threshold: f32) -> Self {
        self.pools.disable_threshold = threshold;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Combined shield and armor
    pub fn health(&self) -> f32 {
        self.pools.health()
    }

    pub fn max_health(&self) -> f32 {
        self.pools.max_health()
    }

    pub fn health_fraction(&self) -> f32 {
        self.pools.health_fraction()
    }

    pub fn is_disabled(&self) -> bool {
        self.pools.disabled
    }

    pub fn is_destroyed(&self) -> bool {
        self.pools.destroyed
    }

    /// Alive and worth pointing a weapon at
    pub fn is_targetable(&self) -> bool {
        !self.pools.destroyed && self.health() > 0.0
    }

    pub fn hit_radius(&self) -> f32 {
        self.class.hit_radius()
    }

    /// Overwrite hull stats. Current pools are clamped into the new maxima.
    pub fn apply_stats(&mut self, stats: &ShipStats) {
        self.pools.set_maxima(stats.max_shield, stats.max_armor);
        self.pools.shield_recharge = stats.shield_recharge;
        self.pools.armor_recharge = stats.armor_recharge;
        self.turn_rate = stats.turn_rate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_has_full_pools() {
        let ship = Ship::new(ShipId(1), ShipClass::Heavy, Vec2::new(10.0, 20.0));
        assert_eq!(ship.pools.shield, ship.pools.max_shield);
        assert_eq!(ship.pools.armor, ship.pools.max_armor);
        assert_eq!(ship.health_fraction(), 1.0);
        assert_eq!(ship.hit_radius(), 30.0);
        assert_eq!(ship.position(), Vec2::new(10.0, 20.0));
        assert!(ship.fire_cooldown.is_ready());
        assert!(ship.is_targetable());
    }

    #[test]
    fn test_class_parse_and_fallback() {
        assert_eq!("boss".parse::<ShipClass>().unwrap(), ShipClass::Boss);
        assert!(matches!("corvette".parse::<ShipClass>(), Err(CombatError::UnknownShipClass(_))));
        assert_eq!(ShipClass::from_key_or_default("corvette"), ShipClass::Fighter);
    }

    #[test]
    fn test_explosion_sizes() {
        assert_eq!(ShipClass::Boss.explosion_size(), 3.0);
        assert_eq!(ShipClass::Heavy.explosion_size(), 1.5);
        assert_eq!(ShipClass::Fighter.explosion_size(), 0.8);
    }

    #[test]
    fn test_faction_keys_round_trip() {
        for faction in Faction::ALL {
            assert_eq!(faction.key().parse::<Faction>().unwrap(), faction);
        }
        assert_eq!(Faction::from_key_or_default("klingons"), Faction::Pirates);
        let json = serde_json::to_string(&Faction::TheAliens).unwrap();
        assert_eq!(json, "\"theAliens\"");
    }

    #[test]
    fn test_apply_stats_clamps_pools() {
        let mut ship = Ship::new(ShipId(7), ShipClass::Player, Vec2::ZERO);
        ship.apply_stats(&ShipStats {
            max_shield: 30.0,
            max_armor: 140.0,
            shield_recharge: 4.0,
            armor_recharge: 0.0,
            turn_rate: 1.5,
        });
        assert_eq!(ship.pools.shield, 30.0);
        assert_eq!(ship.pools.max_armor, 140.0);
        assert_eq!(ship.pools.armor, 100.0);
        assert_eq!(ship.turn_rate, 1.5);
    }

    #[test]
    fn test_destroyed_ship_is_not_targetable() {
        let mut ship = Ship::new(ShipId(2), ShipClass::Fighter, Vec2::ZERO);
        ship.pools.armor = 0.0;
        ship.pools.destroyed = true;
        assert!(!ship.is_targetable());
    }
}
