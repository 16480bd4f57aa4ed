//! Player progression: upgrades, derived stats and the weapon loadout

use armada_core::Cooldown;
use armada_core::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::ship::{Ship, ShipClass, ShipId, ShipStats};
use crate::weapons::WeaponSlot;

/// Starting missile count
pub const DEFAULT_MISSILES: u32 = 5;

/// Minimum seconds between missile launches
pub const MISSILE_LAUNCH_INTERVAL: f64 = 0.5;

/// Beam pulse interval
pub const BEAM_PULSE_INTERVAL: f64 = 0.1;

/// Purchased upgrade levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Upgrades {
    pub hull: u32,
    pub shields: u32,
    pub energy: u32,
    pub thrust: u32,
    pub primary_damage: u32,
    pub turret_damage: u32,
    pub missile_damage: u32,
    pub shield_regen: u32,
}

/// Unupgraded player ship values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseStats {
    pub thrust: f32,
    pub max_speed: f32,
    /// Seconds between primary shots
    pub primary_fire_interval: f64,
    pub primary_damage: f32,
    /// Seconds between turret shots
    pub turret_fire_interval: f64,
    pub turret_damage: f32,
    pub missile_damage: f32,
    pub shield_regen: f32,
    pub max_armor: f32,
    pub max_shield: f32,
    pub max_energy: f32,
}

impl Default for BaseStats {
    fn default() -> Self {
        Self {
            thrust: 250.0,
            max_speed: 350.0,
            primary_fire_interval: 0.15,
            primary_damage: 15.0,
            turret_fire_interval: 0.25,
            turret_damage: 12.0,
            missile_damage: 80.0,
            shield_regen: 3.0,
            max_armor: 100.0,
            max_shield: 50.0,
            max_energy: 100.0,
        }
    }
}

/// Player ship stats after upgrades
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerStats {
    pub thrust: f32,
    pub max_speed: f32,
    pub primary_fire_interval: f64,
    pub primary_damage: f32,
    pub turret_fire_interval: f64,
    pub turret_damage: f32,
    pub missile_damage: f32,
    pub shield_regen: f32,
    pub max_armor: f32,
    pub max_shield: f32,
    pub max_energy: f32,
}

impl BaseStats {
    /// Apply upgrade levels
    pub fn derive(&self, upgrades: &Upgrades) -> PlayerStats {
        let level = |value: u32| value as f32;
        PlayerStats {
            thrust: self.thrust + level(upgrades.thrust) * 40.0,
            max_speed: self.max_speed + level(upgrades.thrust) * 30.0,
            primary_fire_interval: (self.primary_fire_interval
                - upgrades.primary_damage as f64 * 0.01)
                .max(0.06),
            primary_damage: self.primary_damage + level(upgrades.primary_damage) * 5.0,
            turret_fire_interval: (self.turret_fire_interval
                - upgrades.turret_damage as f64 * 0.015)
                .max(0.10),
            turret_damage: self.turret_damage + level(upgrades.turret_damage) * 4.0,
            missile_damage: self.missile_damage + level(upgrades.missile_damage) * 25.0,
            shield_regen: self.shield_regen + level(upgrades.shield_regen) * 1.5,
            max_armor: self.max_armor + level(upgrades.hull) * 20.0,
            max_shield: self.max_shield + level(upgrades.shields) * 15.0,
            max_energy: self.max_energy + level(upgrades.energy) * 20.0,
        }
    }
}

impl PlayerStats {
    /// Ship stat block for the player hull
    pub fn ship_stats(&self) -> ShipStats {
        ShipStats {
            max_shield: self.max_shield,
            max_armor: self.max_armor,
            shield_recharge: self.shield_regen,
            armor_recharge: 0.0,
            turn_rate: 1.0,
        }
    }

    /// Seconds between shots for a forward weapon slot
    pub fn fire_interval(&self, slot: WeaponSlot) -> f64 {
        match slot {
            WeaponSlot::PulseCannon | WeaponSlot::SpreadShot => self.primary_fire_interval,
            WeaponSlot::BeamLaser => BEAM_PULSE_INTERVAL,
            WeaponSlot::HeavyCannon => self.primary_fire_interval * 3.0,
        }
    }

    /// Damage per projectile or pulse for a forward weapon slot
    pub fn slot_damage(&self, slot: WeaponSlot) -> f32 {
        match slot {
            WeaponSlot::PulseCannon | WeaponSlot::SpreadShot => self.primary_damage,
            WeaponSlot::BeamLaser => self.primary_damage / 3.0,
            WeaponSlot::HeavyCannon => self.primary_damage * 2.5,
        }
    }
}

/// The player ship plus everything the player owns
#[derive(Debug, Clone)]
pub struct Player {
    pub ship: Ship,
    pub energy: f32,
    pub max_energy: f32,
    pub credits: u64,
    pub kills: u32,
    pub missiles: u32,
    pub upgrades: Upgrades,
    pub stats: PlayerStats,
    pub weapon: WeaponSlot,
    pub primary_cooldown: Cooldown,
    pub turret_cooldown: Cooldown,
    pub missile_cooldown: Cooldown,
    pub locked_target: Option<ShipId>,
}

impl Player {
    /// Fresh player ship at `position` facing up-screen
    pub fn new(id: ShipId, position: Vec2, base: &BaseStats) -> Self {
        let upgrades = Upgrades::default();
        let stats = base.derive(&upgrades);
        let mut ship = Ship::new(id, ShipClass::Player, position)
            .with_rotation(-std::f32::consts::FRAC_PI_2)
            .with_disable_threshold(0.0);
        ship.apply_stats(&stats.ship_stats());
        ship.pools.shield = ship.pools.max_shield;
        ship.pools.armor = ship.pools.max_armor;

        Self {
            ship,
            energy: stats.max_energy,
            max_energy: stats.max_energy,
            credits: 0,
            kills: 0,
            missiles: DEFAULT_MISSILES,
            upgrades,
            primary_cooldown: Cooldown::new(stats.fire_interval(WeaponSlot::default())),
            turret_cooldown: Cooldown::new(stats.turret_fire_interval),
            missile_cooldown: Cooldown::new(MISSILE_LAUNCH_INTERVAL),
            weapon: WeaponSlot::default(),
            stats,
            locked_target: None,
        }
    }

    /// Recompute derived stats after an upgrade purchase
    pub fn set_upgrades(&mut self, upgrades: Upgrades, base: &BaseStats) {
        self.upgrades = upgrades;
        self.stats = base.derive(&upgrades);
        self.ship.apply_stats(&self.stats.ship_stats());
        self.max_energy = self.stats.max_energy;
        self.energy = self.energy.min(self.max_energy);
        self.primary_cooldown.set_duration(self.stats.fire_interval(self.weapon));
        self.turret_cooldown.set_duration(self.stats.turret_fire_interval);
    }

    /// Switch forward weapon
    pub fn select_weapon(&mut self, slot: WeaponSlot) {
        self.weapon = slot;
        self.primary_cooldown.set_duration(self.stats.fire_interval(slot));
    }

    /// Credit a kill and its bounty
    pub fn record_kill(&mut self, bounty: u32) {
        self.kills += 1;
        self.credits += u64::from(bounty);
    }

    /// Spend credits if the balance allows it
    pub fn spend_credits(&mut self, amount: u64) -> bool {
        if self.credits >= amount {
            self.credits -= amount;
            true
        } else {
            false
        }
    }

    /// Drain boost energy; returns false once the pool is empty
    pub fn drain_energy(&mut self, amount: f32) -> bool {
        if self.energy <= 0.0 {
            return false;
        }
        self.energy = (self.energy - amount).max(0.0);
        true
    }

    pub fn regenerate_energy(&mut self, rate: f32, dt: f32) {
        self.energy = (self.energy + rate * dt).min(self.max_energy);
    }

    /// Use one missile if any are left
    pub fn take_missile(&mut self) -> bool {
        if self.missiles == 0 {
            return false;
        }
        self.missiles -= 1;
        true
    }

    pub fn is_alive(&self) -> bool {
        !self.ship.is_destroyed()
    }

    /// Advance every weapon cooldown
    pub fn tick_cooldowns(&mut self, dt: f64) {
        self.primary_cooldown.tick(dt);
        self.turret_cooldown.tick(dt);
        self.missile_cooldown.tick(dt);
    }
}
