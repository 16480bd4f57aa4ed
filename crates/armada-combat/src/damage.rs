//! Two-pool damage model
//!
//! Every ship carries a shield and an armor pool. Energy damage drains the
//! shield first and bleeds into armor at reduced efficiency once the shield
//! is gone; mass damage goes straight to armor. Armor at or below the disable
//! threshold latches the ship as disabled, armor at zero destroys it.

use serde::{Deserialize, Serialize};

use crate::weapons::WeaponType;

/// Armor fraction at or below which a ship is disabled
pub const DEFAULT_DISABLE_THRESHOLD: f32 = 0.33;

/// Efficiency of energy damage that overflows the shield into armor
pub const DEFAULT_BLEED_THROUGH: f32 = 0.5;

/// Shield and armor state of one ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pools {
    pub shield: f32,
    pub max_shield: f32,
    pub armor: f32,
    pub max_armor: f32,
    /// Shield regained per second
    pub shield_recharge: f32,
    /// Armor regained per second, usually zero outside capital ships
    pub armor_recharge: f32,
    /// Fraction of max armor at which the ship is disabled
    pub disable_threshold: f32,
    pub disabled: bool,
    pub destroyed: bool,
}

impl Pools {
    /// Full pools with no regeneration
    pub fn new(max_shield: f32, max_armor: f32) -> Self {
        Self {
            shield: max_shield,
            max_shield,
            armor: max_armor,
            max_armor,
            shield_recharge: 0.0,
            armor_recharge: 0.0,
            disable_threshold: DEFAULT_DISABLE_THRESHOLD,
            disabled: false,
            destroyed: false,
        }
    }

    pub fn with_recharge(mut self, shield_recharge: f32, armor_recharge: f32) -> Self {
        self.shield_recharge = shield_recharge;
        self.armor_recharge = armor_recharge;
        self
    }

    pub fn with_disable_threshold(mut self, threshold: f32) -> Self {
        self.disable_threshold = threshold;
        self
    }

    /// Override current values, clamped into `[0, max]`
    pub fn with_current(mut self, shield: f32, armor: f32) -> Self {
        self.shield = shield.clamp(0.0, self.max_shield);
        self.armor = armor.clamp(0.0, self.max_armor);
        self
    }

    /// Combined shield and armor
    pub fn health(&self) -> f32 {
        self.shield + self.armor
    }

    /// Combined maxima
    pub fn max_health(&self) -> f32 {
        self.max_shield + self.max_armor
    }

    /// `health / max_health`, 0 for a ship with no pools at all
    pub fn health_fraction(&self) -> f32 {
        let max = self.max_health();
        if max > 0.0 { self.health() / max } else { 0.0 }
    }

    pub fn shield_fraction(&self) -> f32 {
        if self.max_shield > 0.0 { self.shield / self.max_shield } else { 0.0 }
    }

    pub fn armor_fraction(&self) -> f32 {
        if self.max_armor > 0.0 { self.armor / self.max_armor } else { 0.0 }
    }

    /// Alive and able to take further damage
    pub fn is_alive(&self) -> bool {
        !self.destroyed && self.armor > 0.0
    }

    /// Restore both pools and clear the disabled latch. Has no effect on a
    /// destroyed ship.
    pub fn repair(&mut self) {
        if self.destroyed {
            return;
        }
        self.shield = self.max_shield;
        self.armor = self.max_armor;
        self.disabled = false;
    }

    /// Replace the maxima, keeping current values inside the new bounds
    pub fn set_maxima(&mut self, max_shield: f32, max_armor: f32) {
        self.max_shield = max_shield.max(0.0);
        self.max_armor = max_armor.max(0.0);
        self.shield = self.shield.clamp(0.0, self.max_shield);
        self.armor = self.armor.clamp(0.0, self.max_armor);
    }
}

/// Nominal damage divided into its shield-effective and armor-effective parts
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DamageSplit {
    pub energy: f32,
    pub mass: f32,
}

impl DamageSplit {
    pub fn total(&self) -> f32 {
        self.energy + self.mass
    }
}

/// Split `base_damage` by weapon type. The parts always sum to the base.
pub fn calculate_damage_split(weapon: WeaponType, base_damage: f32) -> DamageSplit {
    let energy = base_damage * weapon.energy_fraction();
    DamageSplit {
        energy,
        mass: base_damage - energy,
    }
}

/// Split by weapon key; unknown keys use the primary laser split
pub fn damage_split_for_key(key: &str, base_damage: f32) -> DamageSplit {
    calculate_damage_split(WeaponType::from_key_or_default(key), base_damage)
}

/// Tunable damage-model constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageConfig {
    /// Efficiency of energy damage overflowing into armor
    pub bleed_through: f32,
    /// Disable threshold given to newly spawned ships
    pub default_disable_threshold: f32,
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            bleed_through: DEFAULT_BLEED_THROUGH,
            default_disable_threshold: DEFAULT_DISABLE_THRESHOLD,
        }
    }
}

/// Outcome of one damage application
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageOutcome {
    pub shield_damage: f32,
    pub armor_damage: f32,
    /// The ship became disabled during this hit
    pub newly_disabled: bool,
    /// The ship was destroyed by this hit
    pub newly_destroyed: bool,
}

impl DamageConfig {
    /// Apply energy and mass damage to `target` and report what changed.
    ///
    /// A destroyed target is left untouched. Negative amounts count as zero.
    pub fn resolve(&self, target: &mut Pools, energy_damage: f32, mass_damage: f32) -> DamageOutcome {
        let mut outcome = DamageOutcome::default();
        if target.destroyed {
            return outcome;
        }

        let mut remaining_energy = energy_damage.max(0.0);
        let mut remaining_mass = mass_damage.max(0.0);

        if target.shield > 0.0 && remaining_energy > 0.0 {
            let absorbed = target.shield.min(remaining_energy);
            target.shield -= absorbed;
            remaining_energy -= absorbed;
            outcome.shield_damage = absorbed;
        }

        if remaining_energy > 0.0 {
            remaining_mass += remaining_energy * self.bleed_through;
        }

        if target.armor > 0.0 && remaining_mass > 0.0 {
            let before = target.armor;
            target.armor -= remaining_mass;
            outcome.armor_damage = before - target.armor.max(0.0);
        }

        if !target.disabled
            && target.armor > 0.0
            && target.armor <= target.max_armor * target.disable_threshold
        {
            target.disabled = true;
            outcome.newly_disabled = true;
        }

        if target.armor <= 0.0 {
            target.armor = 0.0;
            target.destroyed = true;
            outcome.newly_destroyed = true;
        }

        outcome
    }

    /// Apply damage and return whether the target is destroyed
    pub fn apply(&self, target: &mut Pools, energy_damage: f32, mass_damage: f32) -> bool {
        self.resolve(target, energy_damage, mass_damage);
        target.destroyed
    }
}

/// Apply energy and mass damage with the default bleed-through.
///
/// Returns whether the target is destroyed.
pub fn apply_ev_damage(target: &mut Pools, energy_damage: f32, mass_damage: f32) -> bool {
    DamageConfig::default().apply(target, energy_damage, mass_damage)
}

/// Regenerate shield and armor over `dt` seconds, capped at the maxima.
/// Disabled and destroyed ships do not regenerate.
pub fn update_ship_regeneration(ship: &mut Pools, dt: f32) {
    if ship.destroyed || ship.disabled {
        return;
    }

    if ship.shield < ship.max_shield && ship.shield_recharge > 0.0 {
        ship.shield = (ship.shield + ship.shield_recharge * dt).min(ship.max_shield);
    }

    if ship.armor < ship.max_armor && ship.armor_recharge > 0.0 {
        ship.armor = (ship.armor + ship.armor_recharge * dt).min(ship.max_armor);
    }
}
