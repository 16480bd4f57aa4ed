//! # Armada Combat
//!
//! Combat rules and the simulation context for the Armada space shooter.
//!
//! This crate layers gameplay on top of the core loop and the physics helpers:
//! - **Damage**: Two-pool shield/armor model with energy bleed-through and disabling
//! - **Weapons**: Projectile profiles, energy/mass splits, missiles and beam pulses
//! - **AI**: Behavior profiles driving a patrol/chase/attack/flee state machine
//! - **Targeting**: Nearest, weakest and cycling target selection
//! - **Progression**: Upgrades, derived player stats and combat ratings
//! - **Context**: The per-frame physics and gameplay systems wired into a scheduler

pub mod ai;
pub mod config;
pub mod context;
pub mod damage;
pub mod events;
pub mod input;
pub mod loadout;
pub mod projectile;
pub mod rating;
pub mod ship;
pub mod targeting;
pub mod weapons;

use thiserror::Error;

pub use ai::{AiState, AiUpdate, Behavior, BehaviorProfile, FiringParameters, update_enemy_ai};
pub use config::{CombatConfig, RangeConfig};
pub use context::{HudSnapshot, SimulationContext, TargetPanel};
pub use damage::{DamageConfig, DamageOutcome, DamageSplit, Pools, apply_ev_damage};
pub use events::{CombatEvent, EventQueue};
pub use input::InputState;
pub use loadout::{BaseStats, Player, PlayerStats, Upgrades};
pub use projectile::{Beam, Missile, Projectile, Side};
pub use rating::{CombatRating, combat_rating};
pub use ship::{Faction, Ship, ShipClass, ShipId, ShipStats};
pub use targeting::TargetCommand;
pub use weapons::{WeaponSlot, WeaponType};

/// Combat errors
#[derive(Error, Debug)]
pub enum CombatError {
    #[error("Unknown weapon type: {0}")]
    UnknownWeapon(String),
    #[error("Unknown AI behavior: {0}")]
    UnknownBehavior(String),
    #[error("Unknown ship class: {0}")]
    UnknownShipClass(String),
    #[error("Unknown faction: {0}")]
    UnknownFaction(String),
    #[error("Invalid loop settings: {0}")]
    Loop(#[from] armada_core::CoreError),
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for combat operations
pub type CombatResult<T> = Result<T, CombatError>;
