//! Discrete simulation events for the rendering and HUD layers

use armada_core::math::Vec2;
use serde::Serialize;

use crate::ship::{ShipClass, ShipId};
use crate::weapons::WeaponType;

/// Something a presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CombatEvent {
    ShipSpawned {
        id: ShipId,
        class: ShipClass,
        position: Vec2,
    },
    WeaponFired {
        weapon: WeaponType,
        position: Vec2,
        angle: f32,
    },
    Hit {
        target: ShipId,
        weapon: WeaponType,
        position: Vec2,
        shield_damage: f32,
        armor_damage: f32,
        explosion_size: f32,
    },
    ShipDisabled {
        id: ShipId,
        position: Vec2,
    },
    ShipDestroyed {
        id: ShipId,
        class: ShipClass,
        position: Vec2,
        explosion_size: f32,
        bounty: u32,
    },
    PlayerDestroyed {
        position: Vec2,
    },
}

/// Pending events, drained by the host once per frame
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<CombatEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter()
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
