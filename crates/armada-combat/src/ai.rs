//! Enemy AI
//!
//! Each enemy carries a behavior profile. Its state is recomputed from scratch
//! every tick from health and distance to the threat, then mapped to a
//! heading, a thrust multiplier and a fire decision.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use armada_core::math::{self, Vec2};
use armada_physics::Body;
use serde::{Deserialize, Serialize};

use crate::ship::{Ship, ShipClass};
use crate::CombatError;

/// Distance past the preferred range at which an enemy switches to chasing
pub const CHASE_MARGIN: f32 = 100.0;

/// Default enemy firing range
pub const DEFAULT_FIRE_RANGE: f32 = 500.0;

/// AI turn speed in rad/s for a turn rate of 1.0
pub const BASE_TURN_SPEED: f32 = 2.0;

const BASE_THRUST: f32 = 150.0;
const BASE_MAX_SPEED: f32 = 200.0;
const AI_DRAG: f32 = 0.98;

/// Behavior state, recomputed each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiState {
    /// No engagement, drifting
    #[default]
    Patrol,
    /// Closing on a distant target
    Chase,
    /// Engaging near the preferred range
    Attack,
    /// Running from the threat
    Flee,
}

impl AiState {
    pub fn name(&self) -> &'static str {
        match self {
            AiState::Patrol => "patrol",
            AiState::Chase => "chase",
            AiState::Attack => "attack",
            AiState::Flee => "flee",
        }
    }
}

impl fmt::Display for AiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tuning for one AI personality
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorProfile {
    /// Willingness to start a fight, 0 to 1
    pub aggression: f32,
    /// Health fraction below which the ship flees
    pub flee_threshold: f32,
    /// Distance beyond which timid ships give up the chase
    pub pursuit_range: f32,
    /// Desired standoff distance while attacking
    pub preferred_range: f32,
}

/// Canonical AI personalities, in order of increasing aggression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Behavior {
    WimpyTrader,
    BraveTrader,
    Warship,
    #[default]
    Interceptor,
}

impl Behavior {
    pub const ALL: [Behavior; 4] = [
        Behavior::WimpyTrader,
        Behavior::BraveTrader,
        Behavior::Warship,
        Behavior::Interceptor,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Behavior::WimpyTrader => "wimpyTrader",
            Behavior::BraveTrader => "braveTrader",
            Behavior::Warship => "warship",
            Behavior::Interceptor => "interceptor",
        }
    }

    pub fn profile(&self) -> BehaviorProfile {
        match self {
            Behavior::WimpyTrader => BehaviorProfile {
                aggression: 0.0,
                flee_threshold: 0.9,
                pursuit_range: 0.0,
                preferred_range: 500.0,
            },
            Behavior::BraveTrader => BehaviorProfile {
                aggression: 0.3,
                flee_threshold: 0.5,
                pursuit_range: 300.0,
                preferred_range: 200.0,
            },
            Behavior::Warship => BehaviorProfile {
                aggression: 0.8,
                flee_threshold: 0.15,
                pursuit_range: 600.0,
                preferred_range: 150.0,
            },
            Behavior::Interceptor => BehaviorProfile {
                aggression: 1.0,
                flee_threshold: 0.1,
                pursuit_range: 800.0,
                preferred_range: 100.0,
            },
        }
    }

    /// Resolve a behavior key, falling back to interceptor
    pub fn from_key_or_default(key: &str) -> Self {
        key.parse().unwrap_or_else(|_| {
            log::warn!("Unknown AI behavior '{}', using interceptor", key);
            Behavior::Interceptor
        })
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Behavior {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Behavior::ALL
            .into_iter()
            .find(|behavior| behavior.key() == s)
            .ok_or_else(|| CombatError::UnknownBehavior(s.to_string()))
    }
}

/// Pick the behavior state for an enemy facing a threat at `target`
pub fn determine_ai_state(enemy: &Ship, target: Vec2, profile: &BehaviorProfile) -> AiState {
    let distance = enemy.position().distance(target);

    if enemy.health_fraction() < profile.flee_threshold {
        return AiState::Flee;
    }

    if distance > profile.pursuit_range && profile.aggression < 0.5 {
        return AiState::Patrol;
    }

    if distance > profile.preferred_range + CHASE_MARGIN {
        return AiState::Chase;
    }

    AiState::Attack
}

/// Heading the enemy should turn toward: the threat, or directly away from
/// it while fleeing
pub fn calculate_target_rotation(enemy: Vec2, target: Vec2, state: AiState) -> f32 {
    let angle = math::angle_between(enemy, target);
    if state == AiState::Flee { angle + PI } else { angle }
}

/// Turn speed in rad/s for a ship turn rate; non-positive rates count as 1
pub fn turn_speed(turn_rate: f32) -> f32 {
    let rate = if turn_rate > 0.0 { turn_rate } else { 1.0 };
    rate * BASE_TURN_SPEED
}

/// Thrust multipliers relative to the ship's base thrust
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ThrustDecision {
    pub forward: f32,
    pub lateral: f32,
}

impl ThrustDecision {
    const fn forward(forward: f32) -> Self {
        Self {
            forward,
            lateral: 0.0,
        }
    }
}

/// Map a state to thrust
pub fn calculate_thrust_decision(
    enemy: Vec2,
    target: Vec2,
    state: AiState,
    profile: &BehaviorProfile,
) -> ThrustDecision {
    let distance = enemy.distance(target);
    let preferred = profile.preferred_range;

    match state {
        AiState::Flee => ThrustDecision::forward(1.2),
        AiState::Chase => ThrustDecision::forward(1.0),
        AiState::Attack => {
            if distance > preferred {
                ThrustDecision::forward(1.0)
            } else if distance < preferred * 0.6 {
                // Too close, back off
                ThrustDecision::forward(-0.5)
            } else {
                ThrustDecision::forward(0.1)
            }
        }
        AiState::Patrol => ThrustDecision::forward(0.2),
    }
}

/// Thrust along the heading, cap at the ship's top speed, then apply the
/// fixed AI drag. Returns the new velocity without moving the body.
pub fn apply_ai_movement(body: &Body, speed_factor: f32, thrust: ThrustDecision, dt: f32) -> Vec2 {
    let factor = if speed_factor > 0.0 { speed_factor } else { 1.0 };
    let base_speed = BASE_THRUST * factor;
    let max_speed = BASE_MAX_SPEED * factor;

    let mut velocity = body.velocity + body.forward() * base_speed * thrust.forward * dt;
    let speed = velocity.length();
    if speed > max_speed {
        velocity = velocity / speed * max_speed;
    }
    velocity * AI_DRAG
}

/// Whether an enemy in `state` should shoot at `target`
pub fn should_fire(enemy: &Ship, target: Vec2, state: AiState, max_range: f32) -> bool {
    if enemy.is_disabled() || state != AiState::Attack {
        return false;
    }
    enemy.position().distance(target) < max_range
}

/// Enemy gun parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiringParameters {
    /// Seconds between volleys
    pub interval: f64,
    pub damage: f32,
    pub shot_count: usize,
    /// Angle between shots in a volley
    pub spread: f32,
}

/// Gun parameters by ship class
pub fn firing_parameters(class: ShipClass) -> FiringParameters {
    match class {
        ShipClass::Fighter => FiringParameters {
            interval: 1.2,
            damage: 8.0,
            shot_count: 1,
            spread: 0.0,
        },
        ShipClass::Heavy => FiringParameters {
            interval: 0.6,
            damage: 15.0,
            shot_count: 1,
            spread: 0.0,
        },
        ShipClass::Boss => FiringParameters {
            interval: 0.3,
            damage: 25.0,
            shot_count: 3,
            spread: 0.2,
        },
        ShipClass::Player => FiringParameters {
            interval: 1.0,
            damage: 10.0,
            shot_count: 1,
            spread: 0.0,
        },
    }
}

/// Result of one AI evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiUpdate {
    pub state: AiState,
    pub rotation: f32,
    pub velocity: Vec2,
    pub should_fire: bool,
}

/// Evaluate state, heading, thrust and fire decision for one enemy without
/// mutating it
pub fn update_enemy_ai(enemy: &Ship, target: Vec2, dt: f32, fire_range: f32) -> AiUpdate {
    let profile = enemy.behavior.profile();
    let state = determine_ai_state(enemy, target, &profile);

    let target_rotation = calculate_target_rotation(enemy.position(), target, state);
    let mut steered = enemy.body;
    armada_physics::rotate_towards(&mut steered, target_rotation, turn_speed(enemy.turn_rate), dt);

    let thrust = calculate_thrust_decision(enemy.position(), target, state, &profile);
    let velocity = apply_ai_movement(&steered, enemy.speed_factor, thrust, dt);

    AiUpdate {
        state,
        rotation: steered.rotation,
        velocity,
        should_fire: should_fire(enemy, target, state, fire_range),
    }
}

impl Ship {
    /// Store an AI evaluation on the ship
    pub fn apply_ai_update(&mut self, update: &AiUpdate) {
        self.ai_state = update.state;
        self.body.rotation = update.rotation;
        self.body.velocity = update.velocity;
        self.wants_fire = update.should_fire;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ship::ShipId;

    fn enemy_at(x: f32, y: f32) -> Ship {
        Ship::new(ShipId(1), ShipClass::Fighter, Vec2::new(x, y))
    }

    fn damaged(mut ship: Ship, fraction: f32) -> Ship {
        let total = ship.max_health() * fraction;
        ship.pools.shield = 0.0;
        ship.pools.armor = total.min(ship.pools.max_armor);
        ship.pools.shield = (total - ship.pools.armor).max(0.0);
        ship
    }

    #[test]
    fn test_profiles_are_ordered() {
        let profiles: Vec<BehaviorProfile> = Behavior::ALL.iter().map(Behavior::profile).collect();
        for pair in profiles.windows(2) {
            assert!(pair[0].aggression < pair[1].aggression);
            assert!(pair[0].flee_threshold > pair[1].flee_threshold);
            assert!(pair[0].pursuit_range < pair[1].pursuit_range);
        }
    }

    #[test]
    fn test_behavior_fallback() {
        assert_eq!("warship".parse::<Behavior>().unwrap(), Behavior::Warship);
        assert!("pacifist".parse::<Behavior>().is_err());
        assert_eq!(Behavior::from_key_or_default("pacifist"), Behavior::Interceptor);
    }

    #[test]
    fn test_flee_overrides_everything() {
        let profile = Behavior::Interceptor.profile();
        let enemy = damaged(enemy_at(0.0, 0.0), 0.05);
        assert_eq!(determine_ai_state(&enemy, Vec2::new(50.0, 0.0), &profile), AiState::Flee);
    }

    #[test]
    fn test_timid_ships_patrol_when_far() {
        let profile = Behavior::BraveTrader.profile();
        let enemy = enemy_at(0.0, 0.0);
        assert_eq!(determine_ai_state(&enemy, Vec2::new(400.0, 0.0), &profile), AiState::Patrol);

        // Aggressive ships chase the same target
        let warship = Behavior::Warship.profile();
        assert_eq!(determine_ai_state(&enemy, Vec2::new(400.0, 0.0), &warship), AiState::Chase);
    }

    #[test]
    fn test_chase_then_attack() {
        let profile = Behavior::Interceptor.profile();
        let enemy = enemy_at(0.0, 0.0);
        assert_eq!(determine_ai_state(&enemy, Vec2::new(201.0, 0.0), &profile), AiState::Chase);
        assert_eq!(determine_ai_state(&enemy, Vec2::new(200.0, 0.0), &profile), AiState::Attack);
        assert_eq!(determine_ai_state(&enemy, Vec2::new(50.0, 0.0), &profile), AiState::Attack);
    }

    #[test]
    fn test_flee_faces_away() {
        let toward = calculate_target_rotation(Vec2::ZERO, Vec2::new(10.0, 0.0), AiState::Attack);
        let away = calculate_target_rotation(Vec2::ZERO, Vec2::new(10.0, 0.0), AiState::Flee);
        assert_eq!(toward, 0.0);
        assert!((away - PI).abs() < 1e-6);
    }

    #[test]
    fn test_thrust_decisions() {
        let profile = Behavior::Warship.profile();
        let origin = Vec2::ZERO;
        let decide = |distance: f32, state| {
            calculate_thrust_decision(origin, Vec2::new(distance, 0.0), state, &profile).forward
        };
        assert_eq!(decide(100.0, AiState::Flee), 1.2);
        assert_eq!(decide(400.0, AiState::Chase), 1.0);
        assert_eq!(decide(200.0, AiState::Attack), 1.0);
        assert_eq!(decide(50.0, AiState::Attack), -0.5);
        assert_eq!(decide(120.0, AiState::Attack), 0.1);
        assert_eq!(decide(0.0, AiState::Patrol), 0.2);
    }

    #[test]
    fn test_ai_movement_caps_speed_then_drags() {
        let body = Body::default().with_velocity(Vec2::new(500.0, 0.0));
        let velocity = apply_ai_movement(&body, 1.0, ThrustDecision::forward(1.0), 0.1);
        assert!((velocity.length() - 200.0 * 0.98).abs() < 1e-3);

        let slow = Body::default();
        let velocity = apply_ai_movement(&slow, 2.0, ThrustDecision::forward(1.0), 0.1);
        assert!((velocity.x - 300.0 * 0.1 * 0.98).abs() < 1e-3);
    }

    #[test]
    fn test_should_fire() {
        let enemy = enemy_at(0.0, 0.0);
        let near = Vec2::new(100.0, 0.0);
        assert!(should_fire(&enemy, near, AiState::Attack, DEFAULT_FIRE_RANGE));
        assert!(!should_fire(&enemy, near, AiState::Chase, DEFAULT_FIRE_RANGE));
        assert!(!should_fire(&enemy, near, AiState::Flee, DEFAULT_FIRE_RANGE));
        assert!(!should_fire(&enemy, Vec2::new(500.0, 0.0), AiState::Attack, DEFAULT_FIRE_RANGE));

        let mut disabled = enemy_at(0.0, 0.0);
        disabled.pools.disabled = true;
        assert!(!should_fire(&disabled, near, AiState::Attack, DEFAULT_FIRE_RANGE));
    }

    #[test]
    fn test_firing_parameters() {
        let boss = firing_parameters(ShipClass::Boss);
        assert_eq!(boss.shot_count, 3);
        assert_eq!(boss.spread, 0.2);
        assert_eq!(firing_parameters(ShipClass::Fighter).interval, 1.2);
        assert_eq!(firing_parameters(ShipClass::Heavy).damage, 15.0);
    }

    #[test]
    fn test_update_enemy_ai_turns_toward_target() {
        let enemy = enemy_at(0.0, 0.0).with_rotation(0.0);
        let update = update_enemy_ai(&enemy, Vec2::new(0.0, 150.0), 0.1, DEFAULT_FIRE_RANGE);
        assert_eq!(update.state, AiState::Attack);
        // Fighter turn rate 1.2 gives 2.4 rad/s
        assert!((update.rotation - 0.24).abs() < 1e-5);
        assert!(update.should_fire);

        let mut applied = enemy.clone();
        applied.apply_ai_update(&update);
        assert_eq!(applied.ai_state, AiState::Attack);
        assert!(applied.wants_fire);
    }

    #[test]
    fn test_turn_speed_defaults() {
        assert_eq!(turn_speed(0.0), 2.0);
        assert_eq!(turn_speed(1.5), 3.0);
    }
}
