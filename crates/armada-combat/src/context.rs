//! Simulation context and the per-phase combat systems.
//!
//! [`SimulationContext`] owns every piece of mutable combat state. The host
//! passes it into a [`Scheduler`], which drives [`physics_system`] in the
//! physics phase and [`gameplay_system`] in the gameplay phase. Nothing here
//! touches global state; collaborators read snapshots and drain events.

use armada_core::math::{self, Vec2};
use armada_core::{FrameStats, HandlerId, Phase, Scheduler};
use armada_physics as physics;
use rand::Rng;
use serde::Serialize;

use crate::CombatResult;
use crate::ai::{AiState, Behavior, firing_parameters, update_enemy_ai};
use crate::config::CombatConfig;
use crate::damage::{DamageConfig, DamageOutcome, DamageSplit, update_ship_regeneration};
use crate::events::{CombatEvent, EventQueue};
use crate::input::InputState;
use crate::loadout::Player;
use crate::projectile::{Beam, Missile, Projectile, Side};
use crate::rating::combat_rating;
use crate::ship::{Ship, ShipClass, ShipId};
use crate::targeting::{self, TargetCommand};
use crate::weapons::{SPREAD_SHOT_ANGLE, SPREAD_SHOT_COUNT, WeaponSlot, WeaponType, fan_offsets};

/// Id reserved for the player ship
pub const PLAYER_ID: ShipId = ShipId(0);

pub const PHYSICS_PRIORITY: i32 = 0;
pub const GAMEPLAY_PRIORITY: i32 = 0;

/// All transient combat state for one game session
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub config: CombatConfig,
    pub player: Player,
    pub enemies: Vec<Ship>,
    pub projectiles: Vec<Projectile>,
    pub missiles: Vec<Missile>,
    pub beams: Vec<Beam>,
    /// Latest input from the host; one-shot commands are consumed by gameplay
    pub input: InputState,
    pub events: EventQueue,
    running: bool,
    next_id: u32,
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self::new(CombatConfig::default())
    }
}

impl SimulationContext {
    /// Fresh session with the player at the origin
    pub fn new(config: CombatConfig) -> Self {
        let mut player = Player::new(PLAYER_ID, Vec2::ZERO, &config.player);
        player.ship.drag = config.physics.player_drag;

        Self {
            config,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            missiles: Vec::new(),
            beams: Vec::new(),
            input: InputState::default(),
            events: EventQueue::new(),
            running: true,
            next_id: 1,
        }
    }

    /// Restore the start-of-game state, keeping the configuration
    pub fn reset(&mut self) {
        let config = std::mem::take(&mut self.config);
        *self = Self::new(config);
        log::debug!("Simulation context reset");
    }

    /// The game is active until the player is destroyed
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Add an enemy ship and return its id
    pub fn spawn_enemy(&mut self, class: ShipClass, behavior: Behavior, position: Vec2) -> ShipId {
        let id = ShipId(self.next_id);
        self.next_id += 1;

        let ship = Ship::new(id, class, position)
            .with_behavior(behavior)
            .with_drag(self.config.physics.enemy_drag)
            .with_disable_threshold(self.config.damage.default_disable_threshold);
        self.enemies.push(ship);
        self.events.push(CombatEvent::ShipSpawned {
            id,
            class,
            position,
        });
        log::debug!("Spawned {} {} ({}) at {}", class, id, behavior.key(), position);
        id
    }

    /// Spawn an enemy at a random point in a ring around the player
    pub fn spawn_enemy_around<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        class: ShipClass,
        behavior: Behavior,
        inner_radius: f32,
        outer_radius: f32,
    ) -> ShipId {
        let offset = math::random_in_ring(rng, inner_radius, outer_radius);
        let position = self.player.ship.position() + offset;
        self.spawn_enemy(class, behavior, position)
    }

    pub fn enemy(&self, id: ShipId) -> Option<&Ship> {
        targeting::find_by_id(&self.enemies, id)
    }

    /// The locked target, if it is still alive
    pub fn locked_target(&self) -> Option<&Ship> {
        self.player
            .locked_target
            .and_then(|id| self.enemy(id))
            .filter(|ship| ship.is_targetable())
    }

    /// Apply a target selection command from the targeting collaborator
    pub fn apply_target_command(&mut self, command: TargetCommand) {
        let origin = self.player.ship.position();
        let range = self.config.ranges.targeting_range;
        self.player.locked_target = match command {
            TargetCommand::Nearest => {
                targeting::find_nearest(&self.enemies, origin, range).map(|ship| ship.id)
            }
            TargetCommand::Weakest => {
                targeting::find_weakest(&self.enemies, origin, range).map(|ship| ship.id)
            }
            TargetCommand::Cycle => targeting::cycle_target(&self.enemies, self.player.locked_target),
            TargetCommand::Clear => None,
        };
    }

    /// Take every pending event for the rendering collaborator
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        self.events.drain()
    }

    /// Values the HUD collaborator displays
    pub fn hud(&self, stats: &FrameStats) -> HudSnapshot {
        let ship = &self.player.ship;
        let rating = combat_rating(self.player.kills);
        let target = self.locked_target().map(|target| TargetPanel {
            id: target.id,
            class: target.class,
            shield_percent: target.pools.shield_fraction() * 100.0,
            armor_percent: target.pools.armor_fraction() * 100.0,
            distance: target.position().distance(ship.position()),
            state: target.ai_state,
            disabled: target.is_disabled(),
        });

        HudSnapshot {
            shield: ship.pools.shield,
            max_shield: ship.pools.max_shield,
            armor: ship.pools.armor,
            max_armor: ship.pools.max_armor,
            energy: self.player.energy,
            max_energy: self.player.max_energy,
            speed: ship.body.speed(),
            credits: self.player.credits,
            kills: self.player.kills,
            missiles: self.player.missiles,
            weapon: self.player.weapon.display_name(),
            rating: rating.name,
            rating_color: rating.color,
            target,
            fps: stats.fps(),
            average_frame_ms: stats.average_frame_time() * 1000.0,
        }
    }

    /// One physics step: player flight, enemy AI movement, ship collisions
    pub fn step_physics(&mut self, dt: f32) {
        self.update_player_motion(dt);
        self.update_enemy_motion(dt);
        self.resolve_ship_collisions();
    }

    /// One gameplay step: commands, weapons, projectiles, damage, cleanup
    pub fn step_gameplay(&mut self, dt: f64) {
        let dt32 = dt as f32;

        self.handle_commands();
        self.player.tick_cooldowns(dt);
        for enemy in &mut self.enemies {
            enemy.fire_cooldown.tick(dt);
        }

        if self.player.is_alive() {
            self.fire_player_weapons();
        }
        self.fire_enemy_weapons();

        self.update_projectiles(dt32);
        self.update_missiles(dt32);
        self.update_beams(dt32);

        update_ship_regeneration(&mut self.player.ship.pools, dt32);
        for enemy in &mut self.enemies {
            update_ship_regeneration(&mut enemy.pools, dt32);
        }

        self.collect_destroyed();
    }

    fn update_player_motion(&mut self, dt: f32) {
        let tuning = &self.config.physics;
        let input = &self.input;
        let player = &mut self.player;
        if !player.is_alive() {
            return;
        }

        let mut thrust = player.stats.thrust;
        let mut max_speed = player.stats.max_speed;
        let boosting =
            input.boost && input.moving && player.drain_energy(tuning.boost_energy_cost * dt);
        if boosting {
            thrust *= tuning.boost_multiplier;
            max_speed *= tuning.boost_multiplier;
        } else {
            player.regenerate_energy(tuning.energy_regen, dt);
        }

        let drag = player.ship.drag;
        let body = &mut player.ship.body;
        if input.moving {
            physics::apply_thrust(body, thrust, input.movement, dt);
        }
        if input.aim.distance_squared(body.position) > 0.0 {
            let aim_angle = physics::angle_to_target(body, input.aim);
            physics::rotate_towards(body, aim_angle, tuning.player_rotation_speed, dt);
        }
        physics::apply_drag(body, drag);
        physics::limit_speed(body, max_speed);
        physics::apply_velocity(body, dt);
    }

    fn update_enemy_motion(&mut self, dt: f32) {
        let target = self.player.ship.position();
        let hunting = self.player.is_alive();
        let fire_range = self.config.ranges.enemy_fire_range;
        let disabled_drag = self.config.physics.disabled_drag;

        for enemy in self.enemies.iter_mut().filter(|ship| !ship.is_destroyed()) {
            if enemy.is_disabled() {
                physics::apply_drag(&mut enemy.body, disabled_drag);
                enemy.wants_fire = false;
            } else if hunting {
                let update = update_enemy_ai(enemy, target, dt, fire_range);
                enemy.apply_ai_update(&update);
            } else {
                let drag = enemy.drag;
                physics::apply_drag(&mut enemy.body, drag);
                enemy.wants_fire = false;
            }
            physics::apply_velocity(&mut enemy.body, dt);
        }
    }

    fn resolve_ship_collisions(&mut self) {
        let Self {
            player,
            enemies,
            config,
            events,
            ..
        } = self;
        let ram = RamParams {
            restitution: config.physics.restitution,
            damage_scale: config.ranges.ram_damage_scale,
            damage: &config.damage,
        };

        if player.is_alive() {
            for enemy in enemies.iter_mut().filter(|ship| !ship.is_destroyed()) {
                ram.collide(&mut player.ship, enemy, events);
            }
        }

        for i in 1..enemies.len() {
            let (head, tail) = enemies.split_at_mut(i);
            let b = &mut tail[0];
            for a in head.iter_mut() {
                if a.is_destroyed() || b.is_destroyed() {
                    continue;
                }
                ram.collide(a, b, events);
            }
        }
    }

    fn handle_commands(&mut self) {
        if let Some(slot) = self.input.select_weapon.take() {
            self.player.select_weapon(slot);
        }
        if let Some(command) = self.input.target_command.take() {
            self.apply_target_command(command);
        }
    }

    fn fire_player_weapons(&mut self) {
        if self.input.primary_fire && self.player.primary_cooldown.try_trigger() {
            self.fire_primary();
        }
        self.fire_turret();
        if self.input.missile_fire {
            self.launch_missile();
        }
    }

    fn fire_primary(&mut self) {
        let ship = &self.player.ship;
        let angle = ship.body.rotation;
        let origin = ship.position() + ship.body.forward() * ship.hit_radius();
        let slot = self.player.weapon;
        let damage = self.player.stats.slot_damage(slot);
        let weapon = slot.weapon_type();

        match slot {
            WeaponSlot::BeamLaser => self.beams.push(Beam::new(origin, angle, damage)),
            WeaponSlot::SpreadShot => self.projectiles.extend(
                fan_offsets(SPREAD_SHOT_COUNT, SPREAD_SHOT_ANGLE)
                    .map(|offset| Projectile::new(origin, angle + offset, weapon, damage)),
            ),
            WeaponSlot::PulseCannon | WeaponSlot::HeavyCannon => {
                self.projectiles.push(Projectile::new(origin, angle, weapon, damage))
            }
        }
        self.events.push(CombatEvent::WeaponFired {
            weapon,
            position: origin,
            angle,
        });
    }

    /// The turret fires on its own at a locked target in range
    fn fire_turret(&mut self) {
        let origin = self.player.ship.position();
        let range = self.config.ranges.targeting_range;
        let Some(aim) = self
            .locked_target()
            .map(Ship::position)
            .filter(|aim| aim.distance(origin) <= range)
        else {
            return;
        };
        if !self.player.turret_cooldown.try_trigger() {
            return;
        }

        let angle = math::angle_between(origin, aim);
        self.projectiles.push(Projectile::new(
            origin,
            angle,
            WeaponType::Turret,
            self.player.stats.turret_damage,
        ));
        self.events.push(CombatEvent::WeaponFired {
            weapon: WeaponType::Turret,
            position: origin,
            angle,
        });
    }

    /// Launch at the locked target, or the nearest ship when nothing is locked
    fn launch_missile(&mut self) {
        if !self.player.missile_cooldown.is_ready() || !self.player.take_missile() {
            return;
        }
        self.player.missile_cooldown.start();

        let origin = self.player.ship.position();
        let angle = self.player.ship.body.rotation;
        let range = self.config.ranges.targeting_range;
        let target = self.locked_target().map(|ship| ship.id).or_else(|| {
            targeting::find_nearest(&self.enemies, origin, range).map(|ship| ship.id)
        });

        self.missiles.push(Missile::new(
            origin,
            angle,
            target,
            self.player.stats.missile_damage,
        ));
        self.events.push(CombatEvent::WeaponFired {
            weapon: WeaponType::Missile,
            position: origin,
            angle,
        });
    }

    fn fire_enemy_weapons(&mut self) {
        if !self.player.is_alive() {
            return;
        }
        let target = self.player.ship.position();
        let Self {
            enemies,
            projectiles,
            events,
            ..
        } = self;

        for enemy in enemies.iter_mut() {
            if !enemy.wants_fire || enemy.is_disabled() || enemy.is_destroyed() {
                continue;
            }
            if !enemy.fire_cooldown.try_trigger() {
                continue;
            }

            let params = firing_parameters(enemy.class);
            let origin = enemy.position();
            let angle = math::angle_between(origin, target);
            projectiles.extend(fan_offsets(params.shot_count, params.spread).map(|offset| {
                Projectile::new(origin, angle + offset, WeaponType::Enemy, params.damage)
            }));
            events.push(CombatEvent::WeaponFired {
                weapon: WeaponType::Enemy,
                position: origin,
                angle,
            });
        }
    }

    fn update_projectiles(&mut self, dt: f32) {
        let Self {
            player,
            enemies,
            projectiles,
            events,
            config,
            ..
        } = self;

        for shot in projectiles.iter_mut() {
            shot.update(dt);
            if !shot.is_alive() {
                continue;
            }

            let struck = match shot.owner {
                Side::Player => enemies
                    .iter_mut()
                    .find(|ship| ship.is_targetable() && shot.hits(ship)),
                Side::Hostile => Some(&mut player.ship)
                    .filter(|ship| ship.is_targetable() && shot.hits(ship)),
            };
            if let Some(ship) = struck {
                strike(&config.damage, ship, shot.weapon, shot.damage_split(), events);
                shot.lifetime = 0.0;
            }
        }
        projectiles.retain(Projectile::is_alive);
    }

    fn update_missiles(&mut self, dt: f32) {
        let Self {
            enemies,
            missiles,
            events,
            config,
            ..
        } = self;
        let acceleration = config.physics.missile_acceleration;

        for missile in missiles.iter_mut() {
            let target = missile
                .target
                .and_then(|id| targeting::find_by_id(enemies.as_slice(), id));
            missile.track(target, dt, acceleration);
            missile.update(dt);
            if !missile.is_alive() {
                continue;
            }

            let struck = enemies
                .iter_mut()
                .find(|ship| ship.is_targetable() && missile.hits(ship));
            if let Some(ship) = struck {
                strike(&config.damage, ship, WeaponType::Missile, missile.damage_split(), events);
                missile.projectile.lifetime = 0.0;
            }
        }
        missiles.retain(Missile::is_alive);
    }

    fn update_beams(&mut self, dt: f32) {
        let Self {
            enemies,
            beams,
            events,
            config,
            ..
        } = self;

        for beam in beams.iter_mut() {
            for ship in enemies.iter_mut() {
                if ship.is_targetable() && beam.hits(ship) {
                    strike(&config.damage, ship, WeaponType::Beam, beam.damage_split(), events);
                    beam.hit.push(ship.id);
                }
            }
            beam.update(dt);
        }
        beams.retain(Beam::is_alive);
    }

    /// Remove destroyed enemies, pay out bounties and end the game on
    /// player death
    fn collect_destroyed(&mut self) {
        let Self {
            player,
            enemies,
            events,
            running,
            ..
        } = self;

        enemies.retain(|ship| {
            if !ship.is_destroyed() {
                return true;
            }
            log::debug!("{} {} destroyed, bounty {}", ship.class, ship.id, ship.bounty);
            events.push(CombatEvent::ShipDestroyed {
                id: ship.id,
                class: ship.class,
                position: ship.position(),
                explosion_size: ship.class.explosion_size(),
                bounty: ship.bounty,
            });
            player.record_kill(ship.bounty);
            false
        });

        if player
            .locked_target
            .is_some_and(|id| !enemies.iter().any(|ship| ship.id == id && ship.is_targetable()))
        {
            player.locked_target = None;
        }

        if *running && player.ship.is_destroyed() {
            log::info!(
                "Player destroyed with {} kills and {} credits",
                player.kills,
                player.credits
            );
            events.push(CombatEvent::PlayerDestroyed {
                position: player.ship.position(),
            });
            *running = false;
        }
    }
}

/// Ship-ship collision handling
struct RamParams<'a> {
    restitution: f32,
    damage_scale: f32,
    damage: &'a DamageConfig,
}

impl RamParams<'_> {
    /// Separate two overlapping ships. When they were closing, both take
    /// mass damage from the impact and bounce apart.
    fn collide(&self, a: &mut Ship, b: &mut Ship, events: &mut EventQueue) {
        let min_distance = a.hit_radius() + b.hit_radius();
        let normal = physics::collision_normal(a.position(), b.position());
        let closing_speed = (a.body.velocity - b.body.velocity).dot(normal);
        let impact = physics::impact_magnitude(&a.body, &b.body);

        if physics::resolve_overlap(&mut a.body, &mut b.body, min_distance) <= 0.0 {
            return;
        }
        if closing_speed <= 0.0 {
            return;
        }

        let amount = impact * self.damage_scale;
        for ship in [&mut *a, &mut *b] {
            let outcome = self.damage.resolve(&mut ship.pools, 0.0, amount);
            note_disabled(ship, &outcome, events);
        }

        if a.body.velocity.dot(normal) > 0.0 {
            physics::apply_collision_response(&mut a.body, normal, self.restitution);
        }
        if b.body.velocity.dot(normal) < 0.0 {
            physics::apply_collision_response(&mut b.body, normal, self.restitution);
        }
    }
}

/// Resolve a weapon hit and report it
fn strike(
    damage: &DamageConfig,
    ship: &mut Ship,
    weapon: WeaponType,
    split: DamageSplit,
    events: &mut EventQueue,
) -> DamageOutcome {
    let outcome = damage.resolve(&mut ship.pools, split.energy, split.mass);
    events.push(CombatEvent::Hit {
        target: ship.id,
        weapon,
        position: ship.position(),
        shield_damage: outcome.shield_damage,
        armor_damage: outcome.armor_damage,
        explosion_size: weapon.explosion_size(),
    });
    note_disabled(ship, &outcome, events);
    outcome
}

fn note_disabled(ship: &Ship, outcome: &DamageOutcome, events: &mut EventQueue) {
    if outcome.newly_disabled {
        log::debug!("{} {} disabled", ship.class, ship.id);
        events.push(CombatEvent::ShipDisabled {
            id: ship.id,
            position: ship.position(),
        });
    }
}

/// Locked-target readout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetPanel {
    pub id: ShipId,
    pub class: ShipClass,
    pub shield_percent: f32,
    pub armor_percent: f32,
    pub distance: f32,
    pub state: AiState,
    pub disabled: bool,
}

/// Everything the HUD shows for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub shield: f32,
    pub max_shield: f32,
    pub armor: f32,
    pub max_armor: f32,
    pub energy: f32,
    pub max_energy: f32,
    pub speed: f32,
    pub credits: u64,
    pub kills: u32,
    pub missiles: u32,
    pub weapon: &'static str,
    pub rating: &'static str,
    pub rating_color: &'static str,
    pub target: Option<TargetPanel>,
    pub fps: f64,
    pub average_frame_ms: f64,
}

/// Physics phase handler
pub fn physics_system(ctx: &mut SimulationContext, dt: f64) -> anyhow::Result<()> {
    ctx.step_physics(dt as f32);
    Ok(())
}

/// Gameplay phase handler
pub fn gameplay_system(ctx: &mut SimulationContext, dt: f64) -> anyhow::Result<()> {
    ctx.step_gameplay(dt);
    Ok(())
}

/// Register both combat systems and gate them on the game still running
pub fn install(scheduler: &mut Scheduler<SimulationContext>) -> [HandlerId; 2] {
    let physics = scheduler.register_fn(Phase::Physics, "combat-physics", PHYSICS_PRIORITY, physics_system);
    let gameplay =
        scheduler.register_fn(Phase::Gameplay, "combat-gameplay", GAMEPLAY_PRIORITY, gameplay_system);
    scheduler.set_game_gate(SimulationContext::is_running);
    [physics, gameplay]
}

/// A scheduler built from the loop settings with the combat systems installed
pub fn build_scheduler(config: &CombatConfig) -> CombatResult<Scheduler<SimulationContext>> {
    let mut scheduler = Scheduler::new(config.loop_config.clone())?;
    install(&mut scheduler);
    Ok(scheduler)
}
