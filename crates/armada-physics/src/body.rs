//! Kinematic state and the per-frame integrator

use armada_core::math::{self, Vec2};
use serde::{Deserialize, Serialize};

/// Position, velocity and heading of anything that moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Heading in radians, 0 along +x
    pub rotation: f32,
    pub mass: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            mass: 1.0,
        }
    }
}

impl Body {
    pub fn new(position: Vec2, rotation: f32) -> Self {
        Self {
            position,
            rotation,
            ..Self::default()
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Unit vector along the heading
    pub fn forward(&self) -> Vec2 {
        math::direction(self.rotation)
    }

    /// Current speed
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Advance position by velocity × dt
pub fn apply_velocity(body: &mut Body, dt: f32) {
    body.position += body.velocity * dt;
}

/// Scale velocity by a per-frame coefficient in (0, 1]
pub fn apply_drag(body: &mut Body, coefficient: f32) {
    body.velocity *= coefficient;
}

/// Accelerate along an arbitrary direction
pub fn apply_thrust(body: &mut Body, thrust_power: f32, direction: Vec2, dt: f32) {
    body.velocity += direction * thrust_power * dt;
}

/// Accelerate along the heading
pub fn apply_forward_thrust(body: &mut Body, thrust_power: f32, dt: f32) {
    let forward = body.forward();
    body.velocity += forward * thrust_power * dt;
}

/// Accelerate against the heading
pub fn apply_reverse_thrust(body: &mut Body, thrust_power: f32, dt: f32) {
    let forward = body.forward();
    body.velocity -= forward * thrust_power * dt;
}

/// Cap the speed at `max_speed`, returning the resulting speed
pub fn limit_speed(body: &mut Body, max_speed: f32) -> f32 {
    let speed = body.speed();
    if speed > max_speed {
        body.velocity = body.velocity / speed * max_speed;
        return max_speed;
    }
    speed
}

/// Zero the velocity
pub fn stop(body: &mut Body) {
    body.velocity = Vec2::ZERO;
}

/// Scale velocity by `factor`
pub fn dampen(body: &mut Body, factor: f32) {
    body.velocity *= factor;
}

/// Turn toward `target_angle` by at most `rotation_speed × dt` along the
/// shorter arc. Lands exactly on the target when it is within one step.
///
/// Returns the remaining signed angular error.
pub fn rotate_towards(body: &mut Body, target_angle: f32, rotation_speed: f32, dt: f32) -> f32 {
    let diff = math::angle_difference(body.rotation, target_angle);
    let max_rotation = rotation_speed * dt;

    if diff.abs() <= max_rotation {
        body.rotation = target_angle;
        return 0.0;
    }

    body.rotation += diff.signum() * max_rotation;
    diff - diff.signum() * max_rotation
}

/// Rotation-only variant of [`rotate_towards`]
pub fn update_rotation(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let diff = math::angle_difference(current, target);
    let max_rotation = rate * dt;
    if diff.abs() <= max_rotation {
        target
    } else {
        current + diff.signum() * max_rotation
    }
}

/// Angle from the body to a world point
pub fn angle_to_target(body: &Body, target: Vec2) -> f32 {
    math::angle_between(body.position, target)
}

/// Steer the velocity vector toward `target` by at most `turn_rate × dt`,
/// keeping its magnitude
pub fn track_target(body: &mut Body, target: Vec2, turn_rate: f32, dt: f32) {
    let target_angle = math::angle_between(body.position, target);
    let current_angle = body.velocity.y.atan2(body.velocity.x);
    let diff = math::angle_difference(current_angle, target_angle);

    let new_angle = current_angle + diff.signum() * diff.abs().min(turn_rate * dt);
    let speed = body.speed();

    body.velocity = math::direction(new_angle) * speed;
    body.rotation = new_angle;
}

/// Multiply speed by a per-frame factor
pub fn accelerate(body: &mut Body, factor: f32) {
    body.velocity *= factor;
}

/// Distance between two bodies is at most `range`
pub fn is_within_range(a: &Body, b: &Body, range: f32) -> bool {
    a.position.distance(b.position) <= range
}

/// Squared distance between two bodies
pub fn distance_squared(a: &Body, b: &Body) -> f32 {
    a.position.distance_squared(b.position)
}
