//! Collision tests and responses
//!
//! Ships and projectiles collide as circles. Beams are tested as a segment
//! along the shooter's heading with a half-width tolerance.

use armada_core::math::{Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::body::Body;

/// Separation used in place of a zero distance between coincident bodies
pub const MIN_SEPARATION: f32 = 1.0;

/// Collision classes with a fixed hit radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitClass {
    Fighter,
    Heavy,
    Boss,
    Player,
    Projectile,
}

impl HitClass {
    /// Collision radius in world units
    pub fn radius(&self) -> f32 {
        match self {
            HitClass::Fighter => 18.0,
            HitClass::Heavy => 30.0,
            HitClass::Boss => 55.0,
            HitClass::Player => 30.0,
            HitClass::Projectile => 5.0,
        }
    }

    /// Resolve a class key, treating anything unknown as a fighter
    pub fn from_key(key: &str) -> Self {
        match key {
            "heavy" => HitClass::Heavy,
            "boss" => HitClass::Boss,
            "player" => HitClass::Player,
            "projectile" => HitClass::Projectile,
            _ => HitClass::Fighter,
        }
    }
}

/// Circles around two points overlap (strictly closer than the radii sum)
pub fn check_circle_collision(a: Vec2, b: Vec2, radius_a: f32, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}

/// Point lies strictly within `radius` of `center`
pub fn check_point_collision(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance(center) < radius
}

/// Target lies on the beam fired from `origin` along `rotation`.
///
/// The target must be within `length`, in front of the origin, and closer to
/// the beam axis than `half_width`.
pub fn check_beam_collision(
    origin: Vec2,
    rotation: f32,
    target: Vec2,
    length: f32,
    half_width: f32,
) -> bool {
    let delta = target - origin;
    if delta.length() > length {
        return false;
    }

    let (sin, cos) = rotation.sin_cos();
    let projection = delta.x * cos + delta.y * sin;
    if projection < 0.0 {
        return false;
    }

    let perpendicular = (delta.x * sin - delta.y * cos).abs();
    perpendicular < half_width
}

/// Axis-aligned rectangles overlap
pub fn check_rect_collision(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

/// Unit vector from `a` to `b`
pub fn collision_normal(a: Vec2, b: Vec2) -> Vec2 {
    let delta = b - a;
    let dist = floored_distance(delta);
    delta / dist
}

/// Push two overlapping bodies apart, each by half the overlap.
///
/// Returns the overlap that was resolved, or 0 if they were not touching.
pub fn resolve_overlap(a: &mut Body, b: &mut Body, min_distance: f32) -> f32 {
    let delta = b.position - a.position;
    let dist = floored_distance(delta);
    let overlap = min_distance - dist;
    if overlap <= 0.0 {
        return 0.0;
    }

    let normal = delta / dist;
    a.position -= normal * overlap * 0.5;
    b.position += normal * overlap * 0.5;
    overlap
}

/// Reflect velocity about the collision normal with the given restitution
pub fn apply_collision_response(body: &mut Body, normal: Vec2, restitution: f32) {
    let along_normal = body.velocity.dot(normal);
    body.velocity -= (1.0 + restitution) * along_normal * normal;
}

/// Impact severity from relative speed and combined mass
pub fn impact_magnitude(a: &Body, b: &Body) -> f32 {
    let relative_speed = (a.velocity - b.velocity).length();
    let mass_a = if a.mass > 0.0 { a.mass } else { 1.0 };
    let mass_b = if b.mass > 0.0 { b.mass } else { 1.0 };
    relative_speed * (mass_a + mass_b) * 0.1
}

fn floored_distance(delta: Vec2) -> f32 {
    let dist = delta.length();
    if dist > 0.0 { dist } else { MIN_SEPARATION }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_hit_radii() {
        assert_eq!(HitClass::Fighter.radius(), 18.0);
        assert_eq!(HitClass::Heavy.radius(), 30.0);
        assert_eq!(HitClass::Boss.radius(), 55.0);
        assert_eq!(HitClass::from_key("player").radius(), 30.0);
        assert_eq!(HitClass::from_key("freighter"), HitClass::Fighter);
    }

    #[test]
    fn test_circle_collision_is_strict() {
        let a = Vec2::ZERO;
        assert!(check_circle_collision(a, Vec2::new(20.0, 0.0), 18.0, 5.0));
        assert!(!check_circle_collision(a, Vec2::new(23.0, 0.0), 18.0, 5.0));
        assert!(check_point_collision(Vec2::new(0.0, 17.9), a, 18.0));
        assert!(!check_point_collision(Vec2::new(0.0, 18.0), a, 18.0));
    }

    #[test]
    fn test_beam_collision() {
        let origin = Vec2::ZERO;
        // Straight ahead
        assert!(check_beam_collision(origin, 0.0, Vec2::new(200.0, 5.0), 300.0, 10.0));
        // Too far off axis
        assert!(!check_beam_collision(origin, 0.0, Vec2::new(200.0, 15.0), 300.0, 10.0));
        // Behind the shooter
        assert!(!check_beam_collision(origin, 0.0, Vec2::new(-50.0, 0.0), 300.0, 10.0));
        // Beyond the beam
        assert!(!check_beam_collision(origin, 0.0, Vec2::new(301.0, 0.0), 300.0, 10.0));
        // Rotated beam
        let up = std::f32::consts::FRAC_PI_2;
        assert!(check_beam_collision(origin, up, Vec2::new(3.0, 250.0), 300.0, 10.0));
    }

    #[test]
    fn test_rect_collision() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(check_rect_collision(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!check_rect_collision(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_coincident_bodies_use_distance_floor() {
        let normal = collision_normal(Vec2::ZERO, Vec2::ZERO);
        assert!(normal.is_finite());
        assert_eq!(normal, Vec2::ZERO);

        let mut a = Body::default();
        let mut b = Body::default();
        let overlap = resolve_overlap(&mut a, &mut b, 10.0);
        assert_eq!(overlap, 9.0);
        assert!(a.position.is_finite() && b.position.is_finite());
    }

    #[test]
    fn test_resolve_overlap_splits_evenly() {
        let mut a = Body::new(Vec2::ZERO, 0.0);
        let mut b = Body::new(Vec2::new(40.0, 0.0), 0.0);
        assert_eq!(resolve_overlap(&mut a, &mut b, 48.0), 8.0);
        assert!((a.position.x + 4.0).abs() < EPS);
        assert!((b.position.x - 44.0).abs() < EPS);

        // Already apart
        assert_eq!(resolve_overlap(&mut a, &mut b, 10.0), 0.0);
    }

    #[test]
    fn test_collision_response_reflects() {
        let mut body = Body::default().with_velocity(Vec2::new(10.0, 0.0));
        apply_collision_response(&mut body, Vec2::new(1.0, 0.0), 0.8);
        assert!((body.velocity.x + 8.0).abs() < EPS);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_impact_magnitude() {
        let a = Body::default().with_velocity(Vec2::new(100.0, 0.0)).with_mass(2.0);
        let b = Body::default().with_velocity(Vec2::new(-100.0, 0.0)).with_mass(0.0);
        // 200 relative speed, massless body counts as 1
        assert!((impact_magnitude(&a, &b) - 60.0).abs() < EPS);
    }
}
