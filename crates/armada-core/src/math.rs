//! Math utilities
//!
//! Re-exports from glam and the scalar, vector, angle and random helpers the
//! combat simulation is built on. Everything here is a pure function.

use std::f32::consts::{PI, TAU};

use rand::Rng;

pub use glam::Vec2;

/// Axis-aligned rectangle in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    /// Create a rectangle from its corner and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Get the opposite corner
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Get the center of the rectangle
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Check if a point is inside the rectangle (edges inclusive)
    pub fn contains_point(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }

    /// Check if this rectangle overlaps another (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// Circle in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center of the circle
    pub center: Vec2,
    /// Radius of the circle
    pub radius: f32,
}

impl Circle {
    /// Create a new circle
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if a point is strictly inside the circle
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.distance_squared(self.center) < self.radius * self.radius
    }

    /// Check if this circle overlaps another
    pub fn intersects(&self, other: &Circle) -> bool {
        let radius_sum = self.radius + other.radius;
        self.center.distance_squared(other.center) < radius_sum * radius_sum
    }
}

/// Clamp a value into `[min, max]`
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Inverse linear interpolation
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        0.0
    } else {
        (value - a) / (b - a)
    }
}

/// Remap a value from one range to another
pub fn remap(value: f32, from_min: f32, from_max: f32, to_min: f32, to_max: f32) -> f32 {
    let t = inverse_lerp(from_min, from_max, value);
    lerp(to_min, to_max, t)
}

/// Smoothstep interpolation
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Length of a 2D vector
pub fn magnitude(v: Vec2) -> f32 {
    v.length()
}

/// Unit vector in the direction of `v`; the zero vector stays zero
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Scalar z-component of the 2D cross product
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Rotate a vector counter-clockwise by `angle` radians
pub fn rotate_vector(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Unit vector pointing along `angle`
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Euclidean distance between two points
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Angle of the line from `from` to `to`
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Wrap an angle into `[-PI, PI]`
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return angle;
    }
    let mut wrapped = angle % TAU;
    if wrapped > PI {
        wrapped -= TAU;
    } else if wrapped < -PI {
        wrapped += TAU;
    }
    wrapped
}

/// Wrap an angle into `[0, 2*PI)`
pub fn normalize_angle_positive(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Shortest signed angular difference from `from` to `to`, in `[-PI, PI]`
pub fn angle_difference(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Convert degrees to radians
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Convert radians to degrees
pub fn rad_to_deg(radians: f32) -> f32 {
    radians.to_degrees()
}

/// Random float in `[min, max)`; returns `min` for an empty range
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..max)
}

/// Random integer in `[min, max]`
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Random element of a slice
pub fn random_element<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        Some(&items[rng.gen_range(0..items.len())])
    }
}

/// Random boolean that is true with the given probability
pub fn random_bool<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    rng.gen_bool(probability.clamp(0.0, 1.0))
}

/// Random sign, -1 or 1
pub fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.gen_bool(0.5) { -1.0 } else { 1.0 }
}

/// Uniformly distributed random point inside a circle of the given radius
pub fn random_in_circle<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    // sqrt keeps the distribution uniform over the area
    let r = rng.gen_range(0.0f32..1.0).sqrt() * radius;
    direction(angle) * r
}

/// Random point on the circumference of a circle
pub fn random_on_circle<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec2 {
    direction(rng.gen_range(0.0..TAU)) * radius
}

/// Random point between an inner and an outer radius
pub fn random_in_ring<R: Rng + ?Sized>(rng: &mut R, inner_radius: f32, outer_radius: f32) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    let r = random_range(rng, inner_radius, outer_radius);
    direction(angle) * r
}

/// Quadratic ease-in
pub fn ease_in_quad(t: f32) -> f32 {
    t * t
}

/// Quadratic ease-out
pub fn ease_out_quad(t: f32) -> f32 {
    t * (2.0 - t)
}

/// Quadratic ease-in-out
pub fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// Cubic ease-out
pub fn ease_out_cubic(t: f32) -> f32 {
    let u = t - 1.0;
    u * u * u + 1.0
}

/// Check if a point lies strictly inside a circle
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    Circle::new(center, radius).contains_point(point)
}

/// Check if two circles overlap
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    Circle::new(a, radius_a).intersects(&Circle::new(b, radius_b))
}

/// Check if a point lies inside a rectangle
pub fn point_in_rect(point: Vec2, rect: &Rect) -> bool {
    rect.contains_point(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
    }

    #[test]
    fn test_inverse_lerp() {
        assert_eq!(inverse_lerp(0.0, 10.0, 5.0), 0.5);
        assert_eq!(inverse_lerp(3.0, 3.0, 5.0), 0.0);
    }

    #[test]
    fn test_remap() {
        assert_eq!(remap(5.0, 0.0, 10.0, 0.0, 100.0), 50.0);
    }

    #[test]
    fn test_smoothstep() {
        assert_eq!(smoothstep(0.0, 1.0, 0.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 1.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
        assert!((normalize(Vec2::new(3.0, 4.0)).length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cross_and_rotate() {
        assert_eq!(cross(Vec2::X, Vec2::Y), 1.0);
        let rotated = rotate_vector(Vec2::X, PI / 2.0);
        assert!(rotated.x.abs() < 1e-6);
        assert!((rotated.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        assert_eq!(normalize_angle(0.5), 0.5);
        assert!((normalize_angle_positive(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_angle_difference_takes_short_way() {
        // From just below +PI to just above -PI is a small positive step
        let diff = angle_difference(PI - 0.1, -PI + 0.1);
        assert!((diff - 0.2).abs() < 1e-5);

        let diff = angle_difference(0.0, -PI / 2.0);
        assert!((diff + PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_angle_between() {
        let angle = angle_between(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!((angle - PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_random_helpers_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let v = random_range(&mut rng, 2.0, 3.0);
            assert!((2.0..3.0).contains(&v));

            let i = random_int(&mut rng, -2, 2);
            assert!((-2..=2).contains(&i));

            let p = random_in_circle(&mut rng, 10.0);
            assert!(p.length() <= 10.0 + 1e-4);

            let ring = random_in_ring(&mut rng, 5.0, 6.0);
            assert!(ring.length() >= 5.0 - 1e-4 && ring.length() <= 6.0 + 1e-4);

            let edge = random_on_circle(&mut rng, 4.0);
            assert!((edge.length() - 4.0).abs() < 1e-4);

            assert!(random_sign(&mut rng).abs() == 1.0);
        }
        assert_eq!(random_range(&mut rng, 1.0, 1.0), 1.0);
        assert!(random_element::<u8, _>(&mut rng, &[]).is_none());
        assert_eq!(random_element(&mut rng, &[9]), Some(&9));
    }

    #[test]
    fn test_easing_endpoints() {
        let easings: [fn(f32) -> f32; 4] = [ease_in_quad, ease_out_quad, ease_in_out_quad, ease_out_cubic];
        for f in easings {
            assert!(f(0.0).abs() < 1e-6);
            assert!((f(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_shapes() {
        assert!(point_in_circle(Vec2::new(1.0, 1.0), Vec2::ZERO, 2.0));
        assert!(!point_in_circle(Vec2::new(2.0, 0.0), Vec2::ZERO, 2.0));
        assert!(circles_overlap(Vec2::ZERO, 1.0, Vec2::new(1.5, 0.0), 1.0));
        assert!(!circles_overlap(Vec2::ZERO, 1.0, Vec2::new(5.0, 0.0), 1.0));

        let rect = Rect::new(0.0, 0.0, 10.0, 5.0);
        assert!(point_in_rect(Vec2::new(10.0, 5.0), &rect));
        assert!(!point_in_rect(Vec2::new(11.0, 5.0), &rect));
        assert!(rect.intersects(&Rect::new(9.0, 4.0, 3.0, 3.0)));
        assert!(!rect.intersects(&Rect::new(10.0, 0.0, 3.0, 3.0)));
        assert_eq!(rect.center(), Vec2::new(5.0, 2.5));
    }
}
