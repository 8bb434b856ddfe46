//! Collision primitives
//!
//! Narrow-phase tests between the ball (a circle) and rectangular bricks,
//! the bat and projectiles, plus the reflection used for bounces.

use glam::Vec2;

use super::geometry::Rect;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Collision point on the rectangle surface (if hit)
    pub point: Vec2,
    /// Axis-aligned contact normal pointing from the rectangle toward the ball
    pub normal: Vec2,
    /// Penetration depth along `normal` (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    /// True when the contact normal is horizontal (ball hit a side face)
    pub fn is_horizontal(&self) -> bool {
        self.normal.x != 0.0
    }
}

/// Check collision between a circle and an axis-aligned rectangle
///
/// Collision iff the closest point on the rectangle lies within `radius` of
/// the center (boundary inclusive). The normal is snapped to the axis of
/// penetration so bounces flip exactly one velocity component.
pub fn circle_rect_collision(center: Vec2, radius: f32, rect: &Rect) -> CollisionResult {
    if rect.is_empty() {
        return CollisionResult::miss();
    }

    let closest = rect.closest_point(center);
    let delta = center - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > radius * radius {
        return CollisionResult::miss();
    }

    if dist_sq > 0.0 {
        // Center outside the rectangle: use the dominant axis of separation
        let (normal, depth) = if delta.x.abs() > delta.y.abs() {
            (Vec2::new(delta.x.signum(), 0.0), delta.x.abs())
        } else {
            (Vec2::new(0.0, delta.y.signum()), delta.y.abs())
        };
        return CollisionResult {
            hit: true,
            point: closest,
            normal,
            penetration: radius - depth,
        };
    }

    // Center inside the rectangle (tunneling): push out through the nearest face
    let to_left = center.x - rect.left();
    let to_right = rect.right() - center.x;
    let to_top = center.y - rect.top();
    let to_bottom = rect.bottom() - center.y;

    let mut best = (Vec2::NEG_X, to_left, Vec2::new(rect.left(), center.y));
    if to_right < best.1 {
        best = (Vec2::X, to_right, Vec2::new(rect.right(), center.y));
    }
    if to_top < best.1 {
        best = (Vec2::NEG_Y, to_top, Vec2::new(center.x, rect.top()));
    }
    if to_bottom < best.1 {
        best = (Vec2::Y, to_bottom, Vec2::new(center.x, rect.bottom()));
    }

    CollisionResult {
        hit: true,
        point: best.2,
        normal: best.0,
        penetration: best.1 + radius,
    }
}

/// Standard distance-sum test between two circles
#[inline]
pub fn circle_circle_collision(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    (a - b).length_squared() <= r * r
}

/// Overlap between two rectangles
#[inline]
pub fn rect_rect_collision(a: &Rect, b: &Rect) -> bool {
    a.overlaps(b)
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Reflect and re-normalize to `speed`
///
/// Bounces never keep the incoming magnitude: the caller passes the ball's
/// current accelerated speed so acceleration is applied exactly once.
pub fn bounce(velocity: Vec2, normal: Vec2, speed: f32) -> Vec2 {
    let reflected = if velocity.dot(normal) < 0.0 {
        reflect_velocity(velocity, normal)
    } else {
        // Already separating along the normal
        velocity
    };
    let dir = reflected.normalize_or_zero();
    if dir == Vec2::ZERO {
        normal * speed
    } else {
        dir * speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_rect_hit_from_above() {
        let rect = Rect::new(100.0, 100.0, 60.0, 20.0);
        let result = circle_rect_collision(Vec2::new(130.0, 94.0), 8.0, &rect);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(0.0, -1.0));
        assert!((result.penetration - 2.0).abs() < 0.001);
        assert_eq!(result.point, Vec2::new(130.0, 100.0));
    }

    #[test]
    fn test_circle_rect_hit_from_side() {
        let rect = Rect::new(100.0, 100.0, 60.0, 20.0);
        let result = circle_rect_collision(Vec2::new(165.0, 110.0), 8.0, &rect);
        assert!(result.hit);
        assert!(result.is_horizontal());
        assert_eq!(result.normal, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_circle_rect_boundary_inclusive() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let result = circle_rect_collision(Vec2::new(18.0, 5.0), 8.0, &rect);
        assert!(result.hit);
        assert!(result.penetration.abs() < 0.001);

        let result = circle_rect_collision(Vec2::new(18.01, 5.0), 8.0, &rect);
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_inside_rect_pushes_through_nearest_face() {
        let rect = Rect::new(0.0, 0.0, 100.0, 20.0);
        let result = circle_rect_collision(Vec2::new(50.0, 3.0), 8.0, &rect);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(0.0, -1.0));
        assert!((result.penetration - 11.0).abs() < 0.001);
    }

    #[test]
    fn test_circle_circle() {
        assert!(circle_circle_collision(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
        assert!(!circle_circle_collision(Vec2::ZERO, 5.0, Vec2::new(10.1, 0.0), 5.0));
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_bounce_uses_given_speed() {
        let v = Vec2::new(30.0, 40.0);
        let out = bounce(v, Vec2::new(0.0, -1.0), 500.0);
        assert!((out.length() - 500.0).abs() < 0.01);
        assert!(out.y < 0.0);
        assert!((out.x / out.length() - 0.6).abs() < 0.001);
    }
}
