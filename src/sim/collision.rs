//! Collision geometry for circles against cells and line segments
//!
//! Walls are unit cells (axis-aligned squares). Player lines are polylines,
//! tested predictively against the ball's next position.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the obstacle surface
    pub point: Vec2,
    /// Unit normal pointing from the surface toward the ball centre
    pub normal: Vec2,
    /// Penetration depth (for position correction)
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
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Closest point on an axis-aligned rectangle to `p`
#[inline]
pub fn closest_point_on_rect(p: Vec2, min: Vec2, max: Vec2) -> Vec2 {
    p.clamp(min, max)
}

/// Circle vs axis-aligned rectangle
///
/// A hit needs the squared distance from the centre to the rectangle to be
/// strictly less than radius². When the centre sits inside the rectangle the
/// distance is zero, so the normal falls back to the direction away from the
/// rectangle centre (then against `fallback_dir`), and penetration is the
/// full radius.
pub fn circle_rect_collision(
    center: Vec2,
    radius: f32,
    min: Vec2,
    max: Vec2,
    fallback_dir: Vec2,
) -> CollisionResult {
    let closest = closest_point_on_rect(center, min, max);
    let offset = center - closest;
    let dist_sq = offset.length_squared();

    if dist_sq >= radius * radius {
        return CollisionResult::miss();
    }

    if dist_sq > 0.0 {
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: offset / dist,
            penetration: radius - dist,
        };
    }

    let mut normal = (center - (min + max) * 0.5).normalize_or_zero();
    if normal == Vec2::ZERO {
        normal = -fallback_dir.normalize_or_zero();
    }
    if normal == Vec2::ZERO {
        normal = Vec2::NEG_Y;
    }
    CollisionResult {
        hit: true,
        point: closest,
        normal,
        penetration: radius,
    }
}

/// Sum-of-distances overlap test between a segment and a circle at `pos`.
///
/// Approximate: the point lies inside an ellipse with foci at the segment
/// ends whose major axis is the segment length plus the radius.
#[inline]
pub fn segment_overlaps(p1: Vec2, p2: Vec2, pos: Vec2, radius: f32) -> bool {
    p1.distance(pos) + p2.distance(pos) < p1.distance(p2) + radius
}

/// Unit normal of the segment on the side facing `toward`
///
/// Of the two perpendiculars, picks the one whose offset from the segment
/// midpoint lands closer to `toward`. Zero for degenerate segments.
pub fn segment_normal_facing(p1: Vec2, p2: Vec2, toward: Vec2) -> Vec2 {
    let n1 = (p2 - p1).perp().normalize_or_zero();
    if n1 == Vec2::ZERO {
        return Vec2::ZERO;
    }
    let n2 = -n1;
    let mid = (p1 + p2) * 0.5;
    if (mid + n1).distance(toward) < (mid + n2).distance(toward) {
        n1
    } else {
        n2
    }
}
