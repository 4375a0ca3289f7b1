//! Player-drawn ink lines

use glam::Vec2;

use super::ball::Ball;
use super::collision::{reflect_velocity, segment_normal_facing, segment_overlaps};
use super::obstacle::{Collidable, CollisionEffect};
use crate::consts::LINE_THICKNESS;

/// A polyline drawn by the player. Bounces one ball, then goes inert.
#[derive(Debug, Clone, Default)]
pub struct PlayerLine {
    points: Vec<Vec2>,
    collided: bool,
}

impl PlayerLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a line at `p`
    pub fn starting_at(p: Vec2) -> Self {
        Self {
            points: vec![p],
            collided: false,
        }
    }

    pub fn add_point(&mut self, p: Vec2) {
        self.points.push(p);
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Inert lines neither collide nor render
    pub fn has_collided(&self) -> bool {
        self.collided
    }

    /// Hit-test for erasure: any stored point within half the stroke width
    pub fn contains_point(&self, p: Vec2) -> bool {
        self.points
            .iter()
            .any(|q| q.distance(p) < LINE_THICKNESS / 2.0)
    }
}

impl Collidable for PlayerLine {
    /// Predictive: tests where the ball will be next tick, not where it is
    fn resolve(&mut self, ball: &Ball) -> Option<CollisionEffect> {
        if self.collided || self.points.len() < 2 {
            return None;
        }

        let next = ball.next_pos();
        for seg in self.points.windows(2) {
            let (p1, p2) = (seg[0], seg[1]);
            if p1 == p2 || !segment_overlaps(p1, p2, next, ball.radius) {
                continue;
            }

            let normal = segment_normal_facing(p1, p2, ball.pos);
            self.collided = true;
            return Some(CollisionEffect {
                push: Vec2::ZERO,
                velocity: reflect_velocity(ball.vel, normal),
                recolor: None,
            });
        }
        None
    }
}
