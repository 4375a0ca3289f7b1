//! Static obstacles: walls, holes, speed tiles and spawners
//!
//! Only walls and player lines are rigid colliders (see [`Collidable`]).
//! Holes and speed tiles act through continuous forces and are driven
//! separately by the tick.

use glam::{IVec2, Vec2};

use super::ball::{Ball, BallColor};
use super::collision::{circle_rect_collision, reflect_velocity};
use crate::consts::*;
use crate::{cell_center, cell_origin};

/// Response a collider asks the tick to apply to a ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEffect {
    /// Positional correction
    pub push: Vec2,
    /// Velocity after the bounce
    pub velocity: Vec2,
    /// New colour, if the collider recolours the ball
    pub recolor: Option<BallColor>,
}

impl CollisionEffect {
    pub fn apply(&self, ball: &mut Ball) {
        ball.pos += self.push;
        ball.vel = self.velocity;
        if let Some(color) = self.recolor {
            ball.color = color;
        }
    }
}

/// Anything offering a discrete bounce
pub trait Collidable {
    /// Test `ball` and return the response on contact. Colliders with
    /// internal state (one-shot lines) update it here.
    fn resolve(&mut self, ball: &Ball) -> Option<CollisionEffect>;

    /// Test and apply in one go. Returns true on collision.
    fn check_collision(&mut self, ball: &mut Ball) -> bool {
        match self.resolve(ball) {
            Some(effect) => {
                effect.apply(ball);
                true
            }
            None => false,
        }
    }
}

/// A unit-cell wall
#[derive(Debug, Clone)]
pub struct Wall {
    pub cell: IVec2,
    /// Non-grey walls repaint balls that touch them
    pub color: BallColor,
}

impl Wall {
    pub fn new(cell: IVec2, color: BallColor) -> Self {
        Self { cell, color }
    }

    pub fn min(&self) -> Vec2 {
        cell_origin(self.cell)
    }

    pub fn max(&self) -> Vec2 {
        cell_origin(self.cell) + Vec2::splat(CELL_SIZE)
    }
}

impl Collidable for Wall {
    fn resolve(&mut self, ball: &Ball) -> Option<CollisionEffect> {
        let contact = circle_rect_collision(ball.pos, ball.radius, self.min(), self.max(), ball.vel);
        if !contact.hit {
            return None;
        }

        // Half-depth correction; neighbouring cells take care of the rest
        let push = contact.normal * (contact.penetration / 2.0);
        let recolor = (!self.color.is_neutral() && self.color != ball.color).then_some(self.color);

        Some(CollisionEffect {
            push,
            velocity: reflect_velocity(ball.vel, contact.normal),
            recolor,
        })
    }
}

/// Reported by a hole when it swallows a ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    pub ball_id: u32,
    pub ball_color: BallColor,
    pub hole_color: BallColor,
}

/// A 2×2 attracting hole. `cell` is the top-left cell of its footprint.
#[derive(Debug, Clone)]
pub struct Hole {
    pub cell: IVec2,
    pub color: BallColor,
}

impl Hole {
    pub fn new(cell: IVec2, color: BallColor) -> Self {
        Self { cell, color }
    }

    /// The footprint's inner corner
    pub fn center(&self) -> Vec2 {
        cell_origin(self.cell + IVec2::ONE)
    }

    /// Cells covered by the footprint besides the anchor
    pub fn covered_cells(&self) -> [IVec2; 3] {
        [
            self.cell + IVec2::new(1, 0),
            self.cell + IVec2::new(0, 1),
            self.cell + IVec2::new(1, 1),
        ]
    }

    /// Pull `ball` toward the centre and shrink it. `index` identifies this
    /// hole so only the hole that shrank a ball resets it on exit.
    ///
    /// Returns the capture when the ball is swallowed; the ball is flagged
    /// captured and the caller settles the score.
    pub fn attract(&self, index: usize, ball: &mut Ball) -> Option<Capture> {
        if ball.captured {
            return None;
        }

        let delta = self.center() - ball.pos;
        let dist = delta.length();

        if dist > HOLE_ATTRACT_RADIUS {
            if ball.attractor == Some(index) {
                ball.reset_size();
                ball.attractor = None;
            }
            return None;
        }

        ball.attractor = Some(index);
        ball.apply_attraction(delta * HOLE_ATTRACTION_FORCE);
        ball.adjust_size(dist, HOLE_ATTRACT_RADIUS);

        if dist < HOLE_CAPTURE_DISTANCE || ball.radius <= HOLE_CAPTURE_RADIUS {
            ball.captured = true;
            return Some(Capture {
                ball_id: ball.id,
                ball_color: ball.color,
                hole_color: self.color,
            });
        }
        None
    }
}

/// Speed tile direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Parse a layout symbol (`^`, `v`, `<`, `>`)
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '^' => Some(Direction::Up),
            'v' => Some(Direction::Down),
            '<' => Some(Direction::Left),
            '>' => Some(Direction::Right),
            _ => None,
        }
    }

    /// Whether `vel` already heads this way
    pub fn aligned_with(self, vel: Vec2) -> bool {
        match self {
            Direction::Up => vel.y < 0.0,
            Direction::Down => vel.y > 0.0,
            Direction::Left => vel.x < 0.0,
            Direction::Right => vel.x > 0.0,
        }
    }
}

/// Booster tile: speeds up balls already moving its way
#[derive(Debug, Clone)]
pub struct SpeedTile {
    pub cell: IVec2,
    pub direction: Direction,
}

impl SpeedTile {
    pub fn new(cell: IVec2, direction: Direction) -> Self {
        Self { cell, direction }
    }

    pub fn center(&self) -> Vec2 {
        cell_center(self.cell)
    }

    /// Radial proximity test against the tile centre
    pub fn is_near(&self, ball: &Ball) -> bool {
        self.center().distance(ball.pos) <= SPEED_TILE_RADIUS
    }

    /// Scale both velocity components when the ball already moves the
    /// tile's way. Returns whether a boost was applied.
    pub fn apply_speed_boost(&self, ball: &mut Ball) -> bool {
        if !ball.can_accelerate() || !self.direction.aligned_with(ball.vel) {
            return false;
        }
        ball.vel *= SPEED_TILE_FACTOR;
        true
    }
}

/// Ball entry point
#[derive(Debug, Clone)]
pub struct Spawner {
    pub cell: IVec2,
}

impl Spawner {
    pub fn new(cell: IVec2) -> Self {
        Self { cell }
    }

    pub fn spawn_pos(&self) -> Vec2 {
        cell_center(self.cell)
    }
}
