//! Ball entity and colours

use glam::Vec2;
use rand::Rng;

use crate::consts::*;

/// Ball and obstacle colours. `Grey` is neutral: it matches any hole and
/// walls of this colour never recolour a ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BallColor {
    #[default]
    Grey,
    Orange,
    Blue,
    Green,
    Yellow,
}

impl BallColor {
    /// Colour for a layout digit value
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(BallColor::Grey),
            1 => Some(BallColor::Orange),
            2 => Some(BallColor::Blue),
            3 => Some(BallColor::Green),
            4 => Some(BallColor::Yellow),
            _ => None,
        }
    }

    /// Parse a layout digit character ('0'..='4')
    pub fn from_digit(c: char) -> Option<Self> {
        c.to_digit(10).and_then(|d| Self::from_index(d as u8))
    }

    /// Colour from a config name. Unknown names fall back to grey.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "orange" => BallColor::Orange,
            "blue" => BallColor::Blue,
            "green" => BallColor::Green,
            "yellow" => BallColor::Yellow,
            _ => BallColor::Grey,
        }
    }

    /// Lowercase name, as used by score tables
    pub fn name(self) -> &'static str {
        match self {
            BallColor::Grey => "grey",
            BallColor::Orange => "orange",
            BallColor::Blue => "blue",
            BallColor::Green => "green",
            BallColor::Yellow => "yellow",
        }
    }

    pub fn is_neutral(self) -> bool {
        self == BallColor::Grey
    }

    /// Whether a ball of this colour scores in a hole of `hole` colour
    pub fn matches(self, hole: BallColor) -> bool {
        self == hole || self.is_neutral() || hole.is_neutral()
    }
}

/// A ball entity
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: BallColor,
    /// Set by a hole on capture; the tick removes captured balls
    pub captured: bool,
    /// Velocity stashed while paused
    pub saved_vel: Vec2,
    /// Index of the hole currently pulling on this ball
    pub attractor: Option<usize>,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, color: BallColor) -> Self {
        Self {
            id,
            pos,
            vel,
            radius: BALL_RADIUS,
            color,
            captured: false,
            saved_vel: Vec2::ZERO,
            attractor: None,
        }
    }

    /// New ball at `pos` moving diagonally with a random sign on each axis
    pub fn spawn(id: u32, pos: Vec2, color: BallColor, rng: &mut impl Rng) -> Self {
        let sx = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let sy = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        Self::new(id, pos, Vec2::new(sx, sy) * BALL_SPAWN_SPEED, color)
    }

    /// Advance one tick (no-op once captured)
    pub fn move_one_tick(&mut self) {
        if !self.captured {
            self.pos += self.vel;
        }
    }

    /// Additive velocity nudge, unclamped
    pub fn apply_attraction(&mut self, force: Vec2) {
        self.vel += force;
    }

    /// Shrink toward `BALL_MIN_RADIUS` as `distance` approaches zero.
    /// Outside `max_distance` the radius snaps back to the original.
    pub fn adjust_size(&mut self, distance: f32, max_distance: f32) {
        if distance <= max_distance && max_distance > 0.0 {
            let t = (distance / max_distance).powf(BALL_SHRINK_EASING);
            self.radius = BALL_MIN_RADIUS + (BALL_RADIUS - BALL_MIN_RADIUS) * t;
        } else {
            self.radius = BALL_RADIUS;
        }
    }

    /// Restore full size and clear the captured flag
    pub fn reset_size(&mut self) {
        self.radius = BALL_RADIUS;
        self.captured = false;
    }

    /// Speed tiles only boost while both axes are under the cap
    pub fn can_accelerate(&self) -> bool {
        self.vel.x.abs() <= BALL_MAX_AXIS_SPEED && self.vel.y.abs() <= BALL_MAX_AXIS_SPEED
    }

    /// Stash and zero the velocity. Idempotent while already stopped.
    pub fn save_velocity(&mut self) {
        if self.vel != Vec2::ZERO {
            self.saved_vel = self.vel;
            self.vel = Vec2::ZERO;
        }
    }

    /// Restore the stashed velocity. Idempotent while already moving.
    pub fn restore_velocity(&mut self) {
        if self.vel == Vec2::ZERO {
            self.vel = self.saved_vel;
        }
    }

    /// Next-tick position, used by predictive colliders
    #[inline]
    pub fn next_pos(&self) -> Vec2 {
        self.pos + self.vel
    }
}
