//! Inkball - tick-based simulation core for a ball-and-hole puzzle game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (balls, obstacles, player lines, level state machine)
//! - `config`: Level and score configuration, layout sources

pub mod config;
pub mod sim;

pub use config::{ConfigError, GameConfig, LayoutDir, LayoutSource, LevelConfig};

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second). Physics is per-tick, not per-second.
    pub const TICK_RATE: u32 = 30;

    /// Board geometry
    pub const CELL_SIZE: f32 = 32.0;
    pub const BOARD_WIDTH: i32 = 18;
    pub const BOARD_HEIGHT: i32 = 18;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 12.0;
    pub const BALL_MIN_RADIUS: f32 = 0.5;
    /// Exponent applied to distance/maxDistance while shrinking toward a hole
    pub const BALL_SHRINK_EASING: f32 = 2.0;
    /// Per-axis speed at spawn (2 px/tick at 30 Hz)
    pub const BALL_SPAWN_SPEED: f32 = 60.0 / TICK_RATE as f32;
    /// Speed tiles stop boosting once either axis exceeds this
    pub const BALL_MAX_AXIS_SPEED: f32 = 4.0;

    /// Hole attraction
    pub const HOLE_ATTRACT_RADIUS: f32 = 32.0;
    pub const HOLE_ATTRACTION_FORCE: f32 = 0.005;
    pub const HOLE_CAPTURE_DISTANCE: f32 = 1.0;
    pub const HOLE_CAPTURE_RADIUS: f32 = 4.0;

    /// Speed tiles
    pub const SPEED_TILE_RADIUS: f32 = 25.0;
    pub const SPEED_TILE_FACTOR: f32 = 1.05;

    /// Player lines
    pub const LINE_THICKNESS: f32 = 10.0;

    /// Win animation step interval (ticks, ~0.067 s)
    pub const WIN_ANIMATION_INTERVAL: f32 = 0.067 * TICK_RATE as f32;
    /// Level-timer ticks burned per frame while the win animation plays
    pub const WIN_ANIMATION_TIMER_BURN: i32 = TICK_RATE as i32 / 2;
}

/// Convert a duration in seconds to whole simulation ticks
#[inline]
pub fn secs_to_ticks(secs: f32) -> f32 {
    secs * consts::TICK_RATE as f32
}

/// Top-left corner of a cell in board space
#[inline]
pub fn cell_origin(cell: IVec2) -> Vec2 {
    cell.as_vec2() * consts::CELL_SIZE
}

/// Centre of a cell in board space
#[inline]
pub fn cell_center(cell: IVec2) -> Vec2 {
    cell_origin(cell) + Vec2::splat(consts::CELL_SIZE / 2.0)
}

/// Whether a cell coordinate lies on the board
#[inline]
pub fn in_bounds(cell: IVec2) -> bool {
    cell.x >= 0 && cell.y >= 0 && cell.x < consts::BOARD_WIDTH && cell.y < consts::BOARD_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_center() {
        assert_eq!(cell_center(IVec2::new(0, 0)), Vec2::new(16.0, 16.0));
        assert_eq!(cell_center(IVec2::new(2, 3)), Vec2::new(80.0, 112.0));
    }

    #[test]
    fn test_in_bounds() {
        assert!(in_bounds(IVec2::ZERO));
        assert!(in_bounds(IVec2::new(17, 17)));
        assert!(!in_bounds(IVec2::new(18, 0)));
        assert!(!in_bounds(IVec2::new(0, -1)));
    }

    #[test]
    fn test_secs_to_ticks() {
        assert_eq!(secs_to_ticks(5.0), 150.0);
        assert_eq!(secs_to_ticks(0.5), 15.0);
    }
}
