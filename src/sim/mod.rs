//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (spawn order for balls, draw order for lines)
//! - No rendering or platform dependencies

pub mod animation;
pub mod ball;
pub mod board;
pub mod collision;
pub mod line;
pub mod obstacle;
pub mod scoring;
pub mod state;
pub mod tick;

pub use animation::{WinAnimation, perimeter_step};
pub use ball::{Ball, BallColor};
pub use board::{Board, Cell, CellObject, Layout, decode_layout};
pub use collision::{CollisionResult, circle_rect_collision, reflect_velocity};
pub use line::PlayerLine;
pub use obstacle::{Capture, Collidable, CollisionEffect, Direction, Hole, Spawner, SpeedTile, Wall};
pub use scoring::{BallQueue, CaptureOutcome, ScoreTable};
pub use state::{EntityView, GamePhase, GameState, Level};
pub use tick::{Intent, TickInput, apply_intent, tick};
