//! Level session state
//!
//! Everything a running game needs lives in [`GameState`]: the resolved
//! level list, the current board and its entities, timers, the spawn queue,
//! the score and the state-machine flags. Only the tick and input intents
//! mutate it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::animation::WinAnimation;
use super::ball::{Ball, BallColor};
use super::board::{Board, decode_layout};
use super::line::PlayerLine;
use super::obstacle::{Capture, Hole, Spawner, SpeedTile, Wall};
use super::scoring::{BallQueue, CaptureOutcome, ScoreTable};
use crate::cell_center;
use crate::config::{ConfigError, GameConfig, LayoutSource, LevelConfig};
use crate::consts::TICK_RATE;

/// Current phase of play, derived from the session flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Paused mid-level
    Paused,
    /// Time ran out before the level was cleared
    Ended,
    /// Level cleared, animation not started yet
    Won,
    /// Perimeter animation draining the timer into the score
    Animating,
    /// Past the last level
    GameOver,
}

/// Borrowed view of one live entity, for presentation
#[derive(Debug, Clone, Copy)]
pub enum EntityView<'a> {
    Wall(&'a Wall),
    Hole(&'a Hole),
    SpeedTile(&'a SpeedTile),
    Spawner(&'a Spawner),
    Ball(&'a Ball),
    Line(&'a PlayerLine),
}

/// A level with its layout text already resolved
#[derive(Debug, Clone)]
pub struct Level {
    pub config: LevelConfig,
    pub layout: String,
}

/// Complete session state (deterministic for a given seed and input)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed
    pub seed: u64,
    rng: Pcg32,
    levels: Vec<Level>,
    scores: ScoreTable,

    /// Index of the current level; equals the level count once game over
    pub level_index: usize,
    /// Ticks left on the level clock
    pub level_timer: i32,
    pub queue: BallQueue,
    pub score: i64,

    pub ended: bool,
    pub won: bool,
    pub game_over: bool,
    pub paused: bool,
    /// Win animation running
    pub animating: bool,
    /// Level timer captured at the moment of winning
    pub time_bonus: i32,
    pub animation: WinAnimation,

    pub board: Board,
    pub walls: Vec<Wall>,
    pub holes: Vec<Hole>,
    pub speed_tiles: Vec<SpeedTile>,
    pub spawners: Vec<Spawner>,
    /// Live balls, in spawn order
    pub balls: Vec<Ball>,
    /// Committed player lines, in draw order
    pub lines: Vec<PlayerLine>,
    /// Line being drawn; not yet a collider
    pub current_line: Option<PlayerLine>,

    next_id: u32,
}

impl GameState {
    /// Build a session and load the first level
    ///
    /// Every layout is resolved up front, so this is the only fallible
    /// step; later level loads cannot fail.
    pub fn new(config: &GameConfig, layouts: &dyn LayoutSource, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let levels = config
            .levels
            .iter()
            .map(|level| {
                Ok(Level {
                    config: level.clone(),
                    layout: layouts.layout(&level.layout)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            levels,
            scores: ScoreTable::from_config(config),
            level_index: 0,
            level_timer: 0,
            queue: BallQueue::default(),
            score: 0,
            ended: false,
            won: false,
            game_over: false,
            paused: false,
            animating: false,
            time_bonus: 0,
            animation: WinAnimation::new(),
            board: Board::new(),
            walls: Vec::new(),
            holes: Vec::new(),
            speed_tiles: Vec::new(),
            spawners: Vec::new(),
            balls: Vec::new(),
            lines: Vec::new(),
            current_line: None,
            next_id: 1,
        };
        state.load_level(0);
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Config of the level in play, `None` once game over
    pub fn current_level(&self) -> Option<&LevelConfig> {
        self.levels.get(self.level_index).map(|level| &level.config)
    }

    /// Rebuild the board and reset timers for level `index`.
    /// An index past the last level ends the game.
    pub fn load_level(&mut self, index: usize) {
        self.level_index = index;
        self.lines.clear();
        self.current_line = None;
        self.animating = false;
        self.animation = WinAnimation::new();

        let Some(level) = self.levels.get(index) else {
            self.game_over = true;
            log::info!("No level {}, game over with score {}", index, self.score);
            return;
        };

        let layout = decode_layout(&level.layout);
        let colors: Vec<BallColor> = level.config.balls.iter().map(|name| BallColor::from_name(name)).collect();
        self.level_timer = level.config.time_ticks();
        self.queue = BallQueue::new(colors, level.config.spawn_interval_ticks());
        log::info!(
            "Loaded level {} ({}): {} walls, {} holes, {} spawners, {} balls queued",
            index,
            level.config.layout,
            layout.walls.len(),
            layout.holes.len(),
            layout.spawners.len(),
            self.queue.len()
        );

        self.board = layout.board;
        self.walls = layout.walls;
        self.holes = layout.holes;
        self.speed_tiles = layout.speed_tiles;
        self.spawners = layout.spawners;
        self.balls.clear();
        for (cell, color) in layout.balls {
            let id = self.next_entity_id();
            let ball = Ball::spawn(id, cell_center(cell), color, &mut self.rng);
            self.balls.push(ball);
        }

        self.ended = false;
        self.won = false;
        self.time_bonus = 0;

        self.spawn_next_ball();
    }

    /// Pop the queue head and emit it from a random spawner. The colour is
    /// consumed even when the level has no spawners.
    pub fn spawn_next_ball(&mut self) {
        let Some(color) = self.queue.pop() else {
            return;
        };
        if self.spawners.is_empty() {
            log::debug!("No spawner for {} ball, dropped", color.name());
            return;
        }

        let index = self.rng.random_range(0..self.spawners.len());
        let pos = self.spawners[index].spawn_pos();
        let id = self.next_entity_id();
        let ball = Ball::spawn(id, pos, color, &mut self.rng);
        log::debug!("Spawned {} ball {} at {:?}", color.name(), id, pos);
        self.balls.push(ball);
    }

    /// Apply the score consequences of a capture
    pub fn settle_capture(&mut self, capture: &Capture) {
        let Some(level) = self.levels.get(self.level_index) else {
            return;
        };
        let outcome = self.scores.settle(capture, &level.config);
        self.score = outcome.apply(self.score);
        match outcome {
            CaptureOutcome::Scored(gain) => {
                log::debug!("Ball {} captured: +{}", capture.ball_id, gain);
            }
            CaptureOutcome::Missed { penalty, respawn } => {
                log::debug!(
                    "Ball {} in wrong hole: -{}, {} requeued",
                    capture.ball_id,
                    penalty,
                    respawn.name()
                );
                self.queue.respawn(respawn);
            }
        }
    }

    /// Reload the current level, or start over from the first one after
    /// game over. The score carries over unless the game was over.
    pub fn restart(&mut self) {
        let index = if self.game_over {
            self.game_over = false;
            self.score = 0;
            0
        } else {
            self.level_index
        };
        self.paused = false;
        log::info!("Restarting at level {}", index);
        self.load_level(index);
    }

    pub fn phase(&self) -> GamePhase {
        if self.game_over {
            GamePhase::GameOver
        } else if self.animating {
            GamePhase::Animating
        } else if self.won {
            GamePhase::Won
        } else if self.ended {
            GamePhase::Ended
        } else if self.paused {
            GamePhase::Paused
        } else {
            GamePhase::Playing
        }
    }

    /// Overlay text for the current phase, if any
    pub fn banner(&self) -> Option<&'static str> {
        if self.game_over {
            Some("=== ENDED ===")
        } else if self.ended && !self.won {
            Some("=== TIME'S UP ===")
        } else if self.paused {
            Some("*** PAUSED ***")
        } else {
            None
        }
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn level_timer(&self) -> i32 {
        self.level_timer
    }

    /// Whole seconds left on the level clock
    pub fn time_remaining_secs(&self) -> i32 {
        self.level_timer.max(0) / TICK_RATE as i32
    }

    /// Pending ball colours, next to spawn first
    pub fn queue(&self) -> impl Iterator<Item = BallColor> + '_ {
        self.queue.colors()
    }

    pub fn spawn_countdown_secs(&self) -> f32 {
        self.queue.spawn_timer() / TICK_RATE as f32
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Every live entity in draw order: obstacles, balls, then lines.
    /// Captured balls and spent lines are left out.
    pub fn entities(&self) -> impl Iterator<Item = EntityView<'_>> + '_ {
        let walls = self.walls.iter().map(EntityView::Wall);
        let holes = self.holes.iter().map(EntityView::Hole);
        let tiles = self.speed_tiles.iter().map(EntityView::SpeedTile);
        let spawners = self.spawners.iter().map(EntityView::Spawner);
        let balls = self.balls.iter().filter(|b| !b.captured).map(EntityView::Ball);
        let lines = self
            .lines
            .iter()
            .chain(self.current_line.iter())
            .filter(|l| !l.has_collided())
            .map(EntityView::Line);
        walls.chain(holes).chain(tiles).chain(spawners).chain(balls).chain(lines)
    }

    /// Push a ball directly onto the board
    pub fn add_ball(&mut self, pos: Vec2, vel: Vec2, color: BallColor) -> u32 {
        let id = self.next_entity_id();
        self.balls.push(Ball::new(id, pos, vel, color));
        id
    }
}
