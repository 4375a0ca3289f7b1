//! Capture scoring and the ball spawn queue

use std::collections::{HashMap, VecDeque};

use super::ball::BallColor;
use super::obstacle::Capture;
use crate::config::{GameConfig, LevelConfig};

/// Base score per colour, keyed by lowercase colour name
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    increase: HashMap<String, i64>,
    decrease: HashMap<String, i64>,
}

/// How a capture settles. Amounts are the scaled, untruncated base score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureOutcome {
    /// Right hole (or a neutral party): score goes up
    Scored(f32),
    /// Wrong hole: score goes down and the colour goes back in the queue
    Missed { penalty: f32, respawn: BallColor },
}

impl CaptureOutcome {
    /// Signed change to the running score
    pub fn delta(&self) -> f32 {
        match *self {
            CaptureOutcome::Scored(gain) => gain,
            CaptureOutcome::Missed { penalty, .. } => -penalty,
        }
    }

    /// The running score after this capture. The fractional amount is added
    /// first and the new total is truncated toward zero.
    pub fn apply(&self, score: i64) -> i64 {
        (score as f64 + self.delta() as f64).trunc() as i64
    }
}

fn lowercase_keys(table: &HashMap<String, i64>) -> HashMap<String, i64> {
    table
        .iter()
        .map(|(name, &amount)| (name.to_lowercase(), amount))
        .collect()
}

impl ScoreTable {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            increase: lowercase_keys(&config.score_increase),
            decrease: lowercase_keys(&config.score_decrease),
        }
    }

    /// Base gain for a colour; missing colours score nothing
    pub fn base_increase(&self, color: BallColor) -> i64 {
        self.increase.get(color.name()).copied().unwrap_or(0)
    }

    pub fn base_decrease(&self, color: BallColor) -> i64 {
        self.decrease.get(color.name()).copied().unwrap_or(0)
    }

    /// Settle a capture against the level's modifiers
    pub fn settle(&self, capture: &Capture, level: &LevelConfig) -> CaptureOutcome {
        if capture.ball_color.matches(capture.hole_color) {
            let base = self.base_increase(capture.ball_color);
            CaptureOutcome::Scored(scale(base, level.increase_modifier))
        } else {
            let base = self.base_decrease(capture.ball_color);
            CaptureOutcome::Missed {
                penalty: scale(base, level.decrease_modifier),
                respawn: capture.ball_color,
            }
        }
    }
}

#[inline]
fn scale(base: i64, modifier: f32) -> f32 {
    base as f32 * modifier
}

/// FIFO of pending ball colours with the spawn countdown
#[derive(Debug, Clone, Default)]
pub struct BallQueue {
    colors: VecDeque<BallColor>,
    /// Ticks until the next spawn
    spawn_timer: f32,
    /// Countdown reset value, in ticks
    interval: f32,
}

impl BallQueue {
    pub fn new(colors: impl IntoIterator<Item = BallColor>, interval: f32) -> Self {
        Self {
            colors: colors.into_iter().collect(),
            spawn_timer: interval,
            interval,
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Pending colours, head first
    pub fn colors(&self) -> impl Iterator<Item = BallColor> + '_ {
        self.colors.iter().copied()
    }

    pub fn spawn_timer(&self) -> f32 {
        self.spawn_timer
    }

    pub fn pop(&mut self) -> Option<BallColor> {
        self.colors.pop_front()
    }

    /// Re-append a colour after a wrong capture. When this leaves a single
    /// colour waiting, it spawns on the next countdown step.
    pub fn respawn(&mut self, color: BallColor) {
        self.colors.push_back(color);
        if self.colors.len() == 1 && self.spawn_timer > 0.0 {
            self.spawn_timer = 0.0;
        }
    }

    /// Step the countdown once. Returns true when a spawn is due; the
    /// countdown has then been reset to the interval.
    pub fn countdown(&mut self) -> bool {
        if self.colors.is_empty() {
            return false;
        }
        if self.spawn_timer <= 0.0 {
            self.spawn_timer = self.interval;
            true
        } else {
            self.spawn_timer -= 1.0;
            false
        }
    }
}
