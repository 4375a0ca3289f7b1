//! Game configuration
//!
//! Levels and score tables are read from JSON. Layout files are referenced by
//! name and resolved through a [`LayoutSource`] once, when a session is built.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::secs_to_ticks;

/// Errors raised while loading configuration or resolving layouts
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read layout '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("layout '{0}' not found")]
    MissingLayout(String),

    #[error("level {index}: {reason}")]
    InvalidLevel { index: usize, reason: String },
}

/// One level entry from the config file
#[derive(Debug, Clone, Deserialize)]
pub struct LevelConfig {
    /// Layout reference (file name for [`LayoutDir`], key for in-memory maps)
    pub layout: String,
    /// Time limit in seconds
    pub time: u32,
    /// Seconds between spawns
    pub spawn_interval: f32,
    #[serde(rename = "score_increase_from_hole_capture_modifier")]
    pub increase_modifier: f32,
    #[serde(rename = "score_decrease_from_wrong_hole_modifier")]
    pub decrease_modifier: f32,
    /// Ball colours to spawn, in order
    #[serde(default)]
    pub balls: Vec<String>,
}

impl LevelConfig {
    /// Time limit in ticks
    pub fn time_ticks(&self) -> i32 {
        secs_to_ticks(self.time as f32) as i32
    }

    /// Spawn interval in ticks
    pub fn spawn_interval_ticks(&self) -> f32 {
        secs_to_ticks(self.spawn_interval)
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidLevel {
            index,
            reason: reason.to_string(),
        };
        if self.time == 0 {
            return Err(invalid("time limit must be positive"));
        }
        if !self.spawn_interval.is_finite() || self.spawn_interval < 0.0 {
            return Err(invalid("spawn_interval must be a non-negative number"));
        }
        if !self.increase_modifier.is_finite() || !self.decrease_modifier.is_finite() {
            return Err(invalid("score modifiers must be finite"));
        }
        Ok(())
    }
}

/// Whole-game configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameConfig {
    pub levels: Vec<LevelConfig>,
    /// Base score gained per colour on a correct capture
    #[serde(rename = "score_increase_from_hole_capture", default)]
    pub score_increase: HashMap<String, i64>,
    /// Base score lost per colour on a wrong capture
    #[serde(rename = "score_decrease_from_wrong_hole", default)]
    pub score_decrease: HashMap<String, i64>,
}

impl GameConfig {
    /// Parse and validate a config document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every level for values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, level) in self.levels.iter().enumerate() {
            level.validate(index)?;
        }
        Ok(())
    }
}

/// Supplies layout text for a layout reference
pub trait LayoutSource {
    fn layout(&self, reference: &str) -> Result<String, ConfigError>;
}

impl LayoutSource for HashMap<String, String> {
    fn layout(&self, reference: &str) -> Result<String, ConfigError> {
        self.get(reference)
            .cloned()
            .ok_or_else(|| ConfigError::MissingLayout(reference.to_string()))
    }
}

/// Layout files stored under a directory on disk
#[derive(Debug, Clone)]
pub struct LayoutDir {
    root: PathBuf,
}

impl LayoutDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl LayoutSource for LayoutDir {
    fn layout(&self, reference: &str) -> Result<String, ConfigError> {
        let path = self.root.join(reference);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ConfigError::MissingLayout(reference.to_string()))
            }
            Err(source) => Err(ConfigError::Io { path, source }),
        }
    }
}
