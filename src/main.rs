//! Inkball headless runner
//!
//! Loads a config and its layouts, then runs the simulation with no player
//! input for a fixed number of ticks, logging progress.
//!
//! Usage: `inkball [config.json] [ticks] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};

    use inkball::consts::TICK_RATE;
    use inkball::sim::{GamePhase, GameState, TickInput, tick};
    use inkball::{ConfigError, GameConfig, LayoutDir};

    const DEFAULT_CONFIG: &str = "demos/config.json";
    const DEFAULT_SEED: u64 = 12345;

    struct Args {
        config: PathBuf,
        ticks: u64,
        seed: u64,
    }

    fn parse_args() -> Args {
        let mut args = std::env::args().skip(1);
        let config = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
        let ticks = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30 * TICK_RATE as u64);
        let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_SEED);
        Args { config, ticks, seed }
    }

    fn load(path: &Path, seed: u64) -> Result<GameState, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = GameConfig::from_json(&json)?;
        let layouts = LayoutDir::new(path.parent().unwrap_or(Path::new(".")));
        log::info!(
            "Loaded {} levels from {} (layouts in {})",
            config.levels.len(),
            path.display(),
            layouts.root().display()
        );
        GameState::new(&config, &layouts, seed)
    }

    pub fn run() -> Result<(), ConfigError> {
        let args = parse_args();
        let mut state = load(&args.config, args.seed)?;
        log::info!("Running {} ticks with seed {}", args.ticks, args.seed);

        let input = TickInput::default();
        let mut last_phase = state.phase();
        for n in 1..=args.ticks {
            tick(&mut state, &input);

            let phase = state.phase();
            if phase != last_phase {
                log::info!(
                    "tick {}: {:?} -> {:?} (level {}, score {})",
                    n,
                    last_phase,
                    phase,
                    state.level_index,
                    state.score()
                );
                last_phase = phase;
            }
            if n % TICK_RATE as u64 == 0 {
                log::debug!(
                    "tick {}: level {}, {} s left, {} balls, {} queued, score {}",
                    n,
                    state.level_index,
                    state.time_remaining_secs(),
                    state.balls.len(),
                    state.queue.len(),
                    state.score()
                );
            }
            if phase == GamePhase::GameOver {
                break;
            }
        }

        log::info!(
            "Finished: level {}, phase {:?}, score {}",
            state.level_index,
            state.phase(),
            state.score()
        );
        if let Some(banner) = state.banner() {
            log::info!("{}", banner);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Inkball (headless) starting...");

    if let Err(e) = native::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the wasm surface; there is no wasm runner
}
