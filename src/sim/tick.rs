//! Fixed timestep simulation tick
//!
//! Advances a [`GameState`] by exactly one frame. The step order is fixed:
//! physics (move, collide, boost, attract, remove), then timers and
//! win/lose checks, then whatever the stopped state calls for, then the
//! win animation.

use glam::Vec2;

use super::animation::WinAnimation;
use super::line::PlayerLine;
use super::obstacle::Collidable;
use super::state::GameState;
use crate::consts::*;

/// Decoded player intent. Coordinates are in board space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    BeginLine(Vec2),
    ExtendLine(Vec2),
    EndLine,
    EraseLine(Vec2),
    TogglePause,
    Restart,
}

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Applied in order before the frame advances
    pub intents: Vec<Intent>,
}

impl TickInput {
    pub fn new(intents: impl IntoIterator<Item = Intent>) -> Self {
        Self {
            intents: intents.into_iter().collect(),
        }
    }
}

/// Apply one player intent
pub fn apply_intent(state: &mut GameState, intent: Intent) {
    match intent {
        Intent::TogglePause => {
            if state.ended || state.game_over {
                return;
            }
            state.paused = !state.paused;
            if !state.paused {
                for ball in &mut state.balls {
                    ball.restore_velocity();
                }
            }
            log::info!("{}", if state.paused { "Paused" } else { "Resumed" });
        }
        Intent::Restart => {
            if state.paused && !state.ended && !state.game_over {
                return;
            }
            state.restart();
        }
        _ if state.ended || state.game_over => {}
        Intent::BeginLine(p) => {
            state.current_line = Some(PlayerLine::starting_at(p));
        }
        Intent::ExtendLine(p) => {
            if let Some(line) = state.current_line.as_mut() {
                line.add_point(p);
            }
        }
        Intent::EndLine => {
            if let Some(line) = state.current_line.take() {
                state.lines.push(line);
            }
        }
        Intent::EraseLine(p) => {
            if let Some(index) = state.lines.iter().position(|line| line.contains_point(p)) {
                state.lines.remove(index);
            }
        }
    }
}

/// Advance the game state by one tick.
///
/// Intents apply first. Ball physics (move, collide, boost, attract, remove)
/// and the level/spawn clocks only run while the level is live; when paused,
/// ended or game over the balls are held still instead, so a stopped ball
/// cannot drift into a hole. The win animation steps last whenever it is
/// active.
pub fn tick(state: &mut GameState, input: &TickInput) {
    for &intent in &input.intents {
        apply_intent(state, intent);
    }

    let running = !state.ended && !state.paused && !state.game_over;
    if running {
        step_physics(state);
        step_clock(state);
    } else {
        settle_stopped(state);
    }

    if state.animating {
        step_win_animation(state);
    }
}

/// Move, collide, boost, attract, then drop captured balls
fn step_physics(state: &mut GameState) {
    for ball in &mut state.balls {
        ball.move_one_tick();
    }

    // Walls first, then player lines; first hit wins
    for ball in &mut state.balls {
        let _ = state.walls.iter_mut().any(|wall| wall.check_collision(ball))
            || state.lines.iter_mut().any(|line| line.check_collision(ball));

        for tile in &state.speed_tiles {
            if tile.is_near(ball) {
                tile.apply_speed_boost(ball);
            }
        }
    }

    let mut captures = Vec::new();
    for (index, hole) in state.holes.iter().enumerate() {
        for ball in &mut state.balls {
            if let Some(capture) = hole.attract(index, ball) {
                captures.push(capture);
            }
        }
    }
    for capture in &captures {
        state.settle_capture(capture);
    }

    state.balls.retain(|ball| !ball.captured);
}

/// Count down the level and spawn clocks, then check for win or time-out
fn step_clock(state: &mut GameState) {
    state.level_timer -= 1;
    let mut board_empty = state.balls.is_empty();

    if state.queue.countdown() {
        state.spawn_next_ball();
        board_empty = false;
    }

    if state.queue.is_empty() && board_empty {
        state.ended = true;
        state.won = true;
        state.time_bonus = state.level_timer;
        state.lines.clear();
        state.spawners.clear();
        log::info!(
            "Level {} cleared with {} ticks to spare",
            state.level_index,
            state.level_timer
        );
    }

    if state.level_timer <= 0 && !state.won {
        state.ended = true;
        log::info!("Level {} timed out, score {}", state.level_index, state.score);
    }
}

fn stop_balls(state: &mut GameState) {
    for ball in &mut state.balls {
        ball.vel = Vec2::ZERO;
    }
    state.lines.clear();
    state.current_line = None;
}

fn settle_stopped(state: &mut GameState) {
    if state.won {
        if !state.animating {
            let bonus = state.time_bonus.max(0) / TICK_RATE as i32;
            state.score += bonus as i64;
            state.time_bonus = 0;
            state.animating = true;
            state.animation = WinAnimation::new();
            log::info!("Time bonus +{}, score {}", bonus, state.score);
        }
    } else if state.ended || state.game_over {
        stop_balls(state);
    } else if state.paused {
        for ball in &mut state.balls {
            ball.save_velocity();
        }
    }
}

/// Burn the level timer into the score while the cursors walk the edge,
/// then move on to the next level
fn step_win_animation(state: &mut GameState) {
    state.animation.advance(&mut state.board);

    if state.level_timer > 0 {
        state.level_timer -= WIN_ANIMATION_TIMER_BURN;
        state.score += 1;
    }

    if state.level_timer <= 0 {
        state.level_timer = 0;
        state.animating = false;
        state.ended = false;
        state.won = false;
        let next = state.level_index + 1;
        state.load_level(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, LevelConfig};
    use crate::sim::ball::BallColor;
    use crate::sim::state::GamePhase;
    use std::collections::HashMap;

    fn level(layout: &str, time: u32, balls: &[&str]) -> LevelConfig {
        LevelConfig {
            layout: layout.to_string(),
            time,
            spawn_interval: 10.0,
            increase_modifier: 1.5,
            decrease_modifier: 0.5,
            balls: balls.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn config(levels: Vec<LevelConfig>) -> GameConfig {
        GameConfig {
            levels,
            score_increase: HashMap::from([("orange".to_string(), 50), ("blue".to_string(), 40)]),
            score_decrease: HashMap::from([("orange".to_string(), 30), ("blue".to_string(), 20)]),
        }
    }

    fn session(layout: &str, time: u32, balls: &[&str]) -> GameState {
        let layouts = HashMap::from([("a.txt".to_string(), layout.to_string())]);
        GameState::new(&config(vec![level("a.txt", time, balls)]), &layouts, 42).unwrap()
    }

    fn idle(state: &mut GameState, ticks: usize) {
        for _ in 0..ticks {
            tick(state, &TickInput::default());
        }
    }

    const HOLE_LAYOUT: &str = "\n\n  H1";

    #[test]
    fn test_matching_capture_scores() {
        let mut state = session(HOLE_LAYOUT, 60, &[]);
        let center = state.holes[0].center();
        state.add_ball(center + Vec2::new(20.0, 0.0), Vec2::ZERO, BallColor::Orange);

        for _ in 0..100 {
            tick(&mut state, &TickInput::default());
            if state.balls.is_empty() {
                break;
            }
        }
        assert!(state.balls.is_empty());
        assert_eq!(state.score, 75);
    }

    #[test]
    fn test_wrong_hole_penalises_and_requeues() {
        // Two queued greys with no spawner: one is consumed at load
        let mut state = session(HOLE_LAYOUT, 60, &["grey", "grey"]);
        assert_eq!(state.queue.len(), 1);
        let center = state.holes[0].center();
        state.add_ball(center + Vec2::new(6.0, 0.0), Vec2::ZERO, BallColor::Blue);

        tick(&mut state, &TickInput::default());
        assert!(state.balls.is_empty());
        assert_eq!(state.score, -10);
        assert_eq!(state.queue().collect::<Vec<_>>(), vec![BallColor::Grey, BallColor::Blue]);
    }

    #[test]
    fn test_requeued_ball_spawns_immediately() {
        let mut state = session("S\n\n  H1", 60, &[]);
        let center = state.holes[0].center();
        state.add_ball(center + Vec2::new(6.0, 0.0), Vec2::ZERO, BallColor::Blue);

        tick(&mut state, &TickInput::default());
        assert!(state.queue.is_empty());
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.balls[0].color, BallColor::Blue);
        assert_eq!(state.balls[0].pos, state.spawners[0].spawn_pos());
        assert!(!state.won);
    }

    #[test]
    fn test_time_runs_out() {
        let mut state = session("S", 5, &["orange", "orange"]);
        assert_eq!(state.level_timer, 150);

        idle(&mut state, 149);
        assert!(!state.ended);
        idle(&mut state, 1);
        assert!(state.ended);
        assert!(!state.won);
        assert_eq!(state.phase(), GamePhase::Ended);
        assert_eq!(state.banner(), Some("=== TIME'S UP ==="));

        idle(&mut state, 1);
        assert!(state.balls.iter().all(|b| b.vel == Vec2::ZERO));
        assert_eq!(state.level_timer, 0);
    }

    #[test]
    fn test_spawn_interval() {
        let mut state = session("S", 60, &["orange", "blue", "green"]);
        assert_eq!(state.balls.len(), 1);
        // 10 s interval counts down to zero, then spawns on the next step
        idle(&mut state, 300);
        assert_eq!(state.balls.len(), 1);
        idle(&mut state, 1);
        assert_eq!(state.balls.len(), 2);
        assert_eq!(state.balls[1].color, BallColor::Blue);
    }

    #[test]
    fn test_pause_freezes_and_resumes() {
        let mut state = session("S", 60, &["orange", "blue"]);
        let vel = state.balls[0].vel;

        tick(&mut state, &TickInput::new([Intent::TogglePause]));
        assert_eq!(state.phase(), GamePhase::Paused);
        assert_eq!(state.banner(), Some("*** PAUSED ***"));
        assert_eq!(state.balls[0].vel, Vec2::ZERO);
        let (pos, timer) = (state.balls[0].pos, state.level_timer);

        idle(&mut state, 10);
        assert_eq!(state.balls[0].pos, pos);
        assert_eq!(state.level_timer, timer);

        // Restart is refused while paused mid-level
        tick(&mut state, &TickInput::new([Intent::Restart]));
        assert!(state.paused);

        tick(&mut state, &TickInput::new([Intent::TogglePause]));
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.balls[0].vel, vel);
    }

    #[test]
    fn test_line_bounces_ball_once() {
        let mut state = session("", 60, &[]);
        state.add_ball(Vec2::new(100.0, 100.0), Vec2::new(0.0, 2.0), BallColor::Grey);
        let draw = TickInput::new([
            Intent::BeginLine(Vec2::new(50.0, 120.0)),
            Intent::ExtendLine(Vec2::new(150.0, 120.0)),
            Intent::EndLine,
        ]);
        tick(&mut state, &draw);
        assert!(state.balls[0].vel.y < 0.0);
        assert!(state.lines[0].has_collided());
        assert!(state.current_line.is_none());
    }

    fn line_under_ball() -> PlayerLine {
        let mut line = PlayerLine::starting_at(Vec2::new(0.0, 60.0));
        line.add_point(Vec2::new(40.0, 60.0));
        line
    }

    #[test]
    fn test_first_hit_wins() {
        // Wall at (1,1) spans 32..64; the ball touches it after moving
        let mut state = session("\n X", 60, &[]);
        state.add_ball(Vec2::new(23.0, 48.0), Vec2::new(2.0, 0.0), BallColor::Grey);
        state.lines.push(line_under_ball());

        tick(&mut state, &TickInput::default());
        assert_eq!(state.balls[0].vel, Vec2::new(-2.0, 0.0));
        assert!((state.balls[0].pos.x - 22.5).abs() < 1e-4);
        assert!(!state.lines[0].has_collided());

        // Without the wall the same line takes the bounce
        let mut state = session("", 60, &[]);
        state.add_ball(Vec2::new(23.0, 48.0), Vec2::new(2.0, 0.0), BallColor::Grey);
        state.lines.push(line_under_ball());

        tick(&mut state, &TickInput::default());
        assert!(state.lines[0].has_collided());
    }

    #[test]
    fn test_boost_stacks_with_collision() {
        // Left tile at (0,1) beside the wall at (1,1)
        let mut state = session("\n<X", 60, &[]);
        state.add_ball(Vec2::new(23.0, 48.0), Vec2::new(2.0, 0.0), BallColor::Grey);

        tick(&mut state, &TickInput::default());
        let ball = &state.balls[0];
        // Reflected to (-2, 0) and pushed to x = 22.5, within the tile radius
        assert!((ball.pos.x - 22.5).abs() < 1e-4);
        assert!((ball.vel.x + 2.0 * SPEED_TILE_FACTOR).abs() < 1e-4);
        assert_eq!(ball.vel.y, 0.0);
    }

    #[test]
    fn test_erase_line() {
        let mut state = session("", 60, &[]);
        // Keeps the level from clearing
        state.add_ball(Vec2::new(500.0, 500.0), Vec2::ZERO, BallColor::Grey);
        let draw = TickInput::new([
            Intent::BeginLine(Vec2::new(300.0, 300.0)),
            Intent::ExtendLine(Vec2::new(340.0, 300.0)),
            Intent::EndLine,
        ]);
        tick(&mut state, &draw);
        assert_eq!(state.lines.len(), 1);

        tick(&mut state, &TickInput::new([Intent::EraseLine(Vec2::new(200.0, 200.0))]));
        assert_eq!(state.lines.len(), 1);
        tick(&mut state, &TickInput::new([Intent::EraseLine(Vec2::new(341.0, 302.0))]));
        assert!(state.lines.is_empty());
    }

    #[test]
    fn test_lines_ignored_after_time_out() {
        let mut state = session("S", 1, &["orange", "orange"]);
        idle(&mut state, 30);
        assert!(state.ended);
        tick(&mut state, &TickInput::new([Intent::BeginLine(Vec2::ONE), Intent::EndLine]));
        assert!(state.lines.is_empty());
        // Pause is refused too
        tick(&mut state, &TickInput::new([Intent::TogglePause]));
        assert!(!state.paused);
    }

    #[test]
    fn test_win_bonus_animation_and_next_level() {
        let layouts = HashMap::from([("a.txt".to_string(), String::new())]);
        let levels = vec![level("a.txt", 2, &[]), level("a.txt", 2, &[])];
        let mut state = GameState::new(&config(levels), &layouts, 42).unwrap();

        // Nothing queued and nothing on the board: cleared on the first tick
        idle(&mut state, 1);
        assert!(state.won && state.ended);
        assert_eq!(state.phase(), GamePhase::Won);
        assert_eq!(state.time_bonus, 59);
        assert_eq!(state.score, 0);

        // Bonus floor(59 / 30) = 1 once, then +1 per animation frame
        idle(&mut state, 1);
        assert_eq!(state.phase(), GamePhase::Animating);
        assert_eq!(state.score, 2);
        assert_eq!(state.level_timer, 44);
        idle(&mut state, 2);
        assert_eq!(state.score, 4);

        idle(&mut state, 1);
        assert_eq!(state.score, 5);
        assert_eq!(state.level_index, 1);
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.level_timer, 60);

        // Second level clears the same way, then the game is over
        idle(&mut state, 5);
        assert!(state.game_over);
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut state = session("S", 60, &["orange"]);
        state.score = 120;
        state.load_level(1);
        assert!(state.game_over);

        tick(&mut state, &TickInput::new([Intent::Restart]));
        assert!(!state.game_over);
        assert_eq!(state.level_index, 0);
        assert_eq!(state.score, 0);
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_restart_mid_level_keeps_score() {
        let mut state = session("S", 60, &["orange", "blue"]);
        state.score = 35;
        let draw = TickInput::new([Intent::BeginLine(Vec2::ONE), Intent::ExtendLine(Vec2::ZERO)]);
        tick(&mut state, &draw);
        idle(&mut state, 20);

        tick(&mut state, &TickInput::new([Intent::Restart]));
        assert_eq!(state.score, 35);
        assert_eq!(state.level_timer, 60 * TICK_RATE as i32 - 1);
        assert!(state.current_line.is_none());
        assert_eq!(state.queue.len(), 1);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed and input evolve identically
        let mut a = session("S  S\n\n  H1  ^\nX2", 30, &["orange", "blue", "grey"]);
        let mut b = session("S  S\n\n  H1  ^\nX2", 30, &["orange", "blue", "grey"]);

        let inputs = [
            TickInput::new([Intent::BeginLine(Vec2::new(10.0, 200.0))]),
            TickInput::new([Intent::ExtendLine(Vec2::new(300.0, 220.0))]),
            TickInput::new([Intent::EndLine]),
            TickInput::default(),
        ];
        for _ in 0..200 {
            for input in &inputs {
                tick(&mut a, input);
                tick(&mut b, input);
            }
        }

        assert_eq!(a.score, b.score);
        assert_eq!(a.level_timer, b.level_timer);
        assert_eq!(a.balls.len(), b.balls.len());
        for (x, y) in a.balls.iter().zip(&b.balls) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.vel, y.vel);
            assert_eq!(x.color, y.color);
        }
    }
}
