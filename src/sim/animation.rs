//! End-of-level perimeter walk

use glam::IVec2;

use super::board::Board;
use crate::consts::{BOARD_HEIGHT, BOARD_WIDTH, WIN_ANIMATION_INTERVAL};

/// Next cell clockwise around the board's outer ring
///
/// Cells off the ring stay put.
pub fn perimeter_step(cell: IVec2) -> IVec2 {
    let (x, y) = (cell.x, cell.y);
    if y == 0 && x < BOARD_WIDTH - 1 {
        IVec2::new(x + 1, y)
    } else if x == BOARD_WIDTH - 1 && y < BOARD_HEIGHT - 1 {
        IVec2::new(x, y + 1)
    } else if y == BOARD_HEIGHT - 1 && x > 0 {
        IVec2::new(x - 1, y)
    } else if x == 0 && y > 0 {
        IVec2::new(x, y - 1)
    } else {
        cell
    }
}

/// Two cursors walking the perimeter from opposite corners
#[derive(Debug, Clone, PartialEq)]
pub struct WinAnimation {
    pub left: IVec2,
    pub right: IVec2,
    /// Ticks until the next step
    timer: f32,
}

impl Default for WinAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl WinAnimation {
    pub fn new() -> Self {
        Self {
            left: IVec2::ZERO,
            right: IVec2::new(BOARD_WIDTH - 1, BOARD_HEIGHT - 1),
            timer: WIN_ANIMATION_INTERVAL,
        }
    }

    /// Light both cursor cells, then move each one step
    pub fn step(&mut self, board: &mut Board) {
        board.light(self.left);
        board.light(self.right);
        self.left = perimeter_step(self.left);
        self.right = perimeter_step(self.right);
    }

    /// Count down one tick, stepping when the interval elapses.
    /// Returns true if a step was taken.
    pub fn advance(&mut self, board: &mut Board) -> bool {
        self.timer -= 1.0;
        if self.timer > 0.0 {
            return false;
        }
        self.timer = WIN_ANIMATION_INTERVAL;
        self.step(board);
        true
    }
}
