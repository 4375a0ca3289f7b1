//! Cell grid and layout decoding
//!
//! The board is rebuilt from layout text on every level load. Each cell
//! may reference one obstacle (by index into the level's obstacle lists)
//! and may be covered by a multi-cell hole.

use glam::IVec2;

use super::ball::BallColor;
use super::obstacle::{Direction, Hole, Spawner, SpeedTile, Wall};
use crate::consts::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::in_bounds;

/// What occupies a cell. Indices point into [`Layout`]'s lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellObject {
    Wall(usize),
    Hole(usize),
    SpeedTile(usize),
    Spawner(usize),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub object: Option<CellObject>,
    /// Part of a hole footprint; purely visual
    pub covered: bool,
    /// Painted by the win animation
    pub lit: bool,
}

/// Fixed-size grid, row-major
#[derive(Debug, Clone)]
pub struct Board {
    cells: Vec<Cell>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: vec![Cell::default(); (BOARD_WIDTH * BOARD_HEIGHT) as usize],
        }
    }

    fn index(cell: IVec2) -> Option<usize> {
        in_bounds(cell).then(|| (cell.y * BOARD_WIDTH + cell.x) as usize)
    }

    /// Cell at `cell`, or `None` off the board
    pub fn get(&self, cell: IVec2) -> Option<&Cell> {
        Self::index(cell).map(|i| &self.cells[i])
    }

    fn get_mut(&mut self, cell: IVec2) -> Option<&mut Cell> {
        Self::index(cell).map(move |i| &mut self.cells[i])
    }

    /// Obstacle at `cell`. Off-board queries simply find nothing.
    pub fn object_at(&self, cell: IVec2) -> Option<CellObject> {
        self.get(cell).and_then(|c| c.object)
    }

    pub fn is_covered(&self, cell: IVec2) -> bool {
        self.get(cell).is_some_and(|c| c.covered)
    }

    /// Mark a cell as painted by the win animation
    pub fn light(&mut self, cell: IVec2) {
        if let Some(c) = self.get_mut(cell) {
            c.lit = true;
        }
    }

    /// Iterate `(cell, &Cell)` in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (IVec2, &Cell)> {
        self.cells.iter().enumerate().map(|(i, c)| {
            let i = i as i32;
            (IVec2::new(i % BOARD_WIDTH, i / BOARD_WIDTH), c)
        })
    }

    /// Whether `cell` can take a new placement
    fn is_free(&self, cell: IVec2) -> bool {
        self.get(cell).is_some_and(|c| c.object.is_none() && !c.covered)
    }
}

/// Everything decoded from one layout
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub board: Board,
    pub walls: Vec<Wall>,
    pub holes: Vec<Hole>,
    pub speed_tiles: Vec<SpeedTile>,
    pub spawners: Vec<Spawner>,
    /// Pre-placed balls: cell and colour
    pub balls: Vec<(IVec2, BallColor)>,
}

/// Decode layout text into obstacle placements
///
/// Malformed symbols, placements off the board and symbols landing on
/// covered cells are skipped with a warning.
pub fn decode_layout(text: &str) -> Layout {
    let mut layout = Layout::default();

    for (y, row) in text.lines().enumerate() {
        let chars: Vec<char> = row.chars().collect();
        let mut x = 0usize;
        while x < chars.len() {
            let cell = IVec2::new(x as i32, y as i32);
            let symbol = chars[x];
            let next = chars.get(x + 1).copied();
            x += 1;

            if symbol == ' ' || symbol == '.' {
                continue;
            }
            if !layout.board.is_free(cell) {
                log::warn!("layout: '{}' at {:?} is off the board or covered, skipped", symbol, cell);
                if matches!(symbol, 'H' | 'B') && next.and_then(BallColor::from_digit).is_some() {
                    x += 1;
                }
                continue;
            }

            match symbol {
                'H' | 'B' => {
                    let Some(color) = next.and_then(BallColor::from_digit) else {
                        log::warn!("layout: '{}' at {:?} has no colour digit, skipped", symbol, cell);
                        continue;
                    };
                    x += 1;
                    if symbol == 'H' {
                        place_hole(&mut layout, cell, color);
                    } else {
                        layout.balls.push((cell, color));
                    }
                }
                'X' => place_wall(&mut layout, cell, BallColor::Grey),
                '1'..='4' => {
                    if let Some(color) = BallColor::from_digit(symbol) {
                        place_wall(&mut layout, cell, color);
                    }
                }
                'S' => {
                    let index = layout.spawners.len();
                    layout.spawners.push(Spawner::new(cell));
                    set_object(&mut layout.board, cell, CellObject::Spawner(index));
                }
                '^' | 'v' | '<' | '>' => {
                    if let Some(direction) = Direction::from_symbol(symbol) {
                        let index = layout.speed_tiles.len();
                        layout.speed_tiles.push(SpeedTile::new(cell, direction));
                        set_object(&mut layout.board, cell, CellObject::SpeedTile(index));
                    }
                }
                other => {
                    log::warn!("layout: unknown symbol '{}' at {:?}, skipped", other, cell);
                }
            }
        }
    }

    layout
}

fn set_object(board: &mut Board, cell: IVec2, object: CellObject) {
    if let Some(c) = board.get_mut(cell) {
        c.object = Some(object);
    }
}

fn place_wall(layout: &mut Layout, cell: IVec2, color: BallColor) {
    let index = layout.walls.len();
    layout.walls.push(Wall::new(cell, color));
    set_object(&mut layout.board, cell, CellObject::Wall(index));
}

fn place_hole(layout: &mut Layout, cell: IVec2, color: BallColor) {
    let hole = Hole::new(cell, color);
    let footprint = hole.covered_cells();
    if !footprint.iter().all(|&c| layout.board.is_free(c)) {
        log::warn!("layout: hole at {:?} does not fit, skipped", cell);
        return;
    }

    let index = layout.holes.len();
    set_object(&mut layout.board, cell, CellObject::Hole(index));
    for c in footprint {
        if let Some(covered) = layout.board.get_mut(c) {
            covered.covered = true;
        }
    }
    layout.holes.push(hole);
}
