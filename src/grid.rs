//! Grid engine: board, slide-and-merge, tile spawn, win/loss.

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use thiserror::Error;

pub const DEFAULT_WIDTH: usize = 4;
pub const DEFAULT_HEIGHT: usize = 4;
pub const DEFAULT_WIN_VALUE: u32 = 2048;

/// Chance (in percent) that a spawned tile is a 4 rather than a 2.
const FOUR_CHANCE_PERCENT: u32 = 11;

/// Largest tile a cell can hold; two of these do not merge.
pub const MAX_TILE: u32 = 1 << 31;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("no empty cell left to spawn a tile into")]
    NoEmptyCell,
    #[error("board rows must be non-empty and of equal length")]
    InvalidShape,
}

/// Slide direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Left, Self::Down, Self::Right];

    /// Turn the board so that this direction becomes a left move.
    fn orient(self, board: &Board) -> Board {
        match self {
            Self::Left => board.clone(),
            Self::Right => board.reversed(),
            Self::Up => board.transposed(),
            Self::Down => board.transposed().reversed(),
        }
    }

    /// Inverse of [`Direction::orient`].
    fn restore(self, board: &Board) -> Board {
        match self {
            Self::Left => board.clone(),
            Self::Right => board.reversed(),
            Self::Up => board.transposed(),
            Self::Down => board.reversed().transposed(),
        }
    }
}

/// Rectangular grid of tile values; 0 is empty. rows[0] is the top row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: Vec<Vec<u32>>,
}

impl Board {
    /// All-zero board. Fails with [`GridError::InvalidShape`] if either side is 0.
    pub fn empty(height: usize, width: usize) -> Result<Self, GridError> {
        Self::from_rows(vec![vec![0; width]; height])
    }

    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || rows.iter().any(|r| r.len() != width) {
            return Err(GridError::InvalidShape);
        }
        Ok(Self { rows })
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.rows
    }

    fn set(&mut self, row: usize, col: usize, value: u32) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value;
        }
    }

    /// (row, col) of every empty cell, row-major.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, v)| **v == 0)
                    .map(move |(x, _)| (y, x))
            })
            .collect()
    }

    pub fn filled_count(&self) -> usize {
        self.rows.iter().flatten().filter(|v| **v != 0).count()
    }

    pub fn max_tile(&self) -> u32 {
        self.rows.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Rows become columns; a `h x w` board becomes `w x h`.
    fn transposed(&self) -> Self {
        let rows = (0..self.width())
            .map(|x| self.rows.iter().map(|row| row[x]).collect())
            .collect();
        Self { rows }
    }

    /// Each row mirrored left to right.
    fn reversed(&self) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().rev().copied().collect())
            .collect();
        Self { rows }
    }

    fn slide_left(&self) -> (Self, u64) {
        let mut gained = 0;
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let (moved, delta) = move_row_left(row);
                gained += delta;
                moved
            })
            .collect();
        (Self { rows }, gained)
    }
}

/// Drop zeros keeping order, then right-pad with zeros to the original length.
pub fn tighten(row: &[u32]) -> Vec<u32> {
    let mut out: Vec<u32> = row.iter().copied().filter(|v| *v != 0).collect();
    out.resize(row.len(), 0);
    out
}

/// Single left-to-right merge pass over a tightened row.
///
/// An equal pair `v, v` becomes `0, 2v`; a cell takes part in at most one merge, so
/// `[2, 2, 2, 0]` gives `[0, 4, 2, 0]`. Returns the new row and the sum of merged values.
pub fn merge_row(row: &[u32]) -> (Vec<u32>, u64) {
    let mut out = Vec::with_capacity(row.len());
    let mut gained = 0;
    let mut pair = false;
    for (i, &v) in row.iter().enumerate() {
        if pair {
            out.push(v * 2);
            gained += u64::from(v) * 2;
            pair = false;
        } else if can_merge(v) && row.get(i + 1) == Some(&v) {
            pair = true;
            out.push(0);
        } else {
            out.push(v);
        }
    }
    (out, gained)
}

/// Non-empty and small enough that doubling still fits a cell.
#[inline]
const fn can_merge(v: u32) -> bool {
    v != 0 && v < MAX_TILE
}

pub fn move_row_left(row: &[u32]) -> (Vec<u32>, u64) {
    let (merged, gained) = merge_row(&tighten(row));
    (tighten(&merged), gained)
}

/// True if a left move would change this row.
pub fn row_can_move_left(row: &[u32]) -> bool {
    row.windows(2)
        .any(|w| (w[0] == 0 && w[1] != 0) || (can_merge(w[0]) && w[0] == w[1]))
}

/// Slide the whole board without spawning. Returns the new board and score gained.
pub fn slide(board: &Board, direction: Direction) -> (Board, u64) {
    let (moved, gained) = direction.orient(board).slide_left();
    (direction.restore(&moved), gained)
}

pub fn can_slide(board: &Board, direction: Direction) -> bool {
    direction
        .orient(board)
        .rows
        .iter()
        .any(|row| row_can_move_left(row))
}

/// Board, score and highscore for one process run, plus the tile RNG.
#[derive(Debug)]
pub struct GridEngine {
    board: Board,
    score: u64,
    highscore: u64,
    win_value: u32,
    rng: StdRng,
}

impl GridEngine {
    /// Engine with an empty board. Call [`GridEngine::reset`] before playing.
    pub fn new(
        height: usize,
        width: usize,
        win_value: u32,
        rng: StdRng,
    ) -> Result<Self, GridError> {
        Ok(Self::with_board(Board::empty(height, width)?, win_value, rng))
    }

    /// Engine starting from a given board with score 0.
    pub fn with_board(board: Board, win_value: u32, rng: StdRng) -> Self {
        Self {
            board,
            score: 0,
            highscore: 0,
            win_value,
            rng,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn highscore(&self) -> u64 {
        self.highscore
    }

    pub fn win_value(&self) -> u32 {
        self.win_value
    }

    pub fn reset(&mut self) -> Result<(), GridError> {
        if self.score > self.highscore {
            self.highscore = self.score;
        }
        self.score = 0;
        self.board = Board::empty(self.board.height(), self.board.width())?;
        self.spawn()?;
        self.spawn()
    }

    /// Place a 2 (89%) or 4 (11%) in a uniformly chosen empty cell.
    pub fn spawn(&mut self) -> Result<(), GridError> {
        let value = if self.rng.gen_range(0..100) < FOUR_CHANCE_PERCENT {
            4
        } else {
            2
        };
        let cells = self.board.empty_cells();
        let &(y, x) = cells.choose(&mut self.rng).ok_or(GridError::NoEmptyCell)?;
        self.board.set(y, x, value);
        Ok(())
    }

    pub fn move_possible(&self, direction: Direction) -> bool {
        can_slide(&self.board, direction)
    }

    /// Slide, merge and spawn. `Ok(false)` with no side effects if nothing would move.
    pub fn make_move(&mut self, direction: Direction) -> Result<bool, GridError> {
        if !self.move_possible(direction) {
            return Ok(false);
        }
        let (board, gained) = slide(&self.board, direction);
        self.board = board;
        self.score = self.score.saturating_add(gained);
        self.highscore = self.highscore.max(self.score);
        self.spawn()?;
        Ok(true)
    }

    pub fn is_win(&self) -> bool {
        self.board.max_tile() >= self.win_value
    }

    pub fn is_game_over(&self) -> bool {
        !Direction::ALL.iter().any(|d| self.move_possible(*d))
    }
}
