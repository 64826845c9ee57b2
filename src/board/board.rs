//! Board structure: a flat grid of stones with a configurable side length

use thiserror::Error;

use super::{Pos, Stone, DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board size {0} outside 5..=25")]
    InvalidSize(usize),
    #[error("row {row} has {len} cells, expected {expected}")]
    RaggedRow { row: usize, len: usize, expected: usize },
    #[error("cell ({x}, {y}) holds {value}, expected 0, 1 or 2")]
    InvalidCell { x: usize, y: usize, value: u8 },
}

/// Square game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    /// Row-major cells, `y * size + x`
    cells: Vec<Stone>,
}

impl Board {
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(BoardError::InvalidSize(size));
        }
        Ok(Self {
            size,
            cells: vec![Stone::Empty; size * size],
        })
    }

    /// Build a board from the wire layout: `size` rows of `size` integers.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, BoardError> {
        let mut board = Self::new(rows.len())?;
        for (y, row) in rows.iter().enumerate() {
            if row.len() != board.size {
                return Err(BoardError::RaggedRow {
                    row: y,
                    len: row.len(),
                    expected: board.size,
                });
            }
            for (x, &value) in row.iter().enumerate() {
                let stone = Stone::from_u8(value).ok_or(BoardError::InvalidCell { x, y, value })?;
                board.cells[y * board.size + x] = stone;
            }
        }
        Ok(board)
    }

    /// Wire layout: one `Vec` per row, cells as 0/1/2
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|s| s.to_u8()).collect())
            .collect()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        (pos.x as usize) < self.size && (pos.y as usize) < self.size
    }

    /// Get stone at position. Out-of-bounds reads as empty; callers that care
    /// check `contains` first.
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        if self.contains(pos) {
            self.cells[pos.y as usize * self.size + pos.x as usize]
        } else {
            Stone::Empty
        }
    }

    /// Get stone at signed coordinates, `None` when off the board
    #[inline]
    pub fn get_at(&self, x: i32, y: i32) -> Option<Stone> {
        if self.in_bounds(x, y) {
            Some(self.cells[y as usize * self.size + x as usize])
        } else {
            None
        }
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos) == Stone::Empty
    }

    /// Write a stone without any rule checks.
    /// Game play goes through `GameEngine::apply`; this is for setting up
    /// positions and for replay.
    #[inline]
    pub fn place_stone(&mut self, pos: Pos, stone: Stone) {
        if self.contains(pos) {
            let idx = pos.y as usize * self.size + pos.x as usize;
            self.cells[idx] = stone;
        }
    }

    /// Total stones on board
    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|&&s| s != Stone::Empty).count()
    }

    pub fn is_board_empty(&self) -> bool {
        self.cells.iter().all(|&s| s == Stone::Empty)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&s| s != Stone::Empty)
    }

    /// Every empty cell, row-major
    pub fn empties(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s == Stone::Empty)
            .map(move |(i, _)| Pos::new((i % self.size) as u8, (i / self.size) as u8))
    }

    /// True if any occupied cell lies within Chebyshev distance `radius`
    /// of `pos` (excluding `pos` itself).
    pub fn has_neighbor(&self, pos: Pos, radius: usize) -> bool {
        let r = radius as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (x, y) = pos.offset(dx, dy, 1);
                if matches!(self.get_at(x, y), Some(s) if s != Stone::Empty) {
                    return true;
                }
            }
        }
        false
    }
}

impl Default for Board {
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            cells: vec![Stone::Empty; DEFAULT_BOARD_SIZE * DEFAULT_BOARD_SIZE],
        }
    }
}
