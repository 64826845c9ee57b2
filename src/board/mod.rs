//! Board representation for Omok

pub mod board;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

// Re-exports
pub use board::{Board, BoardError};

/// Default board size (15x15)
pub const DEFAULT_BOARD_SIZE: usize = 15;
/// Smallest supported board side
pub const MIN_BOARD_SIZE: usize = 5;
/// Largest supported board side
pub const MAX_BOARD_SIZE: usize = 25;

/// The four line axes, as (dx, dy) steps.
pub const DIRECTIONS: [(i32, i32); 4] = [
    (1, 0),  // Horizontal
    (0, 1),  // Vertical
    (1, 1),  // Diagonal ↘
    (1, -1), // Diagonal ↗
];

/// Stone colors, encoded on the wire as 0/1/2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Stone {
    #[default]
    Empty = 0,
    Black = 1,
    White = 2,
}

impl Stone {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
            Stone::Empty => Stone::Empty,
        }
    }

    /// Decode a wire value
    pub fn from_u8(v: u8) -> Option<Stone> {
        match v {
            0 => Some(Stone::Empty),
            1 => Some(Stone::Black),
            2 => Some(Stone::White),
            _ => None,
        }
    }

    #[inline]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Stone::Black => "black",
            Stone::White => "white",
            Stone::Empty => "empty",
        }
    }
}

impl std::fmt::Display for Stone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Position on the board; `x` is the column, `y` the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    #[inline]
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Offset this position by `steps` units of `(dx, dy)`.
    /// Returns signed coordinates; callers bound-check against the board.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32, steps: i32) -> (i32, i32) {
        (self.x as i32 + dx * steps, self.y as i32 + dy * steps)
    }

    /// Squared euclidean distance from the board center
    pub fn center_distance_sq(self, size: usize) -> f64 {
        let c = (size as f64 - 1.0) / 2.0;
        let dx = self.x as f64 - c;
        let dy = self.y as f64 - c;
        dx * dx + dy * dy
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Row-major ordering: `y` first, then `x`
impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
