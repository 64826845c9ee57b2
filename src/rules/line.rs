//! Line scanning along the four axes
//!
//! Every scan treats the origin cell as already holding the probed color
//! without writing it, so "hypothetical" stones never touch the grid.

use crate::board::{Board, Pos, Stone, DIRECTIONS};

/// Run length and open ends through one cell along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePattern {
    /// Contiguous same-color stones, origin included
    pub length: u8,
    /// Ends that are in-bounds and empty (0, 1 or 2)
    pub open_ends: u8,
}

impl LinePattern {
    #[inline]
    pub fn is_five_exact(self) -> bool {
        self.length == 5
    }

    #[inline]
    pub fn is_overline(self) -> bool {
        self.length > 5
    }

    #[inline]
    pub fn is_open_four(self) -> bool {
        self.length == 4 && self.open_ends == 2
    }

    /// Four with at least one open end; includes open fours
    #[inline]
    pub fn is_semi_four(self) -> bool {
        self.length == 4 && self.open_ends >= 1
    }

    #[inline]
    pub fn is_open_three(self) -> bool {
        self.length == 3 && self.open_ends == 2
    }
}

/// Count run and open ends through `pos` along `(dx, dy)` for `color`.
pub fn scan(board: &Board, pos: Pos, dx: i32, dy: i32, color: Stone) -> LinePattern {
    let (fwd, fwd_open) = walk(board, pos, dx, dy, color);
    let (bwd, bwd_open) = walk(board, pos, -dx, -dy, color);
    LinePattern {
        length: (1 + fwd + bwd).min(u8::MAX as u32) as u8,
        open_ends: fwd_open as u8 + bwd_open as u8,
    }
}

/// Scan all four axes
pub fn scan_all(board: &Board, pos: Pos, color: Stone) -> [LinePattern; 4] {
    DIRECTIONS.map(|(dx, dy)| scan(board, pos, dx, dy, color))
}

/// Walk one way from `pos`; returns the run count and whether the cell
/// beyond the run is an open end.
fn walk(board: &Board, pos: Pos, dx: i32, dy: i32, color: Stone) -> (u32, bool) {
    let mut count = 0u32;
    let mut step = 1;
    loop {
        let (x, y) = pos.offset(dx, dy, step);
        match board.get_at(x, y) {
            Some(s) if s == color => {
                count += 1;
                step += 1;
            }
            Some(Stone::Empty) => return (count, true),
            _ => return (count, false),
        }
    }
}

/// Shape flags a stone of `color` would create at `pos`, across all axes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeFlags {
    pub open_four: bool,
    pub semi_four: bool,
    pub open_three: bool,
}

impl ShapeFlags {
    pub fn at(board: &Board, pos: Pos, color: Stone) -> Self {
        let mut flags = ShapeFlags::default();
        for line in scan_all(board, pos, color) {
            flags.open_four |= line.is_open_four();
            flags.semi_four |= line.is_semi_four();
            flags.open_three |= line.is_open_three();
        }
        flags
    }
}
