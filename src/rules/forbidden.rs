//! Forbidden moves (Renju restrictions) for Black
//!
//! Black may not play a move that creates:
//! - an overline (six or more in a row)
//! - two or more open threes at once (double-three)
//! - two or more fours at once (double-four)
//!
//! The three/four classifier is a single-ply approximation: it looks only at
//! the contiguous run through the candidate cell on each axis. Gapped shapes
//! such as `_BB_B_` are not recognised.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos, Stone};

use super::line::{scan_all, LinePattern};
use super::win::completes_win;

/// Why a black move is forbidden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForbiddenReason {
    Overline,
    DoubleThree,
    DoubleFour,
}

impl ForbiddenReason {
    /// Stable tag for clients
    pub fn tag(self) -> &'static str {
        match self {
            ForbiddenReason::Overline => "overline",
            ForbiddenReason::DoubleThree => "double-three",
            ForbiddenReason::DoubleFour => "double-four",
        }
    }
}

impl fmt::Display for ForbiddenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Per-axis classification used by the double-three/double-four counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineThreat {
    OpenThree,
    Four,
    None,
}

fn classify(line: LinePattern) -> LineThreat {
    if line.is_open_three() {
        LineThreat::OpenThree
    } else if line.is_semi_four() {
        LineThreat::Four
    } else {
        LineThreat::None
    }
}

/// Check whether Black playing at `pos` is forbidden.
///
/// Only meaningful for an empty cell; White is never restricted.
pub fn is_forbidden(board: &Board, pos: Pos) -> Option<ForbiddenReason> {
    let lines = scan_all(board, pos, Stone::Black);

    if lines.iter().any(|l| l.is_overline()) {
        return Some(ForbiddenReason::Overline);
    }

    // A four that is part of a winning move is not restricted
    let wins = completes_win(board, pos, Stone::Black);

    let mut open_threes = 0;
    let mut fours = 0;
    for line in lines {
        match classify(line) {
            LineThreat::OpenThree => open_threes += 1,
            LineThreat::Four if !wins => fours += 1,
            _ => {}
        }
    }

    if open_threes >= 2 {
        Some(ForbiddenReason::DoubleThree)
    } else if fours >= 2 {
        Some(ForbiddenReason::DoubleFour)
    } else {
        None
    }
}

/// Check if a move is legal for `stone` (empty, in bounds, not forbidden)
pub fn is_valid_move(board: &Board, pos: Pos, stone: Stone) -> bool {
    if !board.contains(pos) || !board.is_empty(pos) {
        return false;
    }
    stone != Stone::Black || is_forbidden(board, pos).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(board: &mut Board, stones: &[(u8, u8)], stone: Stone) {
        for &(x, y) in stones {
            board.place_stone(Pos::new(x, y), stone);
        }
    }

    #[test]
    fn test_empty_board_not_forbidden() {
        let board = Board::new(15).unwrap();
        assert_eq!(is_forbidden(&board, Pos::new(7, 7)), None);
    }

    #[test]
    fn test_overline() {
        let mut board = Board::new(15).unwrap();
        place(&mut board, &[(2, 7), (3, 7), (4, 7), (6, 7), (7, 7)], Stone::Black);
        assert_eq!(
            is_forbidden(&board, Pos::new(5, 7)),
            Some(ForbiddenReason::Overline)
        );
        assert!(board.is_empty(Pos::new(5, 7)));
    }

    #[test]
    fn test_double_three_cross() {
        let mut board = Board::new(15).unwrap();
        // _ B _ B _ horizontally and vertically through (7, 7)
        place(&mut board, &[(6, 7), (8, 7), (7, 6), (7, 8)], Stone::Black);
        let before = board.clone();
        assert_eq!(
            is_forbidden(&board, Pos::new(7, 7)),
            Some(ForbiddenReason::DoubleThree)
        );
        assert_eq!(board, before);
        assert!(!is_valid_move(&board, Pos::new(7, 7), Stone::Black));
        assert!(is_valid_move(&board, Pos::new(7, 7), Stone::White));
    }

    #[test]
    fn test_double_three_diagonals() {
        let mut board = Board::new(15).unwrap();
        place(&mut board, &[(6, 6), (8, 8), (8, 6), (6, 8)], Stone::Black);
        assert_eq!(
            is_forbidden(&board, Pos::new(7, 7)),
            Some(ForbiddenReason::DoubleThree)
        );
    }

    #[test]
    fn test_single_three_allowed() {
        let mut board = Board::new(15).unwrap();
        place(&mut board, &[(6, 7), (8, 7)], Stone::Black);
        assert_eq!(is_forbidden(&board, Pos::new(7, 7)), None);
    }

    #[test]
    fn test_blocked_three_does_not_count() {
        let mut board = Board::new(15).unwrap();
        place(&mut board, &[(6, 7), (8, 7), (7, 6), (7, 8)], Stone::Black);
        board.place_stone(Pos::new(5, 7), Stone::White);
        assert_eq!(is_forbidden(&board, Pos::new(7, 7)), None);
    }

    #[test]
    fn test_double_four() {
        let mut board = Board::new(15).unwrap();
        // B B B _ horizontally and vertically, both fours half-open
        place(&mut board, &[(4, 7), (5, 7), (6, 7), (7, 4), (7, 5), (7, 6)], Stone::Black);
        assert_eq!(
            is_forbidden(&board, Pos::new(7, 7)),
            Some(ForbiddenReason::DoubleFour)
        );
    }

    #[test]
    fn test_four_with_winning_five_not_double_four() {
        let mut board = Board::new(15).unwrap();
        // Horizontal completes exactly five, vertical makes a four
        place(&mut board, &[(3, 7), (4, 7), (5, 7), (6, 7)], Stone::Black);
        place(&mut board, &[(7, 4), (7, 5), (7, 6)], Stone::Black);
        assert_eq!(is_forbidden(&board, Pos::new(7, 7)), None);
    }

    #[test]
    fn test_dead_four_not_counted() {
        let mut board = Board::new(15).unwrap();
        place(&mut board, &[(4, 7), (5, 7), (6, 7), (7, 4), (7, 5), (7, 6)], Stone::Black);
        // Close both ends of the horizontal four
        board.place_stone(Pos::new(3, 7), Stone::White);
        board.place_stone(Pos::new(8, 7), Stone::White);
        assert_eq!(is_forbidden(&board, Pos::new(7, 7)), None);
    }

    #[test]
    fn test_forbidden_reason_tags() {
        assert_eq!(ForbiddenReason::Overline.tag(), "overline");
        assert_eq!(ForbiddenReason::DoubleThree.to_string(), "double-three");
        assert_eq!(
            serde_json::to_string(&ForbiddenReason::DoubleFour).unwrap(),
            "\"double-four\""
        );
    }

    #[test]
    fn test_never_mutates_board() {
        let mut board = Board::new(15).unwrap();
        place(&mut board, &[(2, 2), (3, 3), (4, 4), (6, 6), (7, 7)], Stone::Black);
        place(&mut board, &[(10, 10), (11, 10)], Stone::White);
        let before = board.clone();
        for pos in before.empties() {
            let _ = is_forbidden(&board, pos);
        }
        assert_eq!(board, before);
    }
}
