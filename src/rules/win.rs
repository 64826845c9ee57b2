//! Win condition checking for Renju-restricted Omok
//!
//! Win conditions are color dependent:
//! - Black wins only with exactly five in a row (six or more is an overline,
//!   which is forbidden rather than winning)
//! - White wins with five or more in a row

use crate::board::{Board, Pos, Stone};

use super::line::scan_all;

/// Whether a run of `length` stones wins for `color`.
#[inline]
pub fn is_winning_length(color: Stone, length: u8) -> bool {
    match color {
        Stone::Black => length == 5,
        Stone::White => length >= 5,
        Stone::Empty => false,
    }
}

/// Would a stone of `color` at `pos` complete a win?
///
/// Overlay check: the cell itself is not read, so this works both for an
/// empty cell and for a stone that has just been placed.
pub fn completes_win(board: &Board, pos: Pos, color: Stone) -> bool {
    scan_all(board, pos, color)
        .iter()
        .any(|line| is_winning_length(color, line.length))
}

/// Check whether the stone just placed at `pos` wins for its owner.
pub fn is_win(board: &Board, pos: Pos) -> bool {
    let color = board.get(pos);
    completes_win(board, pos, color)
}

/// Positions of the winning run through `pos`, for highlighting
pub fn winning_line(board: &Board, pos: Pos) -> Option<Vec<Pos>> {
    let color = board.get(pos);
    if color == Stone::Empty {
        return None;
    }
    for (dx, dy) in crate::board::DIRECTIONS {
        let mut line = vec![pos];
        for sign in [1, -1] {
            let mut step = 1;
            loop {
                let (x, y) = pos.offset(dx * sign, dy * sign, step);
                match board.get_at(x, y) {
                    Some(s) if s == color => {
                        line.push(Pos::new(x as u8, y as u8));
                        step += 1;
                    }
                    _ => break,
                }
            }
        }
        if is_winning_length(color, line.len().min(u8::MAX as usize) as u8) {
            line.sort();
            return Some(line);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(board: &mut Board, y: u8, xs: std::ops::Range<u8>, stone: Stone) {
        for x in xs {
            board.place_stone(Pos::new(x, y), stone);
        }
    }

    #[test]
    fn test_black_exact_five_wins() {
        let mut board = Board::new(15).unwrap();
        row(&mut board, 7, 5..10, Stone::Black);
        assert!(is_win(&board, Pos::new(9, 7)));
        assert!(is_win(&board, Pos::new(5, 7)));
    }

    #[test]
    fn test_black_six_is_not_a_win() {
        let mut board = Board::new(15).unwrap();
        row(&mut board, 7, 3..9, Stone::Black);
        assert!(!is_win(&board, Pos::new(8, 7)));
    }

    #[test]
    fn test_white_overline_wins() {
        let mut board = Board::new(15).unwrap();
        row(&mut board, 3, 3..9, Stone::White);
        assert!(is_win(&board, Pos::new(8, 3)));
    }

    #[test]
    fn test_four_not_win() {
        let mut board = Board::new(15).unwrap();
        row(&mut board, 0, 0..4, Stone::White);
        assert!(!is_win(&board, Pos::new(3, 0)));
    }

    #[test]
    fn test_completes_win_on_empty_cell() {
        let mut board = Board::new(15).unwrap();
        row(&mut board, 4, 0..4, Stone::Black);
        assert!(completes_win(&board, Pos::new(4, 4), Stone::Black));
        assert!(!completes_win(&board, Pos::new(4, 4), Stone::White));
        assert!(board.is_empty(Pos::new(4, 4)));

        // Filling the gap of B B B B _ B would make six for black
        board.place_stone(Pos::new(5, 4), Stone::Black);
        assert!(!completes_win(&board, Pos::new(4, 4), Stone::Black));
    }

    #[test]
    fn test_diagonal_win_at_corner() {
        let mut board = Board::new(15).unwrap();
        for i in 10..15u8 {
            board.place_stone(Pos::new(i, i), Stone::White);
        }
        assert!(is_win(&board, Pos::new(14, 14)));
        let line = winning_line(&board, Pos::new(12, 12)).unwrap();
        assert_eq!(line.len(), 5);
        assert_eq!(line[0], Pos::new(10, 10));
    }

    #[test]
    fn test_empty_cell_never_wins() {
        let board = Board::new(15).unwrap();
        assert!(!is_win(&board, Pos::new(7, 7)));
        assert!(winning_line(&board, Pos::new(7, 7)).is_none());
    }
}
