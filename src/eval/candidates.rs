//! Candidate move generation
//!
//! Candidates are the empty cells near existing stones. When that pool is
//! thin (opening, or a sparse corner fight) it is topped up with the empty
//! cells closest to the center.

use std::collections::HashSet;

use crate::board::{Board, Pos};
use crate::profile::DifficultyProfile;

use super::heuristic::center_bonus;

/// Below this many near cells the pool is supplemented
pub const MIN_LOCAL_CANDIDATES: usize = 20;

/// Generate candidate cells for the next move, in row-major order for the
/// near pool followed by center-ranked extras.
///
/// An empty result means the board is full.
pub fn generate(board: &Board, profile: &DifficultyProfile) -> Vec<Pos> {
    let mut candidates: Vec<Pos> = board
        .empties()
        .filter(|&pos| board.has_neighbor(pos, profile.near_radius))
        .collect();

    if candidates.len() < MIN_LOCAL_CANDIDATES {
        let mut seen: HashSet<Pos> = candidates.iter().copied().collect();
        for pos in center_ranked(board, profile.exploration_k) {
            if seen.insert(pos) {
                candidates.push(pos);
            }
        }
    }

    candidates
}

/// The `k` empty cells closest to the center; ties keep row-major order.
pub fn center_ranked(board: &Board, k: usize) -> Vec<Pos> {
    let mut ranked: Vec<(Pos, f64)> = board
        .empties()
        .map(|pos| (pos, center_bonus(board, pos)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.into_iter().take(k).map(|(pos, _)| pos).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Stone;

    #[test]
    fn test_empty_board_uses_center_pool() {
        let board = Board::new(15).unwrap();
        let profile = DifficultyProfile::advanced();
        let cands = generate(&board, &profile);
        assert_eq!(cands.len(), profile.exploration_k);
        assert_eq!(cands[0], Pos::new(7, 7));
    }

    #[test]
    fn test_neighbors_then_center_without_duplicates() {
        let mut board = Board::new(15).unwrap();
        board.place_stone(Pos::new(7, 7), Stone::Black);
        let profile = DifficultyProfile::advanced();
        let cands = generate(&board, &profile);

        // 5x5 block around the stone minus the stone itself
        let near: Vec<_> = cands
            .iter()
            .filter(|p| board.has_neighbor(**p, 2))
            .collect();
        assert_eq!(near.len(), 24);

        let unique: HashSet<_> = cands.iter().collect();
        assert_eq!(unique.len(), cands.len());
        assert!(cands.iter().all(|&p| board.is_empty(p)));
        assert!(!cands.contains(&Pos::new(7, 7)));
    }

    #[test]
    fn test_dense_pool_not_supplemented() {
        let mut board = Board::new(15).unwrap();
        for x in 3..12u8 {
            board.place_stone(Pos::new(x, 7), Stone::White);
        }
        let cands = generate(&board, &DifficultyProfile::advanced());
        assert!(cands.len() >= MIN_LOCAL_CANDIDATES);
        assert!(cands.iter().all(|&p| board.has_neighbor(p, 2)));
    }

    #[test]
    fn test_full_board_has_no_candidates() {
        let mut board = Board::new(5).unwrap();
        for pos in Board::new(5).unwrap().empties() {
            board.place_stone(pos, Stone::White);
        }
        assert!(generate(&board, &DifficultyProfile::beginner()).is_empty());
    }

    #[test]
    fn test_center_ranked_stable_ties() {
        let board = Board::new(5).unwrap();
        let ranked = center_ranked(&board, 5);
        assert_eq!(ranked[0], Pos::new(2, 2));
        // Four cells at distance 1, in row-major order
        assert_eq!(
            &ranked[1..],
            &[Pos::new(2, 1), Pos::new(1, 2), Pos::new(3, 2), Pos::new(2, 3)]
        );
    }
}
