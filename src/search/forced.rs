//! Forced tactical moves
//!
//! Before any scoring pass the selector checks for cells it must play:
//! 1. its own immediate win
//! 2. the opponent's immediate win
//! 3. cells where the opponent would make a four (per profile flags)
//! 4. cells where the opponent would make an open three, with probability
//!
//! Each cell is assigned to the first bucket it matches; the first
//! non-empty bucket decides, and within it the highest-scoring cell wins.

use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::board::{Board, Pos, Stone};
use crate::eval::{score_move, ScoreContext};
use crate::profile::DifficultyProfile;
use crate::rules::{completes_win, is_forbidden, ShapeFlags};

/// Which bucket produced a forced move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForcedKind {
    Win,
    BlockWin,
    BlockFour,
    BlockOpenThree,
}

impl ForcedKind {
    pub fn name(self) -> &'static str {
        match self {
            ForcedKind::Win => "win",
            ForcedKind::BlockWin => "block-win",
            ForcedKind::BlockFour => "block-four",
            ForcedKind::BlockOpenThree => "block-open-three",
        }
    }
}

impl fmt::Display for ForcedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForcedMove {
    pub pos: Pos,
    pub kind: ForcedKind,
    pub score: f64,
}

#[derive(Default)]
struct Buckets {
    win: Vec<Pos>,
    block_win: Vec<Pos>,
    block_four: Vec<Pos>,
    block_open_three: Vec<Pos>,
}

/// Can `color` actually play at `pos`? Only Black is ever restricted.
fn playable(board: &Board, pos: Pos, color: Stone) -> bool {
    color != Stone::Black || is_forbidden(board, pos).is_none()
}

fn bucket_cells(board: &Board, mover: Stone, profile: &DifficultyProfile) -> Buckets {
    let opponent = mover.opponent();
    let mut buckets = Buckets::default();

    for pos in board.empties() {
        if !playable(board, pos, mover) {
            continue;
        }
        if completes_win(board, pos, mover) {
            buckets.win.push(pos);
            continue;
        }
        if completes_win(board, pos, opponent) {
            if playable(board, pos, opponent) {
                buckets.block_win.push(pos);
            }
            continue;
        }

        let theirs = ShapeFlags::at(board, pos, opponent);
        let four = (profile.force_block_open_four && theirs.open_four)
            || (profile.force_block_semi_four && theirs.semi_four);
        if four {
            if playable(board, pos, opponent) {
                buckets.block_four.push(pos);
            }
        } else if theirs.open_three && playable(board, pos, opponent) {
            buckets.block_open_three.push(pos);
        }
    }

    buckets
}

/// Best-scoring cell of a bucket; ties keep the first (row-major) cell.
fn best_of<R: Rng + ?Sized>(
    board: &Board,
    cells: &[Pos],
    mover: Stone,
    ctx: &ScoreContext,
    rng: &mut R,
) -> Option<(Pos, f64)> {
    let mut best: Option<(Pos, f64)> = None;
    for &pos in cells {
        let score = score_move(board, pos, mover, ctx, rng);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((pos, score));
        }
    }
    best
}

/// Open-three block chance as a valid probability; NaN counts as never.
fn block_probability(profile: &DifficultyProfile) -> f64 {
    let p = profile.block_open_three_prob;
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Look for a forced move for `mover`. Returns `None` when the position
/// has no forced reply and the caller should fall back to scoring.
pub fn find_forced<R: Rng + ?Sized>(
    board: &Board,
    mover: Stone,
    profile: &DifficultyProfile,
    ctx: &ScoreContext,
    rng: &mut R,
) -> Option<ForcedMove> {
    if mover == Stone::Empty {
        return None;
    }
    let buckets = bucket_cells(board, mover, profile);

    let ordered = [
        (ForcedKind::Win, &buckets.win),
        (ForcedKind::BlockWin, &buckets.block_win),
        (ForcedKind::BlockFour, &buckets.block_four),
    ];
    for (kind, cells) in ordered {
        if let Some((pos, score)) = best_of(board, cells, mover, ctx, rng) {
            return Some(ForcedMove { pos, kind, score });
        }
    }

    if !buckets.block_open_three.is_empty() && rng.gen_bool(block_probability(profile)) {
        return best_of(board, &buckets.block_open_three, mover, ctx, rng).map(|(pos, score)| {
            ForcedMove {
                pos,
                kind: ForcedKind::BlockOpenThree,
                score,
            }
        });
    }

    None
}
