//! Single-cell move scoring
//!
//! Scores one empty cell for the side to move. The terms, highest tier first:
//! - immediate win / block of the opponent's immediate win (sentinels)
//! - own shapes created by the stone (open four, semi four, open three)
//! - opponent shapes denied by occupying the cell
//! - per-axis line extension (run length and open ends)
//! - locality, center preference and a small random jitter
//!
//! Apart from the jitter the score is a pure function of board, cell and mover.

use rand::Rng;

use crate::board::{Board, Pos, Stone};
use crate::profile::DifficultyProfile;
use crate::rules::{completes_win, scan_all, ShapeFlags};

use super::patterns::{PatternScore, ScoreWeights};

/// Stones on the board after which the center bonus has faded out
const CENTER_FADE_STONES: f64 = 40.0;

/// Per-position inputs to [`score_move`], computed once per selection.
#[derive(Debug, Clone, Copy)]
pub struct ScoreContext {
    pub weights: ScoreWeights,
    pub near_radius: usize,
    pub center_scale: f64,
    pub center_phase: f64,
    pub jitter: f64,
}

impl ScoreContext {
    pub fn new(board: &Board, profile: &DifficultyProfile) -> Self {
        Self {
            weights: profile.weights,
            near_radius: profile.near_radius,
            center_scale: profile.center_scale,
            center_phase: center_phase(board.stone_count()),
            jitter: profile.jitter,
        }
    }
}

/// How much the center still matters: 1 on an empty board, 0 from 40 stones.
#[inline]
pub fn center_phase(stones: usize) -> f64 {
    (1.0 - stones as f64 / CENTER_FADE_STONES).max(0.0)
}

/// Closeness to the center in [0, 1]; 1 at the exact center, 0 at a corner.
pub fn center_bonus(board: &Board, pos: Pos) -> f64 {
    let half = (board.size() as f64 - 1.0) / 2.0;
    let max_sq = half * half * 2.0;
    if max_sq <= 0.0 {
        return 1.0;
    }
    (1.0 - pos.center_distance_sq(board.size()) / max_sq).max(0.0)
}

/// Score an empty cell for `mover`.
///
/// Occupied or off-board cells score [`PatternScore::INVALID`].
pub fn score_move<R: Rng + ?Sized>(
    board: &Board,
    pos: Pos,
    mover: Stone,
    ctx: &ScoreContext,
    rng: &mut R,
) -> f64 {
    if !board.contains(pos) || !board.is_empty(pos) || mover == Stone::Empty {
        return PatternScore::INVALID;
    }
    let opponent = mover.opponent();

    if completes_win(board, pos, mover) {
        return PatternScore::WIN;
    }
    if completes_win(board, pos, opponent) {
        return PatternScore::BLOCK_WIN;
    }

    let mut score = 0.0;

    let own = ShapeFlags::at(board, pos, mover);
    if own.open_four {
        score += PatternScore::OPEN_FOUR;
    }
    if own.semi_four {
        score += PatternScore::SEMI_FOUR;
    }
    if own.open_three {
        score += PatternScore::OPEN_THREE;
    }

    let theirs = ShapeFlags::at(board, pos, opponent);
    if theirs.open_four {
        score += ctx.weights.block_open_four;
    }
    if theirs.semi_four {
        score += ctx.weights.block_semi_four;
    }
    if theirs.open_three {
        score += ctx.weights.block_open_three;
    }

    for line in scan_all(board, pos, mover) {
        score += f64::from(line.length) * PatternScore::LINE_LENGTH
            + f64::from(line.open_ends) * PatternScore::LINE_OPEN_END;
    }

    if board.has_neighbor(pos, ctx.near_radius) {
        score += ctx.weights.neighbor;
    }

    score += center_bonus(board, pos) * ctx.center_scale * ctx.center_phase;

    if ctx.jitter > 0.0 {
        score += rng.gen_range(-ctx.jitter..=ctx.jitter);
    }

    score
}
