//! Move selection integrating all evaluation components
//!
//! The selector picks a move for the side to play. It runs in phases:
//!
//! 1. **Forced check**: wins, blocks of wins, and threat replies
//! 2. **Candidate scoring**: heuristic score for every nearby cell
//! 3. **Advisory blend**: optional outside scores mixed into the local ones
//! 4. **Final pick**: argmax, or softmax sampling over the top K
//!
//! When the selector plays Black, forbidden cells are never returned.
//!
//! # Example
//!
//! ```
//! use omok::{Board, DifficultyProfile, MoveSelector, Pos, Stone};
//! use rand::SeedableRng;
//!
//! let mut board = Board::new(15).unwrap();
//! board.place_stone(Pos::new(7, 7), Stone::Black);
//!
//! let selector = MoveSelector::new();
//! let profile = DifficultyProfile::advanced();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let selection = selector
//!     .select_move(&board, Stone::White, &profile, &[], &mut rng)
//!     .unwrap();
//! assert!(board.is_empty(selection.pos));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::advisory::{
    Advice, AdvisoryRequest, Advisor, DEFAULT_HISTORY_WINDOW, DEFAULT_MAX_CANDIDATES,
};
use crate::board::{Board, Pos, Stone};
use crate::error::{AdvisoryError, SelectError};
use crate::eval::{generate, score_move, ScoreContext};
use crate::game::MoveRecord;
use crate::profile::DifficultyProfile;
use crate::rules::is_valid_move;
use crate::search::{find_forced, ForcedKind};

/// Which phase produced the selected move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    /// A forced tactical reply
    Forced(ForcedKind),
    /// Local heuristic scores only
    Heuristic,
    /// Local scores blended with advisory scores
    Blended,
}

impl fmt::Display for MoveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveSource::Forced(kind) => write!(f, "forced ({kind})"),
            MoveSource::Heuristic => f.write_str("heuristic"),
            MoveSource::Blended => f.write_str("blended"),
        }
    }
}

/// Result of a move selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Chosen cell; always empty and legal for the mover on the input board
    pub pos: Pos,
    /// Score of the chosen cell (blended when advisory was used)
    pub score: f64,
    pub source: MoveSource,
    /// Set when the advisory step failed and local scoring was used instead
    pub warning: Option<String>,
    /// Time taken in milliseconds
    pub time_ms: u64,
}

/// Move selector.
///
/// Holds the optional advisory collaborator and its request limits; all
/// tuning comes from the [`DifficultyProfile`] passed to each call.
#[derive(Clone)]
pub struct MoveSelector {
    advisor: Option<Arc<dyn Advisor>>,
    history_window: usize,
    max_advisory: usize,
}

impl fmt::Debug for MoveSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveSelector")
            .field("advisor", &self.advisor.is_some())
            .field("history_window", &self.history_window)
            .field("max_advisory", &self.max_advisory)
            .finish()
    }
}

impl Default for MoveSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveSelector {
    /// Selector without an advisor
    pub fn new() -> Self {
        Self {
            advisor: None,
            history_window: DEFAULT_HISTORY_WINDOW,
            max_advisory: DEFAULT_MAX_CANDIDATES,
        }
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn Advisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    /// Set the history window sent to the advisor and the number of
    /// advisory candidates kept per response.
    pub fn with_limits(mut self, history_window: usize, max_advisory: usize) -> Self {
        self.history_window = history_window;
        self.max_advisory = max_advisory;
        self
    }

    pub fn has_advisor(&self) -> bool {
        self.advisor.is_some()
    }

    /// Pick a move for `mover` on `board`.
    ///
    /// Fails with [`SelectError::NoCandidates`] only when no empty cell is
    /// legal for `mover` (normally a full board).
    pub fn select_move<R: Rng + ?Sized>(
        &self,
        board: &Board,
        mover: Stone,
        profile: &DifficultyProfile,
        history: &[MoveRecord],
        rng: &mut R,
    ) -> Result<Selection, SelectError> {
        let start = Instant::now();
        if mover == Stone::Empty {
            return Err(SelectError::NoMover);
        }
        let ctx = ScoreContext::new(board, profile);

        // Phase 1: forced replies
        if let Some(forced) = find_forced(board, mover, profile, &ctx, rng) {
            info!(pos = %forced.pos, kind = %forced.kind, %mover, "forced move");
            return Ok(Selection {
                pos: forced.pos,
                score: forced.score,
                source: MoveSource::Forced(forced.kind),
                warning: None,
                time_ms: start.elapsed().as_millis() as u64,
            });
        }

        // Phase 2: local scoring
        let cells = legal_candidates(board, mover, profile);
        if cells.is_empty() {
            return Err(SelectError::NoCandidates);
        }
        let mut scored: Vec<(Pos, f64)> = cells
            .into_iter()
            .map(|pos| (pos, score_move(board, pos, mover, &ctx, rng)))
            .collect();

        // Phase 3: advisory blend
        let mut source = MoveSource::Heuristic;
        let mut warning = None;
        if profile.uses_advisory {
            if let Some(advisor) = &self.advisor {
                match self.consult(advisor.as_ref(), board, mover, profile, history) {
                    Ok(advice) => {
                        if blend(&mut scored, &advice, board, mover, profile, &ctx, rng) {
                            source = MoveSource::Blended;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "advisory unavailable, using local scores");
                        warning = Some(e.to_string());
                    }
                }
            }
        }

        // Phase 4: final pick
        sort_by_score(&mut scored);
        let (pos, score) = pick(&scored, profile, rng).ok_or(SelectError::NoCandidates)?;
        debug!(%pos, score, %source, pool = scored.len(), "selected move");

        Ok(Selection {
            pos,
            score,
            source,
            warning,
            time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Hint for a human player: the advanced profile, deterministic and
    /// without advisory input.
    pub fn suggest_move<R: Rng + ?Sized>(
        &self,
        board: &Board,
        mover: Stone,
        history: &[MoveRecord],
        rng: &mut R,
    ) -> Result<Selection, SelectError> {
        let mut profile = DifficultyProfile::advanced().deterministic();
        profile.uses_advisory = false;
        self.select_move(board, mover, &profile, history, rng)
    }

    fn consult(
        &self,
        advisor: &dyn Advisor,
        board: &Board,
        mover: Stone,
        profile: &DifficultyProfile,
        history: &[MoveRecord],
    ) -> Result<Advice, AdvisoryError> {
        let request =
            AdvisoryRequest::new(board, mover, profile.difficulty, history, self.history_window);
        let raw = advisor.advise(&request)?;
        let played: Vec<Pos> = history.iter().map(MoveRecord::pos).collect();
        let advice = Advice::from_value(&raw, board, &played, self.max_advisory)?;
        if advice.is_empty() {
            return Err(AdvisoryError::NoSuggestion);
        }
        Ok(advice)
    }
}

/// Candidate cells that are legal for `mover`, falling back to every
/// legal empty cell when the generator comes up empty.
fn legal_candidates(board: &Board, mover: Stone, profile: &DifficultyProfile) -> Vec<Pos> {
    let near: Vec<Pos> = generate(board, profile)
        .into_iter()
        .filter(|&pos| is_valid_move(board, pos, mover))
        .collect();
    if !near.is_empty() {
        return near;
    }
    board
        .empties()
        .filter(|&pos| is_valid_move(board, pos, mover))
        .collect()
}

/// Mix advisory scores into the local pool. Returns true if anything was
/// blended.
fn blend<R: Rng + ?Sized>(
    scored: &mut Vec<(Pos, f64)>,
    advice: &Advice,
    board: &Board,
    mover: Stone,
    profile: &DifficultyProfile,
    ctx: &ScoreContext,
    rng: &mut R,
) -> bool {
    let alpha = profile.advisory_alpha.clamp(0.0, 1.0);
    let mut index: HashMap<Pos, usize> = scored
        .iter()
        .enumerate()
        .map(|(i, &(pos, _))| (pos, i))
        .collect();
    let mut blended = false;

    for cand in &advice.candidates {
        if !is_valid_move(board, cand.pos, mover) {
            debug!(pos = %cand.pos, "advisory candidate not legal for mover");
            continue;
        }
        let slot = match index.get(&cand.pos) {
            Some(&i) => i,
            None => {
                let local = score_move(board, cand.pos, mover, ctx, rng);
                scored.push((cand.pos, local));
                index.insert(cand.pos, scored.len() - 1);
                scored.len() - 1
            }
        };
        let local = scored[slot].1;
        scored[slot].1 = alpha * cand.score + (1.0 - alpha) * local;
        blended = true;
    }

    // A bare pick without scored candidates joins the pool at its local score
    if advice.candidates.is_empty() {
        if let Some(pos) = advice.chosen {
            if !index.contains_key(&pos) && is_valid_move(board, pos, mover) {
                scored.push((pos, score_move(board, pos, mover, ctx, rng)));
            }
        }
    }

    blended
}

/// Stable sort by descending score
fn sort_by_score(scored: &mut [(Pos, f64)]) {
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
}

/// Pick from a pool sorted best-first.
fn pick<R: Rng + ?Sized>(
    scored: &[(Pos, f64)],
    profile: &DifficultyProfile,
    rng: &mut R,
) -> Option<(Pos, f64)> {
    let best = *scored.first()?;
    if profile.top_k <= 1 || profile.temperature <= 1e-9 {
        return Some(best);
    }

    let top = &scored[..profile.top_k.min(scored.len())];
    if top.len() == 1 {
        return Some(best);
    }
    let max = best.1;
    let weights: Vec<f64> = top
        .iter()
        .map(|&(_, s)| ((s - max) / profile.temperature).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Some(best);
    }

    let mut target = rng.gen::<f64>() * total;
    for (&entry, w) in top.iter().zip(&weights) {
        if target < *w {
            return Some(entry);
        }
        target -= w;
    }
    top.last().copied()
}
