//! Error types shared across the engine

use thiserror::Error;

use crate::board::{BoardError, Pos, Stone};
use crate::rules::ForbiddenReason;

/// A move refused by the game engine. State is unchanged whenever one of
/// these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("game already over")]
    GameOver,
    #[error("wrong turn: {expected} to move")]
    WrongTurn { expected: Stone },
    #[error("{0} is off the board")]
    OutOfBounds(Pos),
    #[error("{0} is already occupied")]
    Occupied(Pos),
    #[error("forbidden move for black: {0}")]
    Forbidden(ForbiddenReason),
}

impl MoveError {
    /// Stable reason tag for clients
    pub fn tag(&self) -> &'static str {
        match self {
            MoveError::GameOver => "game-over",
            MoveError::WrongTurn { .. } => "wrong-turn",
            MoveError::OutOfBounds(_) => "out-of-bounds",
            MoveError::Occupied(_) => "occupied",
            MoveError::Forbidden(reason) => reason.tag(),
        }
    }
}

/// The advisory collaborator could not be used. Always recoverable.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("advisory endpoint not configured")]
    NotConfigured,
    #[error("advisory request timed out")]
    Timeout,
    #[error("advisory request failed: {0}")]
    Transport(String),
    #[error("advisory server returned status {0}")]
    Status(u16),
    #[error("malformed advisory response: {0}")]
    Malformed(String),
    #[error("advisory returned no usable suggestion")]
    NoSuggestion,
}

impl From<reqwest::Error> for AdvisoryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AdvisoryError::Timeout
        } else if e.is_decode() {
            AdvisoryError::Malformed(e.to_string())
        } else {
            AdvisoryError::Transport(e.to_string())
        }
    }
}

/// Move selection failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// Board is full; the game is a draw
    #[error("no candidate moves left")]
    NoCandidates,
    #[error("cannot select a move for an empty color")]
    NoMover,
}

/// Errors surfaced to a session host
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("game {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Select(#[from] SelectError),
    /// The selector produced a move the engine refused. This is a bug in the
    /// selection pipeline, not a user error.
    #[error("internal error: selector chose illegal move {pos} ({source})")]
    Invariant { pos: Pos, source: MoveError },
    #[error(transparent)]
    Board(#[from] BoardError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key}: cannot parse {value:?}")]
    Parse { key: String, value: String },
    #[error("{key}: {value} outside {min}..={max}")]
    Range {
        key: String,
        value: String,
        min: String,
        max: String,
    },
    /// Overridden weights let a lower score tier outrank a higher one
    #[error("{difficulty} score weights break the tier ordering")]
    Untiered { difficulty: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_tags() {
        assert_eq!(MoveError::GameOver.tag(), "game-over");
        assert_eq!(MoveError::WrongTurn { expected: Stone::White }.tag(), "wrong-turn");
        assert_eq!(MoveError::OutOfBounds(Pos::new(20, 0)).tag(), "out-of-bounds");
        assert_eq!(MoveError::Occupied(Pos::new(1, 1)).tag(), "occupied");
        assert_eq!(
            MoveError::Forbidden(ForbiddenReason::DoubleThree).tag(),
            "double-three"
        );
    }

    #[test]
    fn test_move_error_messages() {
        assert_eq!(
            MoveError::WrongTurn { expected: Stone::Black }.to_string(),
            "wrong turn: black to move"
        );
        assert_eq!(
            MoveError::Forbidden(ForbiddenReason::Overline).to_string(),
            "forbidden move for black: overline"
        );
    }
}
