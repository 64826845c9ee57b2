//! Game engine: board, turn and result bookkeeping
//!
//! The engine is a two-state machine. While in progress, every legal move
//! either toggles the mover or ends the game with a winner; once terminal,
//! nothing more is accepted. Rejected moves never change any state.

use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardError, Pos, Stone};
use crate::error::MoveError;
use crate::rules::{is_forbidden, is_win, winning_line};

/// Game lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Terminal,
}

/// Outcome of an accepted move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Stone placed, turn passes to `next`
    Placed { next: Stone },
    /// Stone placed and it won the game
    Won { winner: Stone },
    /// Stone filled the last empty cell without winning
    Draw,
}

impl Placement {
    pub fn message(&self) -> String {
        match self {
            Placement::Placed { .. } => "stone placed".to_string(),
            Placement::Won { winner } => format!("game over: {winner} wins"),
            Placement::Draw => "game over: draw".to_string(),
        }
    }
}

/// One entry of the wire-format move history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub x: u8,
    pub y: u8,
    pub player: Stone,
    pub move_no: u32,
}

impl MoveRecord {
    pub fn pos(&self) -> Pos {
        Pos::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEngine {
    board: Board,
    current: Stone,
    winner: Option<Stone>,
    status: GameStatus,
    moves: Vec<Pos>,
}

impl GameEngine {
    pub fn new(size: usize) -> Result<Self, BoardError> {
        Ok(Self::with_board(Board::new(size)?))
    }

    fn with_board(board: Board) -> Self {
        let status = if board.is_full() {
            GameStatus::Terminal
        } else {
            GameStatus::InProgress
        };
        Self {
            board,
            current: Stone::Black,
            winner: None,
            status,
            moves: Vec::new(),
        }
    }

    /// Rebuild a game by replaying a wire history on an empty board.
    /// Stops at the first move the rules refuse.
    pub fn replay(size: usize, history: &[MoveRecord]) -> Result<Self, ReplayError> {
        let mut game = Self::new(size).map_err(ReplayError::Board)?;
        for (i, record) in history.iter().enumerate() {
            game.apply(record.pos(), record.player)
                .map_err(|source| ReplayError::Move { index: i, source })?;
        }
        Ok(game)
    }

    /// Attempt to play `pos` as `player`.
    ///
    /// Rejections, in order: game over, wrong turn, out of bounds, occupied,
    /// forbidden for black. Black keeps the turn after a forbidden attempt.
    pub fn apply(&mut self, pos: Pos, player: Stone) -> Result<Placement, MoveError> {
        if self.status == GameStatus::Terminal {
            return Err(MoveError::GameOver);
        }
        if player != self.current {
            return Err(MoveError::WrongTurn { expected: self.current });
        }
        if !self.board.contains(pos) {
            return Err(MoveError::OutOfBounds(pos));
        }
        if !self.board.is_empty(pos) {
            return Err(MoveError::Occupied(pos));
        }
        if player == Stone::Black {
            if let Some(reason) = is_forbidden(&self.board, pos) {
                tracing::debug!(%pos, %reason, "forbidden black move refused");
                return Err(MoveError::Forbidden(reason));
            }
        }

        self.board.place_stone(pos, player);
        self.moves.push(pos);

        if is_win(&self.board, pos) {
            self.winner = Some(player);
            self.status = GameStatus::Terminal;
            tracing::info!(%pos, winner = %player, moves = self.moves.len(), "game won");
            return Ok(Placement::Won { winner: player });
        }
        if self.board.is_full() {
            self.status = GameStatus::Terminal;
            tracing::info!(%pos, moves = self.moves.len(), "board full, game drawn");
            return Ok(Placement::Draw);
        }

        self.current = player.opponent();
        Ok(Placement::Placed { next: self.current })
    }

    /// Take back the last `count` moves by replaying the rest.
    pub fn undo(&mut self, count: usize) {
        let keep = self.moves.len().saturating_sub(count);
        let history: Vec<MoveRecord> = self.history().into_iter().take(keep).collect();
        let mut game = Self::with_board(
            Board::new(self.board.size()).unwrap_or_default(),
        );
        for record in history {
            // Every kept move was accepted before, so replaying cannot fail.
            if game.apply(record.pos(), record.player).is_err() {
                tracing::error!(pos = %record.pos(), "undo replay diverged");
                return;
            }
        }
        *self = game;
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn current_turn(&self) -> Stone {
        self.current
    }

    #[inline]
    pub fn winner(&self) -> Option<Stone> {
        self.winner
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Terminal
    }

    /// Terminal without a winner: the board filled up
    pub fn is_draw(&self) -> bool {
        self.winner.is_none() && self.board.is_full()
    }

    pub fn moves(&self) -> &[Pos] {
        &self.moves
    }

    pub fn last_move(&self) -> Option<Pos> {
        self.moves.last().copied()
    }

    /// Winning run, once the game is won
    pub fn winning_line(&self) -> Option<Vec<Pos>> {
        self.winner?;
        winning_line(&self.board, self.last_move()?)
    }

    /// Move history in wire form. Black always moves first and rejected
    /// moves never enter the list, so colors alternate.
    pub fn history(&self) -> Vec<MoveRecord> {
        let mut player = Stone::Black;
        self.moves
            .iter()
            .enumerate()
            .map(|(i, pos)| {
                let record = MoveRecord {
                    x: pos.x,
                    y: pos.y,
                    player,
                    move_no: i as u32 + 1,
                };
                player = player.opponent();
                record
            })
            .collect()
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::with_board(Board::default())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error(transparent)]
    Board(BoardError),
    #[error("history entry {index} rejected: {source}")]
    Move { index: usize, source: MoveError },
}
