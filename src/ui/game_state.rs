//! Game state management for the Omok GUI
//!
//! The GUI drives a [`Session`], the same locked game handle a server host
//! would use. Engine turns run on a worker thread and report back over a
//! channel; the board shown on screen is a copy refreshed after each change.

use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::engine::Selection;
use crate::error::{MoveError, SessionError};
use crate::game::{GameEngine, Placement};
use crate::profile::Difficulty;
use crate::session::{Session, SessionRegistry};
use crate::{Pos, Stone};

/// Game mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Player vs AI
    PvE { human_color: Stone },
    /// Player vs Player (hotseat)
    PvP,
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::PvE {
            human_color: Stone::Black,
        }
    }
}

type AiOutcome = Result<(Selection, Placement), SessionError>;

/// AI computation state
pub enum AiState {
    Idle,
    Thinking {
        receiver: Receiver<AiOutcome>,
        start_time: Instant,
    },
}

/// Move timer for tracking thinking time
pub struct MoveTimer {
    pub start_time: Option<Instant>,
    pub last_move_duration: Option<Duration>,
    pub ai_thinking_time: Option<Duration>,
}

impl Default for MoveTimer {
    fn default() -> Self {
        Self {
            start_time: Some(Instant::now()),
            last_move_duration: None,
            ai_thinking_time: None,
        }
    }
}

impl MoveTimer {
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn stop(&mut self) -> Duration {
        let duration = self.elapsed();
        self.last_move_duration = Some(duration);
        self.start_time = None;
        duration
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.map_or(Duration::ZERO, |t| t.elapsed())
    }

    pub fn set_ai_time(&mut self, duration: Duration) {
        self.ai_thinking_time = Some(duration);
    }
}

/// Main game state
pub struct GameState {
    pub mode: GameMode,
    /// Copy of the session's game, for rendering
    pub view: GameEngine,
    pub last_selection: Option<Selection>,
    pub ai_state: AiState,
    pub move_timer: MoveTimer,
    pub suggested_move: Option<Pos>,
    pub message: Option<String>,
    /// Last advisory degradation notice
    pub warning: Option<String>,
    registry: Arc<SessionRegistry>,
    session: Arc<Session>,
}

impl GameState {
    pub fn new(
        registry: Arc<SessionRegistry>,
        mode: GameMode,
        difficulty: Difficulty,
    ) -> Result<Self, SessionError> {
        let session = registry.create(difficulty)?;
        Ok(Self {
            mode,
            view: session.game(),
            last_selection: None,
            ai_state: AiState::Idle,
            move_timer: MoveTimer::default(),
            suggested_move: None,
            message: None,
            warning: None,
            registry,
            session,
        })
    }

    /// Replace the current session with a fresh game in `mode`.
    pub fn restart(&mut self, mode: GameMode) {
        let difficulty = self.session.difficulty();
        match Self::new(Arc::clone(&self.registry), mode, difficulty) {
            Ok(state) => {
                self.registry.remove(self.session.id());
                *self = state;
            }
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    /// Same mode, empty board
    pub fn reset(&mut self) {
        if self.is_ai_thinking() {
            return;
        }
        if let Err(e) = self.session.reset() {
            self.message = Some(e.to_string());
            return;
        }
        self.refresh();
        self.last_selection = None;
        self.move_timer = MoveTimer::default();
        self.message = None;
        self.warning = None;
    }

    pub fn difficulty(&self) -> Difficulty {
        self.session.difficulty()
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.session.set_difficulty(difficulty);
    }

    fn refresh(&mut self) {
        self.view = self.session.game();
        self.suggested_move = None;
    }

    pub fn current_turn(&self) -> Stone {
        self.view.current_turn()
    }

    pub fn is_game_over(&self) -> bool {
        self.view.is_over()
    }

    /// Check if it's the human's turn
    pub fn is_human_turn(&self) -> bool {
        match self.mode {
            GameMode::PvE { human_color } => self.current_turn() == human_color,
            GameMode::PvP => true,
        }
    }

    /// Check if it's the AI's turn
    pub fn is_ai_turn(&self) -> bool {
        match self.mode {
            GameMode::PvE { human_color } => self.current_turn() != human_color,
            GameMode::PvP => false,
        }
    }

    /// Check if AI is currently thinking
    pub fn is_ai_thinking(&self) -> bool {
        matches!(self.ai_state, AiState::Thinking { .. })
    }

    /// Attempt to place a stone at the given position
    pub fn try_place_stone(&mut self, pos: Pos) -> Result<(), String> {
        if self.is_game_over() {
            return Err(rejection_message(&MoveError::GameOver));
        }
        if self.is_ai_thinking() {
            return Err("AI is thinking".to_string());
        }
        if !self.is_human_turn() {
            return Err("Not your turn".to_string());
        }

        match self.session.play(pos) {
            Ok(_) => {
                self.move_timer.stop();
                self.refresh();
                self.message = None;
                if !self.is_game_over() {
                    self.move_timer.start();
                }
                Ok(())
            }
            Err(SessionError::Move(e)) => Err(rejection_message(&e)),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Start AI thinking
    pub fn start_ai_thinking(&mut self) {
        if !self.is_ai_turn() || self.is_ai_thinking() || self.is_game_over() {
            return;
        }

        let session = Arc::clone(&self.session);
        let (tx, rx) = channel();

        thread::spawn(move || {
            let result = session.ai_move(&mut rand::thread_rng());
            let _ = tx.send(result);
        });

        self.ai_state = AiState::Thinking {
            receiver: rx,
            start_time: Instant::now(),
        };
    }

    /// Check if AI has finished thinking
    pub fn check_ai_result(&mut self) {
        let result = match &self.ai_state {
            AiState::Thinking {
                receiver,
                start_time,
            } => match receiver.try_recv() {
                Ok(result) => Some((result, start_time.elapsed())),
                Err(std::sync::mpsc::TryRecvError::Empty) => None,
                Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                    self.ai_state = AiState::Idle;
                    self.message = Some("AI error".to_string());
                    return;
                }
            },
            AiState::Idle => None,
        };

        if let Some((outcome, elapsed)) = result {
            self.ai_state = AiState::Idle;
            self.move_timer.set_ai_time(elapsed);
            match outcome {
                Ok((selection, _)) => {
                    self.warning = selection.warning.clone();
                    self.last_selection = Some(selection);
                    self.refresh();
                    if !self.is_game_over() {
                        self.move_timer.start();
                    }
                }
                Err(SessionError::Select(_)) => {
                    self.refresh();
                    self.message = Some("No moves left".to_string());
                }
                Err(e) => {
                    self.refresh();
                    self.message = Some(e.to_string());
                }
            }
        }
    }

    /// Get AI thinking elapsed time
    pub fn ai_thinking_elapsed(&self) -> Option<Duration> {
        match &self.ai_state {
            AiState::Thinking { start_time, .. } => Some(start_time.elapsed()),
            AiState::Idle => None,
        }
    }

    /// Request a hint for the side to move
    pub fn request_suggestion(&mut self) {
        if self.is_game_over() || self.is_ai_thinking() {
            return;
        }
        match self.session.suggest(&mut rand::thread_rng()) {
            Ok(selection) => {
                self.suggested_move = Some(selection.pos);
                self.last_selection = Some(selection);
            }
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    /// Undo last move; in PvE, undo back to the human's turn
    pub fn undo(&mut self) {
        if self.view.moves().is_empty() || self.is_ai_thinking() {
            return;
        }

        let count = match self.mode {
            GameMode::PvE { human_color } => {
                // Take back the engine reply along with the human move
                let last = self.view.history().last().map(|r| r.player);
                if last == Some(human_color) {
                    1
                } else {
                    self.view.moves().len().min(2)
                }
            }
            GameMode::PvP => 1,
        };

        self.session.undo(count);
        self.refresh();
        self.message = None;
        self.move_timer.start();
    }
}

/// Player-facing text for a refused move
pub fn rejection_message(error: &MoveError) -> String {
    match error {
        MoveError::GameOver => "Game is over".to_string(),
        MoveError::WrongTurn { expected } => format!("Not your turn ({expected} to move)"),
        MoveError::OutOfBounds(_) => "Outside the board".to_string(),
        MoveError::Occupied(_) => "That point is taken".to_string(),
        MoveError::Forbidden(reason) => format!("Forbidden for Black: {reason}"),
    }
}
