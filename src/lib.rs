//! Omok engine with Renju restrictions for Black
//!
//! A five-in-a-row engine on a square board (default 15x15):
//! - Black moves first and wins only with exactly five in a row
//! - White wins with five or more
//! - Black may not play overlines, double-threes or double-fours
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board representation and coordinates
//! - [`rules`]: Line scanning, win and forbidden-move detection
//! - [`game`]: Turn-taking game state machine
//! - [`eval`]: Candidate generation and heuristic move scoring
//! - [`search`]: Forced tactical replies
//! - [`engine`]: Move selector integrating all components
//! - [`advisory`]: Optional external move suggestions
//! - [`session`]: Locked game sessions and their registry
//! - [`ui`]: Desktop front-end
//!
//! # Quick Start
//!
//! ```
//! use omok::{DifficultyProfile, GameEngine, MoveSelector, Pos, Stone};
//! use rand::SeedableRng;
//!
//! let mut game = GameEngine::new(15).unwrap();
//! game.apply(Pos::new(7, 7), Stone::Black).unwrap();
//!
//! // Engine answers as White
//! let selector = MoveSelector::new();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let selection = selector
//!     .select_move(game.board(), Stone::White, &DifficultyProfile::advanced(), &game.history(), &mut rng)
//!     .unwrap();
//! game.apply(selection.pos, Stone::White).unwrap();
//! assert_eq!(game.current_turn(), Stone::Black);
//! ```
//!
//! # Selection Priority
//!
//! 1. Immediate winning move
//! 2. Block the opponent's immediate win
//! 3. Block a cell where the opponent would make a four
//! 4. Block an open three (probabilistic on easier profiles)
//! 5. Heuristic scoring, optionally blended with advisory scores

pub mod advisory;
pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod profile;
pub mod rules;
pub mod search;
pub mod session;
pub mod ui;

// Re-export commonly used types for convenience
pub use advisory::{Advisor, AdvisoryRequest, HttpAdvisor};
pub use board::{Board, Pos, Stone, DEFAULT_BOARD_SIZE};
pub use config::Config;
pub use engine::{MoveSelector, MoveSource, Selection};
pub use error::{AdvisoryError, ConfigError, MoveError, SelectError, SessionError};
pub use game::{GameEngine, GameStatus, MoveRecord, Placement};
pub use profile::{Difficulty, DifficultyProfile, ProfileSet};
pub use rules::ForbiddenReason;
pub use search::ForcedKind;
pub use session::{GameSnapshot, Session, SessionRegistry};
