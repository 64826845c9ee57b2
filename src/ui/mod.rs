//! GUI module for the Omok game
//!
//! This module provides a native Rust GUI using egui/eframe.

mod app;
mod board_view;
mod game_state;
mod theme;

pub use app::OmokApp;
pub use game_state::{rejection_message, GameMode, GameState};
