//! Game rules for Renju-restricted Omok
//!
//! This module implements the rule set:
//! - Line scanning (run length and open ends along four axes)
//! - Win conditions (exact five for Black, five or more for White)
//! - Forbidden moves for Black (overline, double-three, double-four)

pub mod forbidden;
pub mod line;
pub mod win;

// Re-exports for convenient access
pub use forbidden::{is_forbidden, is_valid_move, ForbiddenReason};
pub use line::{scan, scan_all, LinePattern, ShapeFlags};
pub use win::{completes_win, is_win, is_winning_length, winning_line};
