//! Tactical search for Omok AI
//!
//! Contains:
//! - Forced-move detection (wins, blocks, threat replies)

pub mod forced;

pub use forced::{find_forced, ForcedKind, ForcedMove};
