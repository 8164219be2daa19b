//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameCommand`]s. Holding a
//! key relies on the terminal's own key repeat; there is no DAS/ARR layer.

pub mod map;

pub use blockfall_types as types;

pub use map::{map_key, should_quit, InputIntent};
