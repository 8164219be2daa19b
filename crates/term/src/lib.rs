//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal gameplay. It renders
//! snapshots into a simple framebuffer that is flushed to the terminal as
//! diffs, plus plain-text reports for the statistics subcommands.
//!
//! Nothing here reads or mutates a live game; it only sees
//! [`GameSnapshot`](crate::core::GameSnapshot)s and finished records.

pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod report;

pub use blockfall_core as core;
pub use blockfall_stats as stats;
pub use blockfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, PanelExtras, Viewport};
pub use renderer::{encode_frame_into, DrawStats, TerminalRenderer};
pub use report::{format_date, format_duration, high_score_lines, stats_lines};
