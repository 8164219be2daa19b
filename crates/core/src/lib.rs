//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the game rules and state management. It has no
//! dependencies on the terminal, the clock, or persistence:
//!
//! - **Deterministic**: the same seed and command sequence produce identical games
//! - **Testable**: every rule is a plain function or a method on [`GameState`]
//! - **Portable**: runs headless, in the terminal front end, or in benchmarks
//!
//! # Module Structure
//!
//! - [`board`]: grid storage, bounds-checked queries, full-row removal
//! - [`pieces`]: the seven shapes and their rotation states
//! - [`collision`]: legality of a placement, shifts, rotations, drop distance
//! - [`line_clear`]: merge a locked piece and clear the rows it completed
//! - [`scoring`]: line points, drop bonuses, level curve, gravity interval
//! - [`config`]: tunable constants with a typed patch and validation
//! - [`effects`]: transient flash / shake / particle state after a clear
//! - [`rng`]: seeded LCG and 7-bag piece queue
//! - [`game_state`]: one game, from first spawn to game over
//!
//! # Game Rules
//!
//! - **Rotate-or-reject**: a blocked rotation is refused, never kicked
//! - **Lock on contact**: a piece locks as soon as a drop step cannot advance
//! - **Level curve**: one level per N lines, line points scale with the level
//!
//! # Example
//!
//! ```
//! use blockfall_core::{GameConfig, GameState};
//!
//! let mut game = GameState::new(GameConfig::default(), 12345);
//! game.move_piece(1);
//! game.rotate();
//! game.hard_drop();
//!
//! // Hard drop awards points for every row descended
//! assert!(game.score() > 0);
//! assert_eq!(game.pieces_placed(), 1);
//! ```

pub mod board;
pub mod collision;
pub mod config;
pub mod effects;
pub mod game_state;
pub mod line_clear;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

pub use board::{Board, CellQuery};
pub use config::{ConfigError, ConfigViolation, GameConfig, GameConfigPatch};
pub use effects::{LineEffectState, Particle};
pub use game_state::GameState;
pub use line_clear::{process_lock, LineClearResult};
pub use pieces::{shape_for, PieceShape, Tetromino};
pub use rng::{PieceQueue, SimpleRng};
pub use scoring::{DropKind, ScoreOutcome};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
