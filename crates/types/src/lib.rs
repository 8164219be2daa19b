//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data: the core simulation, the game loop, the
//! statistics layer and the terminal front end all speak these types.
//!
//! # Board Dimensions
//!
//! Default playfield dimensions (configurable through `GameConfig`):
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//! - **Spawn position**: `((width - 4) / 2, 0)`
//!
//! # Default Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `INITIAL_DROP_INTERVAL_MS` | 1000 | Gravity period at level 1 |
//! | `DROP_INTERVAL_MULTIPLIER` | 0.85 | Per-level decay of the gravity period |
//! | `MIN_DROP_INTERVAL_MS` | 100 | Gravity floor |
//! | `LINE_EFFECT_MS` | 500 | Display time of the line-clear effect |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{GameCommand, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(piece.rotation_states(), 4);
//!
//! assert_eq!(Rotation::from_index(5), Rotation::East);
//!
//! assert_eq!(GameCommand::from_str("hardDrop"), Some(GameCommand::HardDrop));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Default board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Default board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Gravity interval at level 1
pub const INITIAL_DROP_INTERVAL_MS: u32 = 1000;

/// Multiplicative decay applied to the gravity interval per level
pub const DROP_INTERVAL_MULTIPLIER: f64 = 0.85;

/// Gravity interval floor
pub const MIN_DROP_INTERVAL_MS: u32 = 100;

/// How long the line-clear flash/shake/particles stay visible
pub const LINE_EFFECT_MS: u32 = 500;

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Highest reachable level
pub const MAX_LEVEL: u32 = 20;

/// Line clear scoring table, multiplied by the current level.
///
/// - 1 line: 100
/// - 2 lines: 300
/// - 3 lines: 500
/// - 4 lines: 800 (Tetris!)
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Points per cell descended by a soft drop
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per cell descended by a hard drop
pub const HARD_DROP_POINTS: u32 = 2;

/// Number of entries kept in the high score table
pub const HIGH_SCORE_CAPACITY: usize = 10;

/// Inactivity after which a play session is closed (30 minutes)
pub const SESSION_TIMEOUT_MS: u64 = 30 * 60 * 1000;

/// Milliseconds in a day, used by the period filter
pub const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// 24-bit display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and color:
/// - **I**: Cyan, horizontal bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Magenta, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Number of distinct rotation states.
    ///
    /// The square never changes under rotation and the bar only has a
    /// horizontal and a vertical orientation.
    pub fn rotation_states(&self) -> u8 {
        match self {
            PieceKind::O => 1,
            PieceKind::I => 2,
            _ => 4,
        }
    }

    /// Display color for locked and falling cells of this kind
    pub fn color(&self) -> Rgb {
        match self {
            PieceKind::I => Rgb::new(0, 240, 240),
            PieceKind::O => Rgb::new(240, 240, 0),
            PieceKind::T => Rgb::new(160, 0, 240),
            PieceKind::S => Rgb::new(0, 240, 0),
            PieceKind::Z => Rgb::new(240, 0, 0),
            PieceKind::J => Rgb::new(0, 0, 240),
            PieceKind::L => Rgb::new(240, 160, 0),
        }
    }
}

/// Rotation states, clockwise from the spawn orientation
///
/// - **North**: Spawn orientation (index 0)
/// - **East**: Rotated 90° clockwise (index 1)
/// - **South**: Rotated 180° (index 2)
/// - **West**: Rotated 270° clockwise (index 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotation index in `0..4`
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Build a rotation from any index; wraps modulo 4
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled with the specified piece kind
pub type Cell = Option<PieceKind>;

/// Discrete commands accepted by the game loop
///
/// These are produced by the input layer (keyboard, tests, scripts) and are
/// applied synchronously between gravity ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameCommand {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell (soft drop scoring); locks when it cannot advance
    SoftDrop,
    /// Drop piece to the lowest legal row and lock it
    HardDrop,
    /// Rotate piece to its next rotation state
    Rotate,
    /// Suspend the gravity timer
    Pause,
    /// Resume a paused game
    Resume,
    /// Replace the game with a fresh one
    Reset,
}

impl GameCommand {
    /// Parse a command from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameCommand;
    ///
    /// assert_eq!(GameCommand::from_str("moveLeft"), Some(GameCommand::MoveLeft));
    /// assert_eq!(GameCommand::from_str("RESUME"), Some(GameCommand::Resume));
    /// assert_eq!(GameCommand::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameCommand::MoveLeft),
            "moveright" => Some(GameCommand::MoveRight),
            "softdrop" => Some(GameCommand::SoftDrop),
            "harddrop" => Some(GameCommand::HardDrop),
            "rotate" => Some(GameCommand::Rotate),
            "pause" => Some(GameCommand::Pause),
            "resume" => Some(GameCommand::Resume),
            "reset" => Some(GameCommand::Reset),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameCommand::MoveLeft => "moveLeft",
            GameCommand::MoveRight => "moveRight",
            GameCommand::SoftDrop => "softDrop",
            GameCommand::HardDrop => "hardDrop",
            GameCommand::Rotate => "rotate",
            GameCommand::Pause => "pause",
            GameCommand::Resume => "resume",
            GameCommand::Reset => "reset",
        }
    }

    /// Whether the command manipulates the active piece
    pub fn is_gameplay(&self) -> bool {
        !matches!(
            self,
            GameCommand::Pause | GameCommand::Resume | GameCommand::Reset
        )
    }
}

/// Emitted once per lock that cleared at least one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClearEvent {
    /// Original board row indices, top to bottom
    pub rows_cleared: Vec<usize>,
    /// Number of rows removed (1..=4)
    pub lines_cleared: u8,
}

impl LineClearEvent {
    pub fn is_tetris(&self) -> bool {
        self.lines_cleared == 4
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpEvent {
    pub previous_level: u32,
    pub current_level: u32,
}

/// Immutable record of one completed game.
///
/// Produced exactly once per game-over transition. Timestamps are Unix
/// milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGame {
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    /// Number of 4-line clears
    pub tetrises: u32,
    pub timestamp: u64,
    #[serde(default)]
    pub duration_ms: u64,
}

/// Events published by the game loop for the UI and audio layers.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The active piece merged into the board
    PieceLocked { kind: PieceKind },
    LineClear(LineClearEvent),
    LevelUp(LevelUpEvent),
    GameOver(SessionGame),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scoring_table_is_strictly_increasing() {
        assert!(LINE_SCORES.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(LINE_SCORES[4], 800);
    }

    #[test]
    fn rotation_index_roundtrip() {
        for i in 0..4u8 {
            assert_eq!(Rotation::from_index(i).index(), i);
        }
        assert_eq!(Rotation::from_index(7), Rotation::West);
    }

    #[test]
    fn rotation_states_follow_symmetry() {
        assert_eq!(PieceKind::O.rotation_states(), 1);
        assert_eq!(PieceKind::I.rotation_states(), 2);
        for kind in [PieceKind::T, PieceKind::S, PieceKind::Z, PieceKind::J, PieceKind::L] {
            assert_eq!(kind.rotation_states(), 4);
        }
    }

    #[test]
    fn commands_roundtrip_through_names() {
        for cmd in [
            GameCommand::MoveLeft,
            GameCommand::MoveRight,
            GameCommand::SoftDrop,
            GameCommand::HardDrop,
            GameCommand::Rotate,
            GameCommand::Pause,
            GameCommand::Resume,
            GameCommand::Reset,
        ] {
            assert_eq!(GameCommand::from_str(cmd.as_str()), Some(cmd));
        }
        assert!(GameCommand::Rotate.is_gameplay());
        assert!(!GameCommand::Pause.is_gameplay());
    }
}
