use crate::effects::LineEffectState;
use crate::pieces::{shape_for, Tetromino};
use crate::types::{Cell, PieceKind, Rotation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl ActiveSnapshot {
    /// Board coordinates of the four minos
    pub fn cells(&self) -> [(i8, i8); 4] {
        shape_for(self.kind, self.rotation).map(|(dx, dy)| (self.x + dx, self.y + dy))
    }
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

/// Read-only copy of a game for rendering and tests
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    /// Row-major cells, `height * width` long
    pub board: Vec<Cell>,
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: Option<PieceKind>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub tetrises: u32,
    pub pieces_placed: u32,
    pub drop_interval_ms: u32,
    pub paused: bool,
    pub game_over: bool,
    pub line_effect: LineEffectState,
    pub seed: u32,
}

impl GameSnapshot {
    pub fn cell(&self, x: u8, y: u8) -> Cell {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.board[y as usize * self.width as usize + x as usize]
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}
