//! Line-clear processing on piece lock
//!
//! Merging the piece is the only way the board changes during play. Full rows
//! are then removed, the stack above them drops, and empty rows fill the top.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::pieces::Tetromino;
use crate::types::LineClearEvent;

/// Outcome of one lock
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineClearResult {
    /// Original indices of the cleared rows, top to bottom
    pub rows: ArrayVec<usize, 4>,
    pub lines_cleared: u8,
}

impl LineClearResult {
    pub fn is_tetris(&self) -> bool {
        self.lines_cleared == 4
    }

    pub fn to_event(&self) -> LineClearEvent {
        LineClearEvent {
            rows_cleared: self.rows.to_vec(),
            lines_cleared: self.lines_cleared,
        }
    }
}

/// Write the piece's minos into the board. Minos above the top edge are dropped.
pub fn merge_piece(board: &mut Board, piece: &Tetromino) {
    for (x, y) in piece.cells() {
        if y >= 0 {
            board.set(x, y, Some(piece.kind));
        }
    }
}

/// Merge the locked piece, then clear any rows it completed.
pub fn process_lock(board: &mut Board, piece: &Tetromino) -> LineClearResult {
    merge_piece(board, piece);
    let rows = board.clear_full_rows();
    let lines_cleared = rows.len() as u8;
    LineClearResult {
        rows,
        lines_cleared,
    }
}
