//! Movement and collision rules
//!
//! Pure predicates over a board and a candidate placement. Nothing here
//! mutates the board; the game state applies whatever placement is returned.

use crate::board::Board;
use crate::pieces::Tetromino;

/// Offsets tried after a rotation, in order.
///
/// Only the in-place rotation is attempted: a rotation blocked by a wall or
/// the stack is rejected rather than nudged sideways.
const ROTATION_OFFSETS: [(i8, i8); 1] = [(0, 0)];

/// A placement is legal when every mino is inside the side walls, above the
/// floor and on an empty cell. Minos above row 0 are allowed.
pub fn is_legal(board: &Board, piece: &Tetromino) -> bool {
    piece
        .cells()
        .iter()
        .all(|&(x, y)| board.cell_at(x, y).is_free())
}

/// Shift by `(dx, dy)`; `None` when the shifted placement is illegal
pub fn try_shift(board: &Board, piece: &Tetromino, dx: i8, dy: i8) -> Option<Tetromino> {
    let moved = piece.shifted(dx, dy);
    is_legal(board, &moved).then_some(moved)
}

/// Rotate clockwise, returning the resolved placement.
///
/// Pieces with a single rotation state resolve to themselves.
pub fn try_rotate(board: &Board, piece: &Tetromino) -> Option<Tetromino> {
    if piece.kind.rotation_states() == 1 {
        return Some(*piece);
    }
    let rotated = piece.rotated();
    ROTATION_OFFSETS
        .iter()
        .map(|&(dx, dy)| rotated.shifted(dx, dy))
        .find(|candidate| is_legal(board, candidate))
}

/// Rows the piece can still fall before resting
pub fn drop_distance(board: &Board, piece: &Tetromino) -> u32 {
    let mut landed = *piece;
    let mut distance = 0;
    while let Some(next) = try_shift(board, &landed, 0, 1) {
        landed = next;
        distance += 1;
    }
    distance
}

/// Landing placement of a hard drop
pub fn ghost(board: &Board, piece: &Tetromino) -> Tetromino {
    piece.shifted(0, drop_distance(board, piece) as i8)
}

pub fn is_grounded(board: &Board, piece: &Tetromino) -> bool {
    !is_legal(board, &piece.shifted(0, 1))
}
