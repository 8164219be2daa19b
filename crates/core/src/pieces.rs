//! Pieces module - tetromino shapes and rotation states
//!
//! Each piece is four minos placed inside a 4x4 box. The box's top-left corner
//! is the piece position on the board. Rotation indices cycle modulo the
//! piece's symmetry count: the square has one state, the bar two, the rest four.

use crate::types::{PieceKind, Rotation};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// Get the shape (mino offsets) for a piece kind and rotation
///
/// The rotation is normalized first, so `shape_for(O, East)` is the same
/// square as `shape_for(O, North)` and the bar's South equals its North.
pub fn shape_for(kind: PieceKind, rotation: Rotation) -> PieceShape {
    let rotation = normalize(kind, rotation);
    match kind {
        PieceKind::I => i_shape(rotation),
        PieceKind::O => O_SHAPE,
        PieceKind::T => t_shape(rotation),
        PieceKind::S => s_shape(rotation),
        PieceKind::Z => z_shape(rotation),
        PieceKind::J => j_shape(rotation),
        PieceKind::L => l_shape(rotation),
    }
}

/// Reduce a rotation to one of the piece's distinct states
pub fn normalize(kind: PieceKind, rotation: Rotation) -> Rotation {
    Rotation::from_index(rotation.index() % kind.rotation_states())
}

/// Next clockwise rotation state for a piece kind
///
/// ```
/// use blockfall_core::pieces::next_rotation;
/// use blockfall_core::types::{PieceKind, Rotation};
///
/// assert_eq!(next_rotation(PieceKind::T, Rotation::West), Rotation::North);
/// assert_eq!(next_rotation(PieceKind::I, Rotation::East), Rotation::North);
/// assert_eq!(next_rotation(PieceKind::O, Rotation::North), Rotation::North);
/// ```
pub fn next_rotation(kind: PieceKind, rotation: Rotation) -> Rotation {
    let states = kind.rotation_states();
    Rotation::from_index((normalize(kind, rotation).index() + 1) % states)
}

/// Shape as a 4x4 boolean matrix, indexed `[row][col]`
pub fn shape_matrix(kind: PieceKind, rotation: Rotation) -> [[bool; 4]; 4] {
    let mut matrix = [[false; 4]; 4];
    for (dx, dy) in shape_for(kind, rotation) {
        matrix[dy as usize][dx as usize] = true;
    }
    matrix
}

/// I piece: horizontal on row 1, vertical on column 2
fn i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
        _ => [(0, 1), (1, 1), (2, 1), (3, 1)],
    }
}

const O_SHAPE: PieceShape = [(1, 0), (2, 0), (1, 1), (2, 1)];

fn t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
        Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

fn j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

fn l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// The falling piece: kind, rotation and the top-left corner of its 4x4 box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    pub fn new(kind: PieceKind, rotation: Rotation, x: i8, y: i8) -> Self {
        Self {
            kind,
            rotation: normalize(kind, rotation),
            x,
            y,
        }
    }

    /// Spawn placement: horizontally centered, box at the top row
    pub fn spawn(kind: PieceKind, board_width: u8) -> Self {
        let x = (board_width as i8 - 4) / 2;
        Self::new(kind, Rotation::North, x, 0)
    }

    pub fn shape(&self) -> PieceShape {
        shape_for(self.kind, self.rotation)
    }

    /// Board coordinates of the four minos
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn rotated(&self) -> Self {
        Self {
            rotation: next_rotation(self.kind, self.rotation),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_has_four_distinct_minos_inside_the_box() {
        for kind in PieceKind::ALL {
            for r in 0..4 {
                let shape = shape_for(kind, Rotation::from_index(r));
                for (i, a) in shape.iter().enumerate() {
                    assert!((0..4).contains(&a.0) && (0..4).contains(&a.1));
                    assert!(!shape[i + 1..].contains(a), "{kind:?} duplicate mino");
                }
            }
        }
    }

    #[test]
    fn rotation_cycles_modulo_symmetry() {
        for kind in PieceKind::ALL {
            let mut rotation = Rotation::North;
            for _ in 0..kind.rotation_states() {
                rotation = next_rotation(kind, rotation);
            }
            assert_eq!(rotation, Rotation::North, "{kind:?}");
        }
    }

    #[test]
    fn bar_has_two_orientations() {
        assert_eq!(
            shape_for(PieceKind::I, Rotation::South),
            shape_for(PieceKind::I, Rotation::North)
        );
        assert_eq!(
            shape_for(PieceKind::I, Rotation::West),
            shape_for(PieceKind::I, Rotation::East)
        );
    }

    #[test]
    fn matrix_matches_offsets() {
        let m = shape_matrix(PieceKind::T, Rotation::North);
        assert_eq!(
            m,
            [
                [false, true, false, false],
                [true, true, true, false],
                [false; 4],
                [false; 4],
            ]
        );
    }

    #[test]
    fn spawn_is_centered() {
        let piece = Tetromino::spawn(PieceKind::I, 10);
        assert_eq!((piece.x, piece.y), (3, 0));
        assert_eq!(piece.cells(), [(3, 1), (4, 1), (5, 1), (6, 1)]);
    }
}
