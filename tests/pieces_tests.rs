//! Pieces and collision tests - shapes, rotate-or-reject, drop distance

use blockfall::core::collision::{drop_distance, is_legal, try_rotate, try_shift};
use blockfall::core::pieces::shape_matrix;
use blockfall::core::{shape_for, Board, Tetromino};
use blockfall::types::{PieceKind, Rotation};

// ============== Shape Tests ==============

#[test]
fn test_i_piece_shapes() {
    assert_eq!(shape_for(PieceKind::I, Rotation::North), [(0, 1), (1, 1), (2, 1), (3, 1)]);
    assert_eq!(shape_for(PieceKind::I, Rotation::East), [(2, 0), (2, 1), (2, 2), (2, 3)]);
}

#[test]
fn test_o_piece_shapes() {
    let north = shape_for(PieceKind::O, Rotation::North);
    assert_eq!(north, [(1, 0), (2, 0), (1, 1), (2, 1)]);
    for rotation in [Rotation::East, Rotation::South, Rotation::West] {
        assert_eq!(shape_for(PieceKind::O, rotation), north);
    }
}

#[test]
fn test_t_piece_shapes() {
    assert_eq!(shape_for(PieceKind::T, Rotation::North), [(1, 0), (0, 1), (1, 1), (2, 1)]);
    assert_eq!(shape_for(PieceKind::T, Rotation::East), [(1, 0), (1, 1), (2, 1), (1, 2)]);
    assert_eq!(shape_for(PieceKind::T, Rotation::South), [(0, 1), (1, 1), (2, 1), (1, 2)]);
    assert_eq!(shape_for(PieceKind::T, Rotation::West), [(1, 0), (0, 1), (1, 1), (1, 2)]);
}

#[test]
fn test_shape_matrix_matches_offsets() {
    let matrix = shape_matrix(PieceKind::T, Rotation::North);
    assert_eq!(matrix[0], [false, true, false, false]);
    assert_eq!(matrix[1], [true, true, true, false]);
    assert!(matrix[2].iter().chain(matrix[3].iter()).all(|&c| !c));
}

// ============== Movement Tests ==============

#[test]
fn test_spawn_is_centered() {
    let piece = Tetromino::spawn(PieceKind::T, 10);
    assert_eq!((piece.x, piece.y), (3, 0));
    assert_eq!(piece.rotation, Rotation::North);
}

#[test]
fn test_walls_reject_shifts() {
    let board = Board::new(10, 20);
    let mut piece = Tetromino::spawn(PieceKind::O, 10);
    while let Some(moved) = try_shift(&board, &piece, -1, 0) {
        piece = moved;
    }
    // The square sits in columns 1..=2 of its box.
    assert_eq!(piece.x, -1);
    assert!(is_legal(&board, &piece));
    assert_eq!(try_shift(&board, &piece, -1, 0), None);
}

#[test]
fn test_piece_may_hang_above_the_top() {
    let board = Board::new(10, 20);
    let piece = Tetromino::new(PieceKind::I, Rotation::East, 3, -3);
    assert!(is_legal(&board, &piece));
}

#[test]
fn test_rotation_is_rejected_not_kicked() {
    // A vertical bar flush against the left wall cannot turn horizontal.
    let board = Board::new(10, 20);
    let bar = Tetromino::new(PieceKind::I, Rotation::East, -2, 5);
    assert!(is_legal(&board, &bar));
    assert_eq!(try_rotate(&board, &bar), None);

    let free = Tetromino::new(PieceKind::I, Rotation::East, 3, 5);
    assert_eq!(try_rotate(&board, &free).map(|p| p.rotation), Some(Rotation::North));
}

#[test]
fn test_drop_distance_stops_on_stack() {
    let board = Board::from_rows(10, 20, &["....ZZ....", "....ZZ...."]);
    let piece = Tetromino::spawn(PieceKind::O, 10);
    // Square occupies columns 4..=5 and box rows 0..=1; the stack tops out at row 18.
    assert_eq!(drop_distance(&board, &piece), 16);

    let empty = Board::new(10, 20);
    assert_eq!(drop_distance(&empty, &piece), 18);
}
