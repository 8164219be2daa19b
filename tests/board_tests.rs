//! Board tests

use blockfall::core::{Board, CellQuery};
use blockfall::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

#[test]
fn test_board_new_empty() {
    let board = Board::new(BOARD_WIDTH, BOARD_HEIGHT);
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);

    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert_eq!(board.get(x, y), Some(None), "cell ({x}, {y}) should be empty");
        }
    }
    assert_eq!(board.filled_count(), 0);
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new(10, 20);

    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(10, 0), None);
    assert_eq!(board.get(0, 20), None);
}

#[test]
fn test_board_set_and_get() {
    let mut board = Board::new(10, 20);

    assert!(board.set(5, 10, Some(PieceKind::T)));
    assert_eq!(board.get(5, 10), Some(Some(PieceKind::T)));

    assert!(board.set(5, 10, None));
    assert_eq!(board.get(5, 10), Some(None));

    assert!(!board.set(-1, 0, Some(PieceKind::T)));
    assert!(!board.set(0, 20, Some(PieceKind::T)));
}

#[test]
fn test_cell_query_above_the_top_is_empty() {
    let mut board = Board::new(10, 20);
    board.set(3, 0, Some(PieceKind::L));

    assert_eq!(board.cell_at(3, -2), CellQuery::Empty);
    assert_eq!(board.cell_at(3, 0), CellQuery::Occupied(PieceKind::L));
    assert_eq!(board.cell_at(-1, 5), CellQuery::Blocked);
    assert_eq!(board.cell_at(0, 20), CellQuery::Blocked);
    assert!(!board.cell_at(10, 5).is_free());
}

#[test]
fn test_board_is_row_full() {
    let mut board = Board::new(10, 20);
    assert!(!board.is_row_full(5));

    for x in 0..10 {
        board.set(x, 5, Some(PieceKind::T));
    }
    assert!(board.is_row_full(5));

    for x in 0..9 {
        board.set(x, 6, Some(PieceKind::I));
    }
    assert!(!board.is_row_full(6));
}

#[test]
fn test_board_clear_full_rows() {
    let mut board = Board::new(10, 20);

    for x in 0..10 {
        board.set(x, 18, Some(PieceKind::I));
        board.set(x, 19, Some(PieceKind::O));
    }
    board.set(0, 17, Some(PieceKind::T));

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[18, 19]);

    // The T dropped by the two cleared rows.
    assert_eq!(board.get(0, 19), Some(Some(PieceKind::T)));
    assert_eq!(board.filled_count(), 1);
}

#[test]
fn test_clear_non_adjacent_rows_keeps_order() {
    let mut board = Board::from_rows(
        6,
        8,
        &[
            "S.....", // 3
            "IIIIII", // 4 full
            "..J...", // 5
            "OOOOOO", // 6 full
            "T....T", // 7
        ],
    );

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[4, 6]);

    let expected = Board::from_rows(6, 8, &["S.....", "..J...", "T....T"]);
    assert_eq!(board, expected);
}

#[test]
fn test_custom_dimensions() {
    let board = Board::new(4, 64);
    assert_eq!(board.rows().count(), 64);
    assert!(board.rows().all(|row| row.len() == 4));
}
