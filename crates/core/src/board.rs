//! Board module - manages the game grid
//!
//! The board is a `width x height` grid (10x20 by default) where each cell can be
//! empty or filled with a piece kind. Uses a flat vector in row-major order.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.
//! Row 0 is the top row; pieces may hang above it (negative y) while spawning.

use arrayvec::ArrayVec;

use crate::types::{Cell, PieceKind, Rgb};

/// Result of a bounds-checked cell query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellQuery {
    /// Outside the board horizontally or below the floor
    Blocked,
    /// Inside the board, or above the top edge where nothing is ever stored
    Empty,
    Occupied(PieceKind),
}

impl CellQuery {
    pub fn is_free(&self) -> bool {
        matches!(self, CellQuery::Empty)
    }

    /// Display color of an occupied cell
    pub fn color(&self) -> Option<Rgb> {
        match self {
            CellQuery::Occupied(kind) => Some(kind.color()),
            _ => None,
        }
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Bounds-checked query used by the collision rules.
    ///
    /// Cells above the top edge read as empty so spawning pieces can overhang.
    pub fn cell_at(&self, x: i8, y: i8) -> CellQuery {
        if x < 0 || x >= self.width as i8 || y >= self.height as i8 {
            return CellQuery::Blocked;
        }
        if y < 0 {
            return CellQuery::Empty;
        }
        match self.get(x, y) {
            Some(Some(kind)) => CellQuery::Occupied(kind),
            _ => CellQuery::Empty,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height as usize {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_some())
    }

    /// Cells of row `y` (panics when out of range)
    pub fn row(&self, y: usize) -> &[Cell] {
        let width = self.width as usize;
        let start = y * width;
        &self.cells[start..start + width]
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Indices of full rows, top to bottom
    pub fn full_rows(&self) -> ArrayVec<usize, 4> {
        let mut rows = ArrayVec::new();
        for y in 0..self.height as usize {
            if self.is_row_full(y) && rows.try_push(y).is_err() {
                break;
            }
        }
        rows
    }

    /// Clear all full rows and return the row indices that were cleared (top to bottom)
    ///
    /// Uses a two-pointer pass. A single lock can complete at most four rows;
    /// boards seeded with more full rows are cleared four at a time, bottom first.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, 4> {
        let mut cleared_rows: ArrayVec<usize, 4> = ArrayVec::new();
        let width = self.width as usize;
        let mut write_y = self.height as usize;

        // Scan from bottom to top
        for read_y in (0..self.height as usize).rev() {
            if !cleared_rows.is_full() && self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                // This row survives, move it down to the write position
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        // Clear the remaining rows at the top
        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared_rows.reverse();
        cleared_rows
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of occupied cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Build a board from text rows, aligned to the bottom of the grid.
    ///
    /// `.` is an empty cell, a piece letter (`I`, `O`, `T`, ...) fills it. Rows
    /// shorter than the board width are padded with empty cells.
    ///
    /// ```
    /// use blockfall_core::Board;
    ///
    /// let board = Board::from_rows(4, 4, &["IIII", "OO.."]);
    /// assert!(board.is_row_full(2));
    /// assert!(board.is_occupied(1, 3));
    /// assert!(!board.is_occupied(2, 3));
    /// ```
    pub fn from_rows(width: u8, height: u8, rows: &[&str]) -> Self {
        let mut board = Board::new(width, height);
        let offset = (height as usize).saturating_sub(rows.len());
        for (i, line) in rows.iter().take(height as usize).enumerate() {
            let y = (offset + i) as i8;
            for (x, ch) in line.chars().take(width as usize).enumerate() {
                let cell = PieceKind::from_str(&ch.to_string());
                board.set(x as i8, y, cell);
            }
        }
        board
    }
}
