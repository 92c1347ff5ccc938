//! Grid module - manages the settled cells of the board
//!
//! The grid is a `width x height` matrix stored as a flat, row-major `Vec<u8>`.
//! Coordinates: (x, y) where x grows to the right and y grows downwards, with
//! (0, 0) at the top-left corner.
//!
//! Cell values: `0` is empty, `1` is a settled cell. Settling a piece adds its
//! shape values into the cells, so a value above `1` only appears when a piece is
//! written over filled cells, which the session only does on the gameover path.

use std::num::IntErrorKind;

use crate::error::BoardError;
use crate::shape::{Shape, MIN_BOARD_DIMENSION};
use crate::types::{EMPTY_CELL, FILLED_CELL, MAX_BOARD_DIMENSION};

/// Validated board dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardDimensions {
    width: usize,
    height: usize,
}

impl BoardDimensions {
    /// Validate a width and height against
    /// `[MIN_BOARD_DIMENSION, MAX_BOARD_DIMENSION]`.
    pub fn new(width: i64, height: i64) -> Result<Self, BoardError> {
        let in_range =
            |v: i64| v >= MIN_BOARD_DIMENSION as i64 && v <= MAX_BOARD_DIMENSION as i64;
        if !in_range(width) || !in_range(height) {
            return Err(BoardError::DimensionOutOfRange {
                width,
                height,
                min: MIN_BOARD_DIMENSION,
                max: MAX_BOARD_DIMENSION,
            });
        }

        Ok(Self {
            width: width as usize,
            height: height as usize,
        })
    }

    /// Parse textual dimensions (command line, environment).
    ///
    /// Anything that is not a plain integer (`"10.5"`, `"true"`, `"ten"`) is a
    /// type error; integers are then range-checked like [`BoardDimensions::new`].
    pub fn parse(width: &str, height: &str) -> Result<Self, BoardError> {
        let width = parse_dimension(width)?;
        let height = parse_dimension(height)?;
        Self::new(width, height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

impl Default for BoardDimensions {
    fn default() -> Self {
        Self {
            width: crate::types::DEFAULT_BOARD_WIDTH,
            height: crate::types::DEFAULT_BOARD_HEIGHT,
        }
    }
}

/// Integers too large for `i64` saturate so the range check rejects them.
fn parse_dimension(value: &str) -> Result<i64, BoardError> {
    match value.trim().parse::<i64>() {
        Ok(v) => Ok(v),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(BoardError::InvalidDimensionType {
                value: value.to_string(),
            }),
        },
    }
}

/// The settled cells of the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<u8>,
}

impl Grid {
    /// Create a new empty grid
    pub fn new(dims: BoardDimensions) -> Self {
        Self {
            width: dims.width(),
            height: dims.height(),
            cells: vec![EMPTY_CELL; dims.width() * dims.height()],
        }
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({}, {}) outside {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        y * self.width + x
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get cell at position (x, y). Panics when out of bounds.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.cells[self.index(x, y)]
    }

    /// Set cell at position (x, y) to empty or filled. Panics when out of bounds
    /// or when `value` is neither 0 nor 1.
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        assert!(
            value == EMPTY_CELL || value == FILLED_CELL,
            "cell value must be 0 or 1, got {}",
            value
        );
        let idx = self.index(x, y);
        self.cells[idx] = value;
    }

    /// Check if `shape` placed with its top-left corner at (x0, y0) would hit a
    /// non-empty cell or leave the grid. Leaving the grid counts as a hit.
    pub fn region_overlaps(&self, x0: i32, y0: i32, shape: &Shape) -> bool {
        let x1 = x0 as i64 + shape.width() as i64;
        let y1 = y0 as i64 + shape.height() as i64;
        if x0 < 0 || y0 < 0 || x1 > self.width as i64 || y1 > self.height as i64 {
            return true;
        }

        shape.occupied().any(|(dx, dy)| {
            let x = x0 as usize + dx;
            let y = y0 as usize + dy;
            self.cells[y * self.width + x] != EMPTY_CELL
        })
    }

    /// Add the shape's values into the cells at (x0, y0).
    ///
    /// Overlapping filled cells is allowed (the result is a value above 1).
    /// Occupied shape cells outside the grid are a programming error.
    pub fn settle(&mut self, x0: i32, y0: i32, shape: &Shape) {
        for (dx, dy) in shape.occupied() {
            let x = x0 + dx as i32;
            let y = y0 + dy as i32;
            assert!(
                x >= 0 && y >= 0,
                "settling cell ({}, {}) outside the grid",
                x,
                y
            );
            let idx = self.index(x as usize, y as usize);
            self.cells[idx] = self.cells[idx].saturating_add(1);
        }
    }

    /// Remove row `idx`, shift every row above it down by one and insert an empty
    /// row at the top. Negative indices count from the bottom (`-1` is the last
    /// row).
    pub fn drop_row(&mut self, idx: isize) -> Result<(), BoardError> {
        let height = self.height as isize;
        if idx >= height || idx < -height {
            return Err(BoardError::RowIndexOutOfRange {
                index: idx,
                height: self.height,
            });
        }
        let row = (if idx < 0 { height + idx } else { idx }) as usize;
        self.remove_row(row);
        Ok(())
    }

    /// Shift all rows above `row` down by one and empty row 0. `row` must be in
    /// bounds.
    fn remove_row(&mut self, row: usize) {
        debug_assert!(row < self.height);
        let width = self.width;
        // copy_within handles the overlap.
        self.cells.copy_within(0..row * width, width);
        self.cells[..width].fill(EMPTY_CELL);
    }

    /// Check if a row is completely filled
    pub fn is_row_complete(&self, y: usize) -> bool {
        if y >= self.height {
            return false;
        }
        let start = y * self.width;
        self.cells[start..start + self.width]
            .iter()
            .all(|&cell| cell == FILLED_CELL)
    }

    /// Drop every completed row in `[row_start, row_stop)` and return how many
    /// were dropped.
    ///
    /// Rows are scanned top to bottom in one pass. Dropping row `y` only moves the
    /// rows above `y`, which have all been examined already, so the rows still to
    /// be scanned keep their indices.
    pub fn scan_completed(&mut self, row_start: usize, row_stop: usize) -> usize {
        let stop = row_stop.min(self.height);
        let mut dropped = 0;
        for y in row_start..stop {
            if self.is_row_complete(y) {
                self.remove_row(y);
                dropped += 1;
            }
        }
        dropped
    }

    /// True when every cell is 0 or 1
    pub fn is_consistent(&self) -> bool {
        self.cells.iter().all(|&c| c <= FILLED_CELL)
    }

    /// Number of non-empty cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != EMPTY_CELL).count()
    }

    /// Row-major view of all cells
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// One row of cells
    pub fn row(&self, y: usize) -> &[u8] {
        let start = self.index(0, y);
        &self.cells[start..start + self.width]
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY_CELL);
    }

    /// Fill a whole row, optionally leaving one column empty (for testing)
    #[cfg(test)]
    pub(crate) fn fill_row_except(&mut self, y: usize, hole: Option<usize>) {
        for x in 0..self.width {
            let value = if Some(x) == hole { EMPTY_CELL } else { FILLED_CELL };
            self.set(x, y, value);
        }
    }
}
