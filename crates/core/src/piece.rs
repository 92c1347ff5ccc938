//! Piece module - a shape with a board position
//!
//! Pieces are plain values. All collision tests go through
//! [`Grid::region_overlaps`], so a move or rotation is always checked before it is
//! committed and never needs to be rolled back.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::shape::{catalog_shape, Shape, MAX_SHAPE_SIDE};
use crate::types::{Direction, ShapeKind};

/// Lateral offsets tried when a rotation collides in place: right, then left
pub const KICK_OFFSETS: [i32; 2] = [1, -1];

/// Result of a unit move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The piece moved one cell
    Moved,
    /// The move was blocked and nothing changed
    Blocked,
    /// A downward move was blocked: the piece must be settled
    Finalize,
}

/// A shape in its current rotation state plus its top-left board offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: ShapeKind,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    pub fn new(kind: ShapeKind, shape: Shape, x: i32, y: i32) -> Self {
        Self { kind, shape, x, y }
    }

    /// Create a piece in catalog orientation, horizontally centered on the top row
    pub fn spawn(kind: ShapeKind, grid_width: usize) -> Self {
        let shape = catalog_shape(kind);
        let x = (grid_width.saturating_sub(shape.width()) / 2) as i32;
        Self::new(kind, shape, x, 0)
    }

    pub fn width(&self) -> usize {
        self.shape.width()
    }

    pub fn height(&self) -> usize {
        self.shape.height()
    }

    /// Absolute board coordinates of every occupied cell
    pub fn cells(&self) -> ArrayVec<(i32, i32), { MAX_SHAPE_SIDE * MAX_SHAPE_SIDE }> {
        self.shape
            .occupied()
            .map(|(dx, dy)| (self.x + dx as i32, self.y + dy as i32))
            .collect()
    }

    /// Check if the piece overlaps settled cells or leaves the grid where it is
    pub fn overlaps(&self, grid: &Grid) -> bool {
        grid.region_overlaps(self.x, self.y, &self.shape)
    }

    /// Check if the piece would overlap after shifting by (dx, dy)
    pub fn overlaps_at(&self, grid: &Grid, dx: i32, dy: i32) -> bool {
        grid.region_overlaps(self.x + dx, self.y + dy, &self.shape)
    }

    /// Try to rotate in place, then with a one-column kick right, then left.
    ///
    /// Rotation and kick are committed together. Returns false (and leaves the
    /// piece untouched) when no offset fits.
    pub fn try_rotate(&mut self, grid: &Grid) -> bool {
        let rotated = self.shape.rotated();

        if !grid.region_overlaps(self.x, self.y, &rotated) {
            self.shape = rotated;
            return true;
        }

        for dx in KICK_OFFSETS {
            if !grid.region_overlaps(self.x + dx, self.y, &rotated) {
                self.shape = rotated;
                self.x += dx;
                return true;
            }
        }

        false
    }

    /// Try a unit move. A blocked `Down` asks for a finalize; any other blocked
    /// direction is a silent no-op.
    pub fn try_move(&mut self, grid: &Grid, direction: Direction) -> MoveOutcome {
        let (dx, dy) = direction.offset();
        if !self.overlaps_at(grid, dx, dy) {
            self.x += dx;
            self.y += dy;
            return MoveOutcome::Moved;
        }

        match direction {
            Direction::Down => MoveOutcome::Finalize,
            Direction::Up | Direction::Left | Direction::Right => MoveOutcome::Blocked,
        }
    }
}
