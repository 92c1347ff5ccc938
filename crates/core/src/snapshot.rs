use serde::Serialize;

use crate::piece::Piece;
use crate::types::ShapeKind;

/// A piece as the view needs it: kind, current matrix and position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSnapshot {
    pub kind: ShapeKind,
    pub shape: crate::shape::Shape,
    pub x: i32,
    pub y: i32,
}

impl From<Piece> for PieceSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            shape: value.shape,
            x: value.x,
            y: value.y,
        }
    }
}

impl PieceSnapshot {
    /// Absolute board coordinates of every occupied cell
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied()
            .map(move |(dx, dy)| (self.x + dx as i32, self.y + dy as i32))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major settled cells
    pub cells: Vec<u8>,
    /// `None` once the game is over (its cells are on the grid then)
    pub active: Option<PieceSnapshot>,
    pub next: PieceSnapshot,
    pub score: u32,
    pub gravity_rate: f64,
    pub paused: bool,
    pub game_over: bool,
}

impl GameSnapshot {
    pub fn cell(&self, x: usize, y: usize) -> u8 {
        self.cells[y * self.width + x]
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}

/// Emitted once per finalize
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LockEvent {
    pub kind: ShapeKind,
    pub x: i32,
    pub y: i32,
    pub rows_cleared: usize,
    pub points_awarded: u32,
    pub score: u32,
    pub gravity_rate: f64,
    pub game_over: bool,
}
