//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game: the seven
//! shape kinds, the four movement directions, the player actions, and the numeric
//! constants that bound the board and drive gravity.
//!
//! # Board Dimensions
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_BOARD_WIDTH` | 10 | Columns when nothing is configured |
//! | `DEFAULT_BOARD_HEIGHT` | 20 | Rows when nothing is configured |
//! | `MAX_BOARD_DIMENSION` | 50 | Upper bound for either side |
//!
//! The lower bound depends on the shape catalog and lives in the core crate
//! (`MIN_BOARD_DIMENSION`), so every shape always fits on the board.
//!
//! # Gravity
//!
//! Gravity is expressed in moves per second. It starts at `INITIAL_SPEED` and grows
//! with the score by `SPEED_SCALE` per point, capped at `MAX_SPEED`:
//!
//! ```
//! use termtris_types::{INITIAL_SPEED, MAX_SPEED, SPEED_SCALE};
//!
//! let rate = (INITIAL_SPEED + 1200.0 * SPEED_SCALE).min(MAX_SPEED);
//! assert!(rate > INITIAL_SPEED && rate < MAX_SPEED);
//! ```
//!
//! # Examples
//!
//! ```
//! use termtris_types::{Direction, GameAction, ShapeKind};
//!
//! assert_eq!(ShapeKind::from_str("t"), Some(ShapeKind::T));
//! assert_eq!(Direction::Left.offset(), (-1, 0));
//! assert_eq!(GameAction::from_str("softDrop"), Some(GameAction::SoftDrop));
//! ```

use serde::Serialize;

/// Default board width in cells
pub const DEFAULT_BOARD_WIDTH: usize = 10;

/// Default board height in cells
pub const DEFAULT_BOARD_HEIGHT: usize = 20;

/// Largest accepted board width or height
pub const MAX_BOARD_DIMENSION: usize = 50;

/// Gravity of a fresh session, in moves per second
pub const INITIAL_SPEED: f64 = 1.0;

/// Gravity never exceeds this many moves per second
pub const MAX_SPEED: f64 = 3.0;

/// Gravity gained per scored point
pub const SPEED_SCALE: f64 = 0.00033;

/// Points for clearing N rows at once (index = rows cleared)
///
/// - 0 rows: 0 points
/// - 1 row: 40 points
/// - 2 rows: 100 points
/// - 3 rows: 300 points
/// - 4 rows: 1200 points
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Value of an empty grid cell
pub const EMPTY_CELL: u8 = 0;

/// Value of a settled grid cell
pub const FILLED_CELL: u8 = 1;


/// The seven shape kinds of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl ShapeKind {
    /// Every kind, in catalog order
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::J,
        ShapeKind::L,
        ShapeKind::O,
        ShapeKind::S,
        ShapeKind::T,
        ShapeKind::Z,
    ];

    /// Parse shape kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use termtris_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_str("i"), Some(ShapeKind::I));
    /// assert_eq!(ShapeKind::from_str("O"), Some(ShapeKind::O));
    /// assert_eq!(ShapeKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(ShapeKind::I),
            "j" => Some(ShapeKind::J),
            "l" => Some(ShapeKind::L),
            "o" => Some(ShapeKind::O),
            "s" => Some(ShapeKind::S),
            "t" => Some(ShapeKind::T),
            "z" => Some(ShapeKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::I => "i",
            ShapeKind::J => "j",
            ShapeKind::L => "l",
            ShapeKind::O => "o",
            ShapeKind::S => "s",
            ShapeKind::T => "t",
            ShapeKind::Z => "z",
        }
    }

    /// Uppercase letter used by the preview and the logs
    pub fn letter(&self) -> char {
        match self {
            ShapeKind::I => 'I',
            ShapeKind::J => 'J',
            ShapeKind::L => 'L',
            ShapeKind::O => 'O',
            ShapeKind::S => 'S',
            ShapeKind::T => 'T',
            ShapeKind::Z => 'Z',
        }
    }
}

/// Unit step directions on the board
///
/// `y` grows downwards, so `Down` is `(0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// `(dx, dy)` of one step in this direction
    ///
    /// # Examples
    ///
    /// ```
    /// use termtris_types::Direction;
    ///
    /// assert_eq!(Direction::Up.offset(), (0, -1));
    /// assert_eq!(Direction::Right.offset(), (1, 0));
    /// assert_eq!(Direction::Down.offset(), (0, 1));
    /// ```
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        }
    }
}

/// Player actions delivered by the input layer
///
/// Every action is safe to deliver at any time; the session ignores moves and
/// rotations once the game is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down (locks it when blocked)
    SoftDrop,
    /// Rotate piece 90°, kicking one column right or left if needed
    Rotate,
    /// Toggle pause state
    Pause,
    /// Repaint the whole screen
    Redraw,
    /// Stop gravity and leave the game
    Quit,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use termtris_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotate"), Some(GameAction::Rotate));
    /// assert_eq!(GameAction::from_str("hardDrop"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "rotate" => Some(GameAction::Rotate),
            "pause" => Some(GameAction::Pause),
            "redraw" => Some(GameAction::Redraw),
            "quit" => Some(GameAction::Quit),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::Rotate => "rotate",
            GameAction::Pause => "pause",
            GameAction::Redraw => "redraw",
            GameAction::Quit => "quit",
        }
    }
}
