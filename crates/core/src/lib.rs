//! Core game logic - board, pieces, gravity timing and the session transaction
//!
//! This crate contains the rules and the timing engine of the game. It has no
//! dependency on the terminal: rendering goes through the [`Renderer`] trait and
//! lock events through an `mpsc` channel, so the whole game can run headless.
//!
//! # Module Structure
//!
//! - [`grid`]: the settled cells, overlap tests, row removal and the completed-row scan
//! - [`shape`]: the seven catalog matrices and the 90° rotation transform
//! - [`piece`]: a shape plus position; unit moves and rotation with a one-column kick
//! - [`ticker`]: a pausable repeating timer on its own thread
//! - [`gravity`]: the signed fall rate and the ticker derived from it
//! - [`scoring`]: row-clear points and the score-to-gravity rule
//! - [`session`]: one running game behind a single lock
//! - [`snapshot`]: read-only copies for renderers and recorders
//!
//! # Game Rules
//!
//! - Shapes are picked uniformly at random (repeats allowed)
//! - A new piece spawns horizontally centered on the top row
//! - Rotation tries in place, then one column right, then one column left
//! - A piece locks only when a downward move is blocked
//! - Rows completed by a lock are cleared in one scan and scored 40/100/300/1200
//! - Gravity is `1.0 + 0.00033 * score` moves per second, capped at 3.0
//! - The game ends when a lock leaves no room for the next piece
//!
//! # Example
//!
//! ```
//! use termtris_core::{BoardDimensions, MoveOutcome, Session};
//!
//! let session = Session::new(BoardDimensions::default(), 12345);
//!
//! // Drop the first piece all the way down; the last drop locks it.
//! while session.soft_drop() == MoveOutcome::Moved {}
//!
//! let snapshot = session.snapshot();
//! assert_eq!(snapshot.cells.iter().filter(|&&c| c != 0).count(), 4);
//! assert_eq!(session.score(), 0);
//! ```

pub mod error;
pub mod gravity;
pub mod grid;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod shape;
pub mod snapshot;
pub mod ticker;

pub use termtris_types as types;

// Re-export commonly used types for convenience
pub use error::{BoardError, ErrorKind};
pub use gravity::Gravity;
pub use grid::{BoardDimensions, Grid};
pub use piece::{MoveOutcome, Piece};
pub use rng::SimpleRng;
pub use scoring::{gravity_rate_for, line_clear_points, Score};
pub use session::{NullRenderer, Renderer, Session};
pub use shape::{catalog_shape, rotate_shape, Shape, MIN_BOARD_DIMENSION};
pub use snapshot::{GameSnapshot, LockEvent, PieceSnapshot};
pub use ticker::{TickStamp, Ticker, TickerState};
