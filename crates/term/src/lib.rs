//! Terminal rendering for the game.
//!
//! A small, game-oriented rendering layer: the [`GameView`] lays a session
//! snapshot out in a [`FrameBuffer`], and the [`TerminalRenderer`] flushes
//! framebuffers to the terminal, emitting only the cells that changed.
//! [`TermRenderer`] glues both to the core's `Renderer` trait.

pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod screen;

pub use termtris_core as core;
pub use termtris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport, PREVIEW_ROWS};
pub use renderer::{encode_diff_into, encode_full_into, restore_terminal, TerminalRenderer};
pub use screen::TermRenderer;
