//! termtris (workspace facade crate).
//!
//! Re-exports the workspace crates under short names and hosts the pieces of the
//! binary that are worth testing on their own: configuration and lock-event
//! recording.

pub mod config;
pub mod record;

pub use termtris_core as core;
pub use termtris_input as input;
pub use termtris_term as term;
pub use termtris_types as types;
