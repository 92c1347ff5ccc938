//! Session renderer backed by the terminal.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::terminal;
use tracing::warn;

use crate::core::{GameSnapshot, Renderer};
use crate::fb::FrameBuffer;
use crate::game_view::{GameView, Viewport};
use crate::renderer::TerminalRenderer;

/// Draws every session snapshot to the terminal through a [`GameView`].
///
/// The viewport follows the terminal size on each frame, so a resize only needs
/// an [`Renderer::invalidate`] to repaint cleanly.
pub struct TermRenderer<W: Write = io::Stdout> {
    view: GameView,
    terminal: TerminalRenderer<W>,
    fb: FrameBuffer,
    fixed_viewport: Option<Viewport>,
}

impl TermRenderer<io::Stdout> {
    pub fn new(view: GameView) -> Self {
        Self::with_terminal(view, TerminalRenderer::new())
    }

    /// Switch the terminal to raw mode and the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        self.terminal.enter()
    }
}

impl<W: Write> TermRenderer<W> {
    pub fn with_terminal(view: GameView, terminal: TerminalRenderer<W>) -> Self {
        Self {
            view,
            terminal,
            fb: FrameBuffer::new(0, 0),
            fixed_viewport: None,
        }
    }

    /// Render into a fixed viewport instead of querying the terminal size
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.fixed_viewport = Some(viewport);
        self
    }

    pub fn terminal(&self) -> &TerminalRenderer<W> {
        &self.terminal
    }

    fn viewport(&self, snapshot: &GameSnapshot) -> Viewport {
        if let Some(viewport) = self.fixed_viewport {
            return viewport;
        }
        match terminal::size() {
            Ok((w, h)) => Viewport::new(w, h),
            Err(_) => {
                let (w, h) = self.view.required_size(snapshot.width, snapshot.height);
                Viewport::new(w, h)
            }
        }
    }

    fn draw(&mut self, snapshot: &GameSnapshot) -> Result<()> {
        let viewport = self.viewport(snapshot);
        self.view.render_into(snapshot, viewport, &mut self.fb);
        self.terminal.draw_swap(&mut self.fb)
    }
}

impl<W: Write + Send> Renderer for TermRenderer<W> {
    fn render(&mut self, snapshot: &GameSnapshot) {
        if let Err(e) = self.draw(snapshot) {
            warn!(error = %e, "failed to draw frame");
        }
    }

    fn invalidate(&mut self) {
        self.terminal.invalidate();
    }
}
