//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Layout, top to bottom, centered horizontally:
//!
//! ```text
//!  GAME OVER          <- banner row (GAME OVER / PAUSED / blank)
//!  Score: 120
//!  Speed: 1.04 bps
//!                     <- next piece preview, PREVIEW_ROWS tall
//!  ┌────────────────┐
//!  │                │ <- the board
//!  └────────────────┘
//! ```

use crate::core::{GameSnapshot, PieceSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{ShapeKind, EMPTY_CELL, FILLED_CELL};

/// Rows reserved for the next piece preview
pub const PREVIEW_ROWS: u16 = 6;

/// Rows above the preview: banner, score, speed
const HEADER_ROWS: u16 = 3;

const FILLED_GLYPH: char = '█';
const OVERLAP_GLYPH: char = '#';
const EMPTY_GLYPH: char = '·';

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            anchor_y: AnchorY::Center,
        }
    }
}

struct Layout {
    x: u16,
    y: u16,
    frame_w: u16,
    frame_h: u16,
}

impl Layout {
    fn board_y(&self) -> u16 {
        self.y + HEADER_ROWS + PREVIEW_ROWS
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Width and height of the whole layout for a board of `width x height` cells
    pub fn required_size(&self, width: usize, height: usize) -> (u16, u16) {
        let frame_w = width as u16 * self.cell_w + 2;
        let frame_h = height as u16 + 2;
        (frame_w, HEADER_ROWS + PREVIEW_ROWS + frame_h)
    }

    /// Render a snapshot into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let (frame_w, total_h) = self.required_size(snap.width, snap.height);
        let layout = Layout {
            x: viewport.width.saturating_sub(frame_w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(total_h) / 2,
                AnchorY::Top => 0,
            },
            frame_w,
            frame_h: snap.height as u16 + 2,
        };

        self.draw_header(fb, snap, &layout);
        self.draw_preview(fb, &snap.next, &layout);
        self.draw_board(fb, snap, &layout);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_header(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, layout: &Layout) {
        let banner = CellStyle::fg(Rgb::new(255, 255, 255)).bold();
        let text = CellStyle::default();

        let title = if snap.game_over {
            Some("### GAME OVER ###")
        } else if snap.paused {
            Some("PAUSED")
        } else {
            None
        };
        if let Some(title) = title {
            let w = title.chars().count() as u16;
            let x = layout.x + layout.frame_w.saturating_sub(w) / 2;
            fb.put_str(x, layout.y, title, banner);
        }

        fb.put_str(layout.x, layout.y + 1, &format!("Score: {}", snap.score), text);
        fb.put_str(
            layout.x,
            layout.y + 2,
            &format!("Speed: {:.2} bps", snap.gravity_rate.abs()),
            text,
        );
    }

    fn draw_preview(&self, fb: &mut FrameBuffer, next: &PieceSnapshot, layout: &Layout) {
        let shape = next.shape;
        let shape_w = shape.width() as u16 * self.cell_w;
        let top = layout.y + HEADER_ROWS + PREVIEW_ROWS.saturating_sub(shape.height() as u16) / 2;
        let left = layout.x + layout.frame_w.saturating_sub(shape_w) / 2;
        let style = piece_style(next.kind);

        for (dx, dy) in shape.occupied() {
            let px = left + dx as u16 * self.cell_w;
            fb.fill_rect(px, top + dy as u16, self.cell_w, 1, FILLED_GLYPH, style);
        }
    }

    fn draw_board(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, layout: &Layout) {
        let top = layout.board_y();
        self.draw_border(fb, layout.x, top, layout.frame_w, layout.frame_h);

        let settled = CellStyle::fg(Rgb::new(170, 170, 180));
        let overlap = CellStyle::fg(Rgb::new(230, 60, 60)).bold();
        let empty = CellStyle::fg(Rgb::new(70, 70, 80));

        for y in 0..snap.height {
            for x in 0..snap.width {
                let (ch, style) = match snap.cell(x, y) {
                    EMPTY_CELL => (EMPTY_GLYPH, empty),
                    FILLED_CELL => (FILLED_GLYPH, settled),
                    _ => (OVERLAP_GLYPH, overlap),
                };
                self.fill_cell(fb, layout, x as u16, y as u16, ch, style);
            }
        }

        let Some(active) = snap.active else {
            return;
        };
        let style = piece_style(active.kind);
        for (x, y) in active.cells() {
            if x < 0 || y < 0 || x as usize >= snap.width || y as usize >= snap.height {
                continue;
            }
            let (x, y) = (x as usize, y as usize);
            if snap.cell(x, y) == EMPTY_CELL {
                self.fill_cell(fb, layout, x as u16, y as u16, FILLED_GLYPH, style);
            } else {
                self.fill_cell(fb, layout, x as u16, y as u16, OVERLAP_GLYPH, overlap);
            }
        }
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, layout: &Layout, x: u16, y: u16, ch: char, style: CellStyle) {
        let px = layout.x + 1 + x * self.cell_w;
        let py = layout.board_y() + 1 + y;
        fb.fill_rect(px, py, self.cell_w, 1, ch, style);
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
        if w < 2 || h < 2 {
            return;
        }
        let style = CellStyle::fg(Rgb::new(200, 200, 200));

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);
        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }
}

fn piece_style(kind: ShapeKind) -> CellStyle {
    let fg = match kind {
        ShapeKind::I => Rgb::new(80, 220, 220),
        ShapeKind::O => Rgb::new(240, 220, 80),
        ShapeKind::T => Rgb::new(200, 120, 220),
        ShapeKind::S => Rgb::new(100, 220, 120),
        ShapeKind::Z => Rgb::new(220, 80, 80),
        ShapeKind::J => Rgb::new(80, 120, 220),
        ShapeKind::L => Rgb::new(255, 165, 0),
    };
    CellStyle::fg(fg).bold()
}
