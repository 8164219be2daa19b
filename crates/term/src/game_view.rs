//! GameView: maps a `GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::pieces::shape_matrix;
use crate::core::GameSnapshot;
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, Rotation};

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);

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

/// Optional extras drawn under the score panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelExtras<'a> {
    pub player_name: Option<&'a str>,
    pub best_score: Option<u32>,
    pub show_next: bool,
}

/// A lightweight terminal renderer for the falling-block game.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        extras: PanelExtras<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let board_px_w = snap.width as u16 * self.cell_w;
        let board_px_h = snap.height as u16 * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        let mut start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };

        let effect = &snap.line_effect;
        // Jitter one column every 50 ms while a tetris is on screen.
        if effect.shaking && (effect.remaining_ms / 50) % 2 == 1 {
            start_x = start_x.saturating_add(1);
        }

        let bg = CellStyle {
            fg: Rgb::new(80, 80, 90),
            bg: PLAY_BG,
            bold: false,
            dim: false,
        };
        fb.fill_rect(start_x + 1, start_y + 1, board_px_w, board_px_h, ' ', bg);
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, CellStyle::default());

        for y in 0..snap.height {
            for x in 0..snap.width {
                match snap.cell(x, y) {
                    Some(kind) => self.draw_block(fb, start_x, start_y, x as i8, y as i8, kind),
                    None => self.draw_empty_cell(fb, start_x, start_y, x, y),
                }
            }
        }

        for p in &effect.particles {
            let (x, y) = (p.x.floor(), p.y.floor());
            if x < 0.0 || y < 0.0 {
                continue;
            }
            let style = CellStyle {
                fg: p.color,
                bg: PLAY_BG,
                bold: true,
                dim: false,
            };
            self.fill_cell_rect(fb, start_x, start_y, x as i8, y as i8, snap, '*', style);
        }

        // Flash the cleared rows, on and off every 100 ms.
        if effect.is_active() && effect.remaining_ms.div_ceil(100) % 2 == 1 {
            let flash = CellStyle {
                fg: Rgb::new(255, 255, 255),
                bg: PLAY_BG,
                bold: true,
                dim: false,
            };
            for &row in &effect.flashing_lines {
                for x in 0..snap.width {
                    self.fill_cell_rect(fb, start_x, start_y, x as i8, row as i8, snap, '▓', flash);
                }
            }
        }

        if let (Some(active), Some(ghost_y)) = (snap.active, snap.ghost_y) {
            if ghost_y != active.y {
                let ghost = CellStyle {
                    fg: Rgb::new(140, 140, 140),
                    bg: PLAY_BG,
                    bold: false,
                    dim: true,
                };
                for (x, y) in active.cells() {
                    let y = y - active.y + ghost_y;
                    self.fill_cell_rect(fb, start_x, start_y, x, y, snap, '░', ghost);
                }
            }
        }

        if let Some(active) = snap.active {
            for (x, y) in active.cells() {
                self.fill_cell_rect(fb, start_x, start_y, x, y, snap, '█', block_style(active.kind));
            }
        }

        self.draw_side_panel(fb, snap, extras, viewport, start_x, start_y, frame_w);

        if snap.game_over {
            self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "GAME OVER");
        } else if snap.paused {
            self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "PAUSED");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, extras: PanelExtras<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, extras, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

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

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, x: u8, y: u8) {
        let style = CellStyle {
            fg: Rgb::new(90, 90, 100),
            bg: PLAY_BG,
            bold: false,
            dim: true,
        };
        let px = start_x + 1 + x as u16 * self.cell_w;
        let py = start_y + 1 + y as u16 * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, '·', style);
    }

    fn draw_block(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, x: i8, y: i8, kind: PieceKind) {
        let px = start_x + 1 + x as u16 * self.cell_w;
        let py = start_y + 1 + y as u16 * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, '█', block_style(kind));
    }

    /// Fill one board cell; minos outside the visible board are skipped.
    #[allow(clippy::too_many_arguments)]
    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: i8,
        cell_y: i8,
        snap: &GameSnapshot,
        ch: char,
        style: CellStyle,
    ) {
        if cell_x < 0 || cell_y < 0 || cell_x as u8 >= snap.width || cell_y as u8 >= snap.height {
            return;
        }
        let px = start_x + 1 + cell_x as u16 * self.cell_w;
        let py = start_y + 1 + cell_y as u16 * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        extras: PanelExtras<'_>,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::fg(Rgb::new(200, 200, 200));

        let mut y = start_y;
        if let Some(name) = extras.player_name {
            fb.put_str(panel_x, y, name, label);
            y = y.saturating_add(2);
        }

        for (title, number) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
            ("TETRISES", snap.tetrises),
        ] {
            fb.put_str(panel_x, y, title, label);
            fb.put_u64(panel_x, y.saturating_add(1), number as u64, value);
            y = y.saturating_add(3);
        }

        if let Some(best) = extras.best_score {
            fb.put_str(panel_x, y, "BEST", label);
            fb.put_u64(panel_x, y.saturating_add(1), best as u64, value);
            y = y.saturating_add(3);
        }

        if extras.show_next {
            fb.put_str(panel_x, y, "NEXT", label);
            y = y.saturating_add(1);
            if let Some(kind) = snap.next {
                let matrix = shape_matrix(kind, Rotation::North);
                for (dy, row) in matrix.iter().enumerate() {
                    for (dx, &filled) in row.iter().enumerate() {
                        if filled {
                            let px = panel_x + dx as u16 * self.cell_w;
                            let py = y + dy as u16;
                            fb.fill_rect(px, py, self.cell_w, 1, '█', block_style(kind));
                        }
                    }
                }
            }
        }
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle::fg(Rgb::new(255, 255, 255)).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

fn block_style(kind: PieceKind) -> CellStyle {
    CellStyle {
        fg: kind.color(),
        bg: PLAY_BG,
        bold: true,
        dim: false,
    }
}
