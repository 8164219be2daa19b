//! TerminalRenderer: flushes game frames to a real terminal.
//!
//! Each frame is compared row by row with the last frame that reached the
//! screen. A row that changed over most of its width (a flashing clear, a
//! shaken board) is reprinted in one pass; other rows get one write per
//! changed run. Style escapes are only sent for the parts that change.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

/// What one frame wrote to the terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrawStats {
    /// The screen was cleared before drawing.
    pub cleared: bool,
    pub whole_rows: u16,
    pub runs: u16,
    pub cells: u32,
}

impl DrawStats {
    pub fn is_empty(&self) -> bool {
        self.cells == 0
    }
}

pub struct TerminalRenderer {
    stdout: io::Stdout,
    shown: Option<FrameBuffer>,
    stale: bool,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            shown: None,
            stale: false,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.shown = None;
        self.buf.clear();
        self.buf
            .queue(terminal::EnterAlternateScreen)?
            .queue(cursor::Hide)?
            .queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf
            .queue(SetAttribute(Attribute::Reset))?
            .queue(ResetColor)?
            .queue(terminal::EnableLineWrap)?
            .queue(cursor::Show)?
            .queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// The screen may no longer match the last frame (resize, another
    /// program wrote to it). The next frame reprints every row; it only
    /// clears the screen if the size changed too.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Draw `fb`, then swap it with the previously shown frame so the caller
    /// renders the next frame into the old allocation.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<DrawStats> {
        self.buf.clear();
        let stats = encode_frame_into(self.shown.as_ref(), fb, self.stale, &mut self.buf)?;
        if !self.buf.is_empty() {
            self.flush_buf()?;
        }
        self.stale = false;

        let mut shown = self
            .shown
            .take()
            .unwrap_or_else(|| FrameBuffer::new(fb.width(), fb.height()));
        shown.resize(fb.width(), fb.height());
        std::mem::swap(&mut shown, fb);
        self.shown = Some(shown);
        Ok(stats)
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// How a row is brought up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowPlan {
    Clean,
    Whole,
    Runs,
}

/// Rows with at least half their cells changed are reprinted whole.
fn plan_row(before: &[Cell], after: &[Cell]) -> RowPlan {
    let changed = before.iter().zip(after).filter(|(a, b)| a != b).count();
    if changed == 0 {
        RowPlan::Clean
    } else if changed * 2 >= after.len() {
        RowPlan::Whole
    } else {
        RowPlan::Runs
    }
}

/// Encode the escapes that turn the `shown` screen into `next`.
///
/// Without a shown frame, or with one of another size, the screen is cleared
/// and repainted. `rewrite_all` reprints every row in place. Nothing is
/// written when the frames are equal.
pub fn encode_frame_into(
    shown: Option<&FrameBuffer>,
    next: &FrameBuffer,
    rewrite_all: bool,
    out: &mut Vec<u8>,
) -> Result<DrawStats> {
    let mut stats = DrawStats::default();
    let mut pen = Pen::default();

    let shown = shown.filter(|s| s.width() == next.width() && s.height() == next.height());
    if shown.is_none() {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
        stats.cleared = true;
    }

    for y in 0..next.height() {
        let after = next.row(y);
        let plan = match shown {
            Some(_) if rewrite_all => RowPlan::Whole,
            Some(prev) => plan_row(prev.row(y), after),
            None => RowPlan::Whole,
        };
        match plan {
            RowPlan::Clean => {}
            RowPlan::Whole => {
                write_run(out, &mut pen, 0, y, after)?;
                stats.whole_rows += 1;
                stats.cells += after.len() as u32;
            }
            RowPlan::Runs => {
                let before = shown.map(|s| s.row(y)).unwrap_or_default();
                for (start, end) in changed_runs(before, after) {
                    write_run(out, &mut pen, start as u16, y, &after[start..end])?;
                    stats.runs += 1;
                    stats.cells += (end - start) as u32;
                }
            }
        }
    }

    if !stats.is_empty() {
        out.queue(SetAttribute(Attribute::Reset))?.queue(ResetColor)?;
    }
    Ok(stats)
}

fn write_run(out: &mut Vec<u8>, pen: &mut Pen, x: u16, y: u16, cells: &[Cell]) -> Result<()> {
    out.queue(cursor::MoveTo(x, y))?;
    for cell in cells {
        pen.apply(out, cell.style)?;
        out.queue(Print(cell.ch))?;
    }
    Ok(())
}

/// Maximal `[start, end)` spans where the rows differ.
fn changed_runs<'a>(
    before: &'a [Cell],
    after: &'a [Cell],
) -> impl Iterator<Item = (usize, usize)> + 'a {
    let differs = move |x: usize| before.get(x) != after.get(x);
    let mut x = 0;
    std::iter::from_fn(move || {
        while x < after.len() && !differs(x) {
            x += 1;
        }
        if x >= after.len() {
            return None;
        }
        let start = x;
        while x < after.len() && differs(x) {
            x += 1;
        }
        Some((start, x))
    })
}

/// The terminal's current style within one frame.
#[derive(Debug, Default)]
struct Pen {
    current: Option<CellStyle>,
}

impl Pen {
    fn apply(&mut self, out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
        let prev = match self.current {
            Some(prev) if prev == style => return Ok(()),
            // Bold and dim can only be switched off by a full reset.
            Some(prev) if (prev.bold && !style.bold) || (prev.dim && !style.dim) => None,
            other => other,
        };
        if prev.is_none() {
            out.queue(SetAttribute(Attribute::Reset))?;
        }
        if prev.map(|p| p.fg) != Some(style.fg) {
            out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
        }
        if prev.map(|p| p.bg) != Some(style.bg) {
            out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
        }
        if style.bold && !prev.is_some_and(|p| p.bold) {
            out.queue(SetAttribute(Attribute::Bold))?;
        }
        if style.dim && !prev.is_some_and(|p| p.dim) {
            out.queue(SetAttribute(Attribute::Dim))?;
        }
        self.current = Some(style);
        Ok(())
    }
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
