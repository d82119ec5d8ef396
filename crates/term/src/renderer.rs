//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! The first frame (and any frame after a resize or `invalidate`) is a full
//! redraw. Later frames only emit the runs of cells that changed.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// A horizontal span of changed cells on one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub x: u16,
    pub y: u16,
    pub len: u16,
}

/// What the last `present` call sent to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresentStats {
    pub full: bool,
    pub runs: usize,
    pub bytes: usize,
}

pub struct TerminalRenderer {
    stdout: io::Stdout,
    front: Option<FrameBuffer>,
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
            front: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    /// Restore the terminal. Safe to call after a failed frame.
    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next frame to be a full redraw (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.front = None;
    }

    /// Present `back`, then swap it with the previous frame.
    ///
    /// After the call `back` holds stale contents; the caller renders the
    /// next frame into it, so no framebuffer is cloned.
    pub fn present(&mut self, back: &mut FrameBuffer) -> Result<PresentStats> {
        self.buf.clear();
        let mut stats = PresentStats::default();

        match self.front.take() {
            Some(mut front)
                if front.width() == back.width() && front.height() == back.height() =>
            {
                stats.runs = encode_diff_into(&front, back, &mut self.buf)?;
                std::mem::swap(&mut front, back);
                self.front = Some(front);
            }
            stale => {
                encode_full_into(back, &mut self.buf)?;
                stats.full = true;
                stats.runs = back.height() as usize;
                let mut front =
                    stale.unwrap_or_else(|| FrameBuffer::new(back.width(), back.height()));
                front.resize(back.width(), back.height());
                std::mem::swap(&mut front, back);
                self.front = Some(front);
            }
        }

        stats.bytes = self.buf.len();
        self.flush_buf()?;
        Ok(stats)
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let mut pen = Pen::default();
    for y in 0..fb.height() {
        out.queue(cursor::MoveTo(0, y))?;
        for x in 0..fb.width() {
            let cell = fb.get(x, y).unwrap_or_default();
            pen.print(out, cell.style, cell.ch)?;
        }
    }

    reset_into(out)
}

/// Encode only the changed runs between `prev` and `next` into `out`.
/// Returns the number of runs written.
pub fn encode_diff_into(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    out: &mut Vec<u8>,
) -> Result<usize> {
    let runs = changed_runs(prev, next);
    if runs.is_empty() {
        return Ok(0);
    }

    let mut pen = Pen::default();
    for run in &runs {
        out.queue(cursor::MoveTo(run.x, run.y))?;
        for x in run.x..run.x + run.len {
            let cell = next.get(x, run.y).unwrap_or_default();
            pen.print(out, cell.style, cell.ch)?;
        }
    }

    reset_into(out)?;
    Ok(runs.len())
}

/// Runs of cells that differ between two frames of equal size.
/// A size mismatch marks every row of `next` as changed.
pub fn changed_runs(prev: &FrameBuffer, next: &FrameBuffer) -> Vec<Run> {
    let (w, h) = (next.width(), next.height());
    if prev.width() != w || prev.height() != h {
        return (0..h).map(|y| Run { x: 0, y, len: w }).collect();
    }

    let mut runs = Vec::new();
    let (a, b) = (prev.cells(), next.cells());
    for y in 0..h {
        let row = y as usize * w as usize;
        let mut start: Option<u16> = None;
        for x in 0..w {
            let i = row + x as usize;
            match (a[i] != b[i], start) {
                (true, None) => start = Some(x),
                (false, Some(s)) => {
                    runs.push(Run { x: s, y, len: x - s });
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push(Run { x: s, y, len: w - s });
        }
    }
    runs
}

/// Tracks the active style so repeated cells do not re-emit SGR codes.
#[derive(Default)]
struct Pen {
    style: Option<CellStyle>,
}

impl Pen {
    fn print(&mut self, out: &mut Vec<u8>, style: CellStyle, ch: char) -> Result<()> {
        if self.style != Some(style) {
            out.queue(SetAttribute(Attribute::Reset))?;
            out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
            out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
            if style.bold {
                out.queue(SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                out.queue(SetAttribute(Attribute::Dim))?;
            }
            self.style = Some(style);
        }
        out.queue(Print(ch))?;
        Ok(())
    }
}

fn reset_into(out: &mut Vec<u8>) -> Result<()> {
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fb::{Cell, CellStyle};

    fn marked(width: u16, xs: &[u16]) -> FrameBuffer {
        let mut fb = FrameBuffer::new(width, 1);
        for &x in xs {
            fb.set(
                x,
                0,
                Cell {
                    ch: 'X',
                    style: CellStyle::default(),
                },
            );
        }
        fb
    }

    #[test]
    fn adjacent_changes_coalesce_into_one_run() {
        let a = FrameBuffer::new(6, 1);
        let b = marked(6, &[1, 2, 3]);
        assert_eq!(changed_runs(&a, &b), vec![Run { x: 1, y: 0, len: 3 }]);
    }

    #[test]
    fn run_touching_right_edge_is_closed() {
        let a = FrameBuffer::new(6, 1);
        let b = marked(6, &[0, 4, 5]);
        assert_eq!(
            changed_runs(&a, &b),
            vec![Run { x: 0, y: 0, len: 1 }, Run { x: 4, y: 0, len: 2 }]
        );
    }

    #[test]
    fn size_change_dirties_every_row() {
        let a = FrameBuffer::new(3, 1);
        let b = FrameBuffer::new(4, 2);
        assert_eq!(
            changed_runs(&a, &b),
            vec![Run { x: 0, y: 0, len: 4 }, Run { x: 0, y: 1, len: 4 }]
        );
    }

    #[test]
    fn identical_frames_encode_nothing() {
        let a = marked(5, &[2]);
        let mut out = Vec::new();
        assert_eq!(encode_diff_into(&a, &a.clone(), &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn diff_output_contains_changed_glyphs_only() {
        let mut a = FrameBuffer::new(4, 1);
        a.put_str(0, 0, "ab", CellStyle::default());
        let mut b = a.clone();
        b.put_char(3, 0, 'z', CellStyle::default());

        let mut out = Vec::new();
        encode_diff_into(&a, &b, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('z'));
        assert!(!text.contains('a'));
    }
}
