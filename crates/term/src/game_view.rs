//! GameView: maps a `GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! The grid is drawn bottom-up: row 0 sits on the bottom border and the
//! danger row is the first line under the top border.

use crate::core::{GameSnapshot, Tile};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{GameMode, GameStatus};

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

/// Grid cell under the selection cursor, as `(row, col)`.
pub type CursorPos = (u8, u8);

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const DANGER_BG: Rgb = Rgb::new(60, 28, 34);
const BORDER_FG: Rgb = Rgb::new(200, 200, 200);
const LABEL_FG: Rgb = Rgb::new(220, 220, 220);
const VALUE_FG: Rgb = Rgb::new(200, 200, 200);
const ACCENT_FG: Rgb = Rgb::new(120, 110, 240);
const WARN_FG: Rgb = Rgb::new(240, 90, 90);
const BLACK: Rgb = Rgb::new(0, 0, 0);

/// A lightweight terminal renderer for the puzzle.
pub struct GameView {
    /// Tile width in terminal columns.
    cell_w: u16,
    /// Tile height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // Room for a two-digit value plus selection brackets.
        Self {
            cell_w: 4,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(3),
            cell_h: cell_h.max(1),
        }
    }

    /// Outer size of the bordered board for `snap`.
    pub fn frame_size(&self, snap: &GameSnapshot) -> (u16, u16) {
        (
            snap.cols as u16 * self.cell_w + 2,
            snap.rows as u16 * self.cell_h + 2,
        )
    }

    /// Render into an existing framebuffer, reusing its allocation.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        cursor: Option<CursorPos>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        if snap.status == GameStatus::Menu {
            self.draw_menu(fb, viewport);
            return;
        }

        let (frame_w, frame_h) = self.frame_size(snap);
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h + 1) / 2;

        self.draw_border(fb, start_x, start_y, frame_w, frame_h);

        for row in 0..snap.rows {
            let bg = if row + 1 == snap.rows {
                DANGER_BG
            } else {
                BOARD_BG
            };
            for col in 0..snap.cols {
                let (px, py) = self.cell_origin(snap, start_x, start_y, row, col);
                fb.fill_rect(
                    px,
                    py,
                    self.cell_w,
                    self.cell_h,
                    ' ',
                    CellStyle::new(BOARD_BG, bg),
                );
                fb.put_char(
                    px + self.cell_w / 2,
                    py,
                    '·',
                    CellStyle::new(Rgb::new(90, 90, 100), bg).dim(),
                );
            }
        }

        for tile in &snap.tiles {
            if tile.row < snap.rows && tile.col < snap.cols {
                self.draw_tile(fb, snap, start_x, start_y, tile);
            }
        }

        if let Some((row, col)) = cursor {
            if row < snap.rows && col < snap.cols && snap.status == GameStatus::Playing {
                self.draw_cursor(fb, snap, start_x, start_y, row, col);
            }
        }

        self.draw_side_panel(fb, snap, viewport, start_x, start_y, frame_w);
        self.draw_hints(fb, snap, start_x, start_y + frame_h);

        if snap.status == GameStatus::GameOver {
            self.draw_overlay(
                fb,
                start_x,
                start_y,
                frame_w,
                frame_h,
                "GAME OVER",
                Some("r restart  m menu"),
            );
        } else if snap.paused {
            self.draw_overlay(
                fb,
                start_x,
                start_y,
                frame_w,
                frame_h,
                "PAUSED",
                Some("p resume"),
            );
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &GameSnapshot,
        cursor: Option<CursorPos>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, cursor, viewport, &mut fb);
        fb
    }

    /// Top-left screen position of grid cell `(row, col)`.
    pub fn cell_origin(
        &self,
        snap: &GameSnapshot,
        start_x: u16,
        start_y: u16,
        row: u8,
        col: u8,
    ) -> (u16, u16) {
        let flipped = snap.rows.saturating_sub(1).saturating_sub(row) as u16;
        (
            start_x + 1 + col as u16 * self.cell_w,
            start_y + 1 + flipped * self.cell_h,
        )
    }

    fn draw_tile(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        start_x: u16,
        start_y: u16,
        tile: &Tile,
    ) {
        let (px, py) = self.cell_origin(snap, start_x, start_y, tile.row, tile.col);
        let base = Rgb::from_tuple(tile.color.rgb());
        let selected = snap.is_selected(tile.id);

        let style = if tile.is_removing {
            CellStyle::new(base.contrast_text(), base.scaled(45)).dim()
        } else if selected {
            CellStyle::new(base.contrast_text(), base).bold()
        } else {
            CellStyle::new(base.contrast_text(), base.scaled(80))
        };

        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);

        let label_y = py + self.cell_h / 2;
        let digits = if tile.value >= 10 { 2 } else { 1 };
        let label_x = px + (self.cell_w.saturating_sub(digits)) / 2;
        fb.put_u32(label_x, label_y, tile.value, style);

        if selected && !tile.is_removing {
            fb.put_char(px, label_y, '[', style);
            fb.put_char(px + self.cell_w - 1, label_y, ']', style);
        }
    }

    fn draw_cursor(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        start_x: u16,
        start_y: u16,
        row: u8,
        col: u8,
    ) {
        let (px, py) = self.cell_origin(snap, start_x, start_y, row, col);
        let label_y = py + self.cell_h / 2;
        for x in [px, px + self.cell_w - 1] {
            let mut cell = fb.get(x, label_y).unwrap_or_default();
            cell.ch = if x == px { '>' } else { '<' };
            cell.style.fg = Rgb::new(255, 255, 255);
            cell.style.bold = true;
            fb.set(x, label_y, cell);
        }
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
        if w < 2 || h < 2 {
            return;
        }
        let style = CellStyle::new(BORDER_FG, BLACK);

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

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle::new(LABEL_FG, BLACK).bold();
        let value = CellStyle::new(VALUE_FG, BLACK);
        let accent = CellStyle::new(ACCENT_FG, BLACK).bold();

        let mut y = start_y;
        fb.put_str(panel_x, y, "TARGET", label);
        y += 1;
        fb.put_u32(panel_x, y, snap.target, accent);
        y += 2;

        fb.put_str(panel_x, y, "SUM", label);
        y += 1;
        let x = fb.put_u32(panel_x, y, snap.selection_sum, value);
        let x = fb.put_str(x, y, " / ", value.dim());
        fb.put_u32(x, y, snap.target, value);
        y += 2;

        fb.put_str(panel_x, y, "SCORE", label);
        y += 1;
        fb.put_u32(panel_x, y, snap.score, value);
        y += 2;

        fb.put_str(panel_x, y, "LEVEL", label);
        y += 1;
        fb.put_u32(panel_x, y, snap.level, value);
        y += 2;

        if snap.mode == GameMode::Time {
            fb.put_str(panel_x, y, "TIME", label);
            y += 1;
            let style = if snap.time_left <= 3 {
                CellStyle::new(WARN_FG, BLACK).bold()
            } else {
                value
            };
            let x = fb.put_u32(panel_x, y, snap.time_left, style);
            fb.put_char(x, y, 's', style);
            y += 2;
        }

        fb.put_str(panel_x, y, "MODE", label);
        y += 1;
        let mode = match snap.mode {
            GameMode::Classic => "CLASSIC",
            GameMode::Time => "TIME",
        };
        fb.put_str(panel_x, y, mode, value);
        y += 2;

        if snap.selected_count() > 0 {
            let x = fb.put_u32(panel_x, y, snap.selected_count() as u32, value);
            fb.put_str(x, y, " selected", value.dim());
        }
    }

    fn draw_hints(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, x: u16, y: u16) {
        if snap.status != GameStatus::Playing {
            return;
        }
        let style = CellStyle::new(Rgb::new(140, 140, 150), BLACK).dim();
        fb.put_str(x, y, "arrows move  space pick  p pause  m menu", style);
    }

    fn draw_menu(&self, fb: &mut FrameBuffer, viewport: Viewport) {
        let lines: [(&str, CellStyle); 6] = [
            ("SUMSTACK", CellStyle::new(ACCENT_FG, BLACK).bold()),
            ("pick tiles that add up to the target", CellStyle::new(VALUE_FG, BLACK).dim()),
            ("", CellStyle::default()),
            ("1  CLASSIC   new row on every clear", CellStyle::new(LABEL_FG, BLACK)),
            ("2  TIME      new row every turn", CellStyle::new(LABEL_FG, BLACK)),
            ("q  quit", CellStyle::new(VALUE_FG, BLACK).dim()),
        ];

        let block_w = lines.iter().map(|(s, _)| s.chars().count()).max().unwrap_or(0) as u16;
        let x = viewport.width.saturating_sub(block_w) / 2;
        let y0 = viewport.height.saturating_sub(lines.len() as u16) / 2;
        for (i, (text, style)) in lines.iter().enumerate() {
            fb.put_str(x, y0 + i as u16, text, *style);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_overlay(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        title: &str,
        subtitle: Option<&str>,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), BLACK).bold();

        let text_w = title.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        fb.put_str(x, mid_y, title, style);

        if let Some(sub) = subtitle {
            let sub_w = sub.chars().count() as u16;
            let x = start_x.saturating_add(frame_w.saturating_sub(sub_w) / 2);
            fb.put_str(x, mid_y + 1, sub, CellStyle::new(VALUE_FG, BLACK));
        }
    }
}
