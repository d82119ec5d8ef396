//! Selection cursor: turns input actions into session commands.
//!
//! The terminal has no pointer, so tiles are picked with a cursor that moves
//! over grid cells. Toggling an empty cell produces no command.

use crate::core::GameSnapshot;
use crate::map::{Direction, InputAction};
use crate::types::{GameCommand, GameStatus};

/// Grid cell under the cursor; row 0 is the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub row: u8,
    pub col: u8,
}

impl Cursor {
    /// Move one cell, clamped to a `cols` x `rows` grid.
    pub fn step(&mut self, dir: Direction, cols: u8, rows: u8) {
        match dir {
            Direction::Up => {
                if self.row + 1 < rows {
                    self.row += 1;
                }
            }
            Direction::Down => self.row = self.row.saturating_sub(1),
            Direction::Left => self.col = self.col.saturating_sub(1),
            Direction::Right => {
                if self.col + 1 < cols {
                    self.col += 1;
                }
            }
        }
    }

    pub fn clamp(&mut self, cols: u8, rows: u8) {
        self.col = self.col.min(cols.saturating_sub(1));
        self.row = self.row.min(rows.saturating_sub(1));
    }
}

/// Tracks the cursor and maps actions to commands against the current snapshot.
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    cursor: Cursor,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Resolve an action. Cursor moves are handled here and yield no command.
    pub fn handle(&mut self, action: InputAction, snap: &GameSnapshot) -> Option<GameCommand> {
        match action {
            InputAction::Move(dir) => {
                self.cursor.step(dir, snap.cols, snap.rows);
                None
            }
            InputAction::Toggle => {
                if snap.status != GameStatus::Playing {
                    return None;
                }
                snap.tile_at(self.cursor.row, self.cursor.col)
                    .map(|t| GameCommand::Select(t.id))
            }
            InputAction::Start(mode) => match snap.status {
                GameStatus::Menu | GameStatus::GameOver => {
                    self.cursor = Cursor::default();
                    Some(GameCommand::Start(mode))
                }
                GameStatus::Playing => None,
            },
            InputAction::Pause => Some(GameCommand::TogglePause),
            InputAction::Restart => {
                self.cursor = Cursor::default();
                Some(GameCommand::Restart)
            }
            InputAction::Menu => Some(GameCommand::Menu),
        }
    }
}
