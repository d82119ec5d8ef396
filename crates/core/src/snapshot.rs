//! Snapshot module - read-only game state handed to renderers

use serde::Serialize;

use crate::tile::Tile;
use crate::types::{GameMode, GameStatus, TileId, GRID_COLS, GRID_ROWS, TIME_LIMIT_SECS};

/// Read-only view of a session for renderers and other consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub mode: GameMode,
    pub tiles: Vec<Tile>,
    pub score: u32,
    pub target: u32,
    /// Selection in the order the tiles were picked
    pub selected_ids: Vec<TileId>,
    pub selection_sum: u32,
    pub time_left: u32,
    pub time_limit: u32,
    pub level: u32,
    pub paused: bool,
    /// Matched tiles are on screen with `is_removing` set, waiting to clear
    pub clear_pending: bool,
    pub cols: u8,
    pub rows: u8,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.status = GameStatus::Menu;
        self.mode = GameMode::Classic;
        self.tiles.clear();
        self.score = 0;
        self.target = 0;
        self.selected_ids.clear();
        self.selection_sum = 0;
        self.time_left = TIME_LIMIT_SECS;
        self.time_limit = TIME_LIMIT_SECS;
        self.level = 1;
        self.paused = false;
        self.clear_pending = false;
        self.cols = GRID_COLS;
        self.rows = GRID_ROWS;
    }

    /// Whether selection input would currently be accepted.
    pub fn playable(&self) -> bool {
        self.status == GameStatus::Playing && !self.paused
    }

    pub fn tile_at(&self, row: u8, col: u8) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.row == row && t.col == col)
    }

    pub fn is_selected(&self, id: TileId) -> bool {
        self.selected_ids.contains(&id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected_ids.len()
    }

    /// Height of the tallest column (0 for an empty grid).
    pub fn stack_height(&self) -> u8 {
        self.tiles.iter().map(|t| t.row + 1).max().unwrap_or(0)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            status: GameStatus::Menu,
            mode: GameMode::Classic,
            tiles: Vec::new(),
            score: 0,
            target: 0,
            selected_ids: Vec::new(),
            selection_sum: 0,
            time_left: 0,
            time_limit: 0,
            level: 1,
            paused: false,
            clear_pending: false,
            cols: 0,
            rows: 0,
        };
        s.clear();
        s
    }
}
