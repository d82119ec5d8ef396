//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data with no game logic, so they can be used from the
//! core, the terminal view and the input layer alike.
//!
//! # Grid Dimensions
//!
//! - **Width**: 6 columns (indexed 0-5)
//! - **Height**: 10 rows (indexed 0-9), row 0 is the bottom
//! - **Danger row**: row 9; a row injection with any tile there ends the game
//!
//! # Game Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `INITIAL_ROWS` | 3 | Rows generated on game start |
//! | `TIME_LIMIT_SECS` | 10 | Seconds per turn in Time mode |
//! | `BLOCK_MIN`..`BLOCK_MAX` | 1..=9 | Tile value range |
//! | `TARGET_MIN`..`TARGET_MAX` | 10..=25 | Target value range |
//! | `SETTLE_DELAY_MS` | 200 | Delay between matching and compaction |
//! | `TICK_MS` | 16 | Frontend tick interval (~60 FPS) |
//!
//! # Examples
//!
//! ```
//! use sumstack_types::{GameCommand, GameMode, TileId, GRID_COLS, GRID_ROWS};
//!
//! let mode = GameMode::from_str("time").unwrap();
//! assert_eq!(mode, GameMode::Time);
//!
//! let cmd = GameCommand::from_str("start:classic").unwrap();
//! assert_eq!(cmd, GameCommand::Start(GameMode::Classic));
//!
//! assert_eq!(TileId(7).to_string(), "t7");
//! assert_eq!(GRID_COLS, 6);
//! assert_eq!(GRID_ROWS, 10);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Grid width in columns
pub const GRID_COLS: u8 = 6;

/// Grid height in rows
pub const GRID_ROWS: u8 = 10;

/// Upper bound on configurable grid width (row generation is stack-only)
pub const MAX_GRID_COLS: usize = 16;

/// Rows generated when a game starts
pub const INITIAL_ROWS: u8 = 3;

/// Seconds per turn in Time mode
pub const TIME_LIMIT_SECS: u32 = 10;

/// Smallest tile value
pub const BLOCK_MIN: u32 = 1;

/// Largest tile value
pub const BLOCK_MAX: u32 = 9;

/// Smallest target value
pub const TARGET_MIN: u32 = 10;

/// Largest target value
pub const TARGET_MAX: u32 = 25;

/// Delay between marking matched tiles and compacting the grid (ms)
pub const SETTLE_DELAY_MS: u32 = 200;

/// Points per cleared tile at level 1
pub const POINTS_PER_TILE: u32 = 10;

/// Score needed per level step
pub const SCORE_PER_LEVEL: u32 = 500;

/// Clears of at least this many tiles are flagged as big
pub const BIG_CLEAR_TILES: usize = 4;

/// Frontend tick interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Milliseconds per countdown step
pub const COUNTDOWN_STEP_MS: u32 = 1000;

/// Tile palette, indexed by `(value - 1) % len`
///
/// Red, teal, blue, sage, cream, rose, purple, yellow, orange.
pub const TILE_PALETTE: [(u8, u8, u8); 9] = [
    (0xFF, 0x6B, 0x6B),
    (0x4E, 0xCD, 0xC4),
    (0x45, 0xB7, 0xD1),
    (0x96, 0xCE, 0xB4),
    (0xFF, 0xEE, 0xAD),
    (0xD4, 0xA5, 0xA5),
    (0x9B, 0x59, 0xB6),
    (0xF1, 0xC4, 0x0F),
    (0xE6, 0x7E, 0x22),
];

/// Game modes
///
/// - **Classic**: a new row is injected after every successful clear
/// - **Time**: a new row is injected whenever the per-turn countdown expires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Classic,
    Time,
}

impl GameMode {
    /// Parse mode from string (case-insensitive)
    ///
    /// ```
    /// use sumstack_types::GameMode;
    ///
    /// assert_eq!(GameMode::from_str("Classic"), Some(GameMode::Classic));
    /// assert_eq!(GameMode::from_str("TIME"), Some(GameMode::Time));
    /// assert_eq!(GameMode::from_str("zen"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Some(GameMode::Classic),
            "time" => Some(GameMode::Time),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Time => "time",
        }
    }

    /// Whether a successful clear injects a row immediately.
    pub fn injects_on_clear(&self) -> bool {
        matches!(self, GameMode::Classic)
    }

    /// Whether the per-turn countdown runs.
    pub fn is_timed(&self) -> bool {
        matches!(self, GameMode::Time)
    }
}

/// Overall session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Menu,
    Playing,
    GameOver,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Menu => "menu",
            GameStatus::Playing => "playing",
            GameStatus::GameOver => "gameover",
        }
    }
}

/// Opaque tile identifier, unique among live tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u64);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl TileId {
    /// Parse `t<n>` or a bare number.
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        let digits = s.strip_prefix('t').unwrap_or(s);
        digits.parse().ok().map(TileId)
    }
}

/// Palette slot of a tile, derived from its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileColor(pub u8);

impl TileColor {
    /// Palette slot for a tile value.
    ///
    /// ```
    /// use sumstack_types::TileColor;
    ///
    /// assert_eq!(TileColor::for_value(1), TileColor(0));
    /// assert_eq!(TileColor::for_value(9), TileColor(8));
    /// assert_eq!(TileColor::for_value(10), TileColor(0));
    /// ```
    pub fn for_value(value: u32) -> Self {
        let idx = value.saturating_sub(1) as usize % TILE_PALETTE.len();
        TileColor(idx as u8)
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        TILE_PALETTE[self.0 as usize % TILE_PALETTE.len()]
    }

    /// `#RRGGBB` form for web-style consumers.
    pub fn hex(&self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }
}

/// Commands accepted by the session controller
///
/// These are the only mutations a frontend can request. Time advances through
/// `Session::tick`, not through a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameCommand {
    /// Start a new game in the given mode (from the menu or after game over)
    Start(GameMode),
    /// Toggle a tile in or out of the selection
    Select(TileId),
    /// Start again with the current mode after game over
    Restart,
    /// Abandon the current session and return to the menu
    Menu,
    /// Toggle pause while playing
    TogglePause,
}

impl GameCommand {
    /// Parse a command from its string form
    ///
    /// ```
    /// use sumstack_types::{GameCommand, GameMode, TileId};
    ///
    /// assert_eq!(GameCommand::from_str("select:t12"), Some(GameCommand::Select(TileId(12))));
    /// assert_eq!(GameCommand::from_str("start:time"), Some(GameCommand::Start(GameMode::Time)));
    /// assert_eq!(GameCommand::from_str("pause"), Some(GameCommand::TogglePause));
    /// assert_eq!(GameCommand::from_str("select:x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        let (name, arg) = match lower.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (lower.as_str(), None),
        };
        match (name, arg) {
            ("start", Some(mode)) => GameMode::from_str(mode).map(GameCommand::Start),
            ("select", Some(id)) => TileId::from_str(id).map(GameCommand::Select),
            ("restart", None) => Some(GameCommand::Restart),
            ("menu", None) => Some(GameCommand::Menu),
            ("pause", None) => Some(GameCommand::TogglePause),
            _ => None,
        }
    }

    /// Command name without its argument
    pub fn as_str(&self) -> &'static str {
        match self {
            GameCommand::Start(_) => "start",
            GameCommand::Select(_) => "select",
            GameCommand::Restart => "restart",
            GameCommand::Menu => "menu",
            GameCommand::TogglePause => "pause",
        }
    }
}
