//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains all the game rules and state management. It has no
//! dependencies on rendering, input or I/O, which makes it:
//!
//! - **Deterministic**: the same random source produces the same game
//! - **Testable**: a scripted [`RandomSource`] pins every tile and target
//! - **Portable**: runs in the terminal frontend or fully headless
//!
//! # Module Structure
//!
//! - [`config`]: engine constants and their validation
//! - [`grid`]: tile generation, selection evaluation, gravity and row injection
//! - [`rng`]: injectable random source and the default LCG
//! - [`scoring`]: clear points and score-derived level
//! - [`session`]: status/mode state machine, countdown and settle delay
//! - [`snapshot`]: read-only view handed to renderers
//! - [`tile`]: the tile record
//!
//! # Game Rules
//!
//! - Tiles carry values 1-9; the player selects tiles summing exactly to the target
//! - A match scores `tiles × 10 × level` and the columns above fall into the gap
//! - A sum past the target drops the selection, nothing else
//! - **Classic**: each clear pushes a new row in from the bottom
//! - **Time**: a new row arrives every 10 seconds regardless
//! - The game ends when a row is pushed while a tile sits on the top row
//!
//! # Example
//!
//! ```
//! use sumstack_core::{GridConfig, Session, SimpleRng};
//! use sumstack_types::{GameMode, GameStatus};
//!
//! let mut session = Session::new(GridConfig::headless(), SimpleRng::new(12345)).unwrap();
//! session.start_game(GameMode::Classic);
//! assert_eq!(session.status(), GameStatus::Playing);
//! assert_eq!(session.tiles().len(), 18);
//!
//! let first = session.tiles()[0].id;
//! session.select_tile(first);
//! let snap = session.snapshot();
//! assert!(snap.selection_sum > 0 || snap.score > 0);
//! ```
//!
//! # Timing
//!
//! Time only moves through [`Session::tick`]. Frontends call it every frame
//! with the elapsed milliseconds; pausing is simply not ticking, and the
//! session ignores ticks while paused anyway.

pub mod config;
pub mod grid;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod tile;

pub use sumstack_types as types;

// Re-export commonly used types for convenience
pub use config::{ConfigError, GridConfig, LayoutError};
pub use grid::{
    evaluate_selection, find_overlap, is_compacted, resolve_clear, selection_sum, Grid,
    InjectOutcome, SelectionOutcome,
};
pub use rng::{RandomSource, SimpleRng};
pub use scoring::{clear_points, level_for_score};
pub use session::{Session, SessionEvent};
pub use snapshot::GameSnapshot;
pub use tile::Tile;
