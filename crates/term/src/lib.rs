//! Terminal rendering for sumstack.
//!
//! Rendering is split in two: [`GameView`] draws a snapshot into a plain
//! [`FrameBuffer`] (pure, testable), and [`TerminalRenderer`] flushes that
//! framebuffer to the terminal, sending only the cells that changed.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use sumstack_core as core;
pub use sumstack_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{CursorPos, GameView, Viewport};
pub use renderer::{
    changed_runs, encode_diff_into, encode_full_into, PresentStats, Run, TerminalRenderer,
};
