//! Terminal input module (engine-facing).
//!
//! This module is independent of any UI framework. It maps `crossterm` key
//! events into [`map::InputAction`]s and resolves them into
//! [`crate::types::GameCommand`]s through a grid cursor.

pub mod handler;
pub mod map;

pub use sumstack_core as core;
pub use sumstack_types as types;

pub use handler::{Cursor, InputHandler};
pub use map::{handle_key_event, should_quit, Direction, InputAction};
