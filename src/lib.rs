//! Sumstack (workspace facade crate).
//!
//! Re-exports the member crates as `sumstack::{core,input,term,types}` and
//! holds the run settings shared by the terminal binary.

pub mod settings;

pub use sumstack_core as core;
pub use sumstack_input as input;
pub use sumstack_term as term;
pub use sumstack_types as types;
