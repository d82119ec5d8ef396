//! Tile - a single numbered cell on the grid

use serde::Serialize;

use crate::types::{TileColor, TileId};

/// A numbered tile at `(row, col)`; row 0 is the bottom of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Tile {
    pub id: TileId,
    pub value: u32,
    pub row: u8,
    pub col: u8,
    pub color: TileColor,
    /// Presentation hint: part of a matched selection waiting to be cleared.
    pub is_removing: bool,
}

impl Tile {
    pub fn new(id: TileId, value: u32, row: u8, col: u8) -> Self {
        Self {
            id,
            value,
            row,
            col,
            color: TileColor::for_value(value),
            is_removing: false,
        }
    }

    pub fn position(&self) -> (u8, u8) {
        (self.row, self.col)
    }
}
