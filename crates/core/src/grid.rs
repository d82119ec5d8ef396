//! Grid module - tile generation, selection evaluation, gravity and row injection
//!
//! The grid is a sparse list of tiles rather than a dense array: tiles carry
//! their own `(row, col)` and stable ids, which is what the selection and the
//! renderer key on. Row 0 is the bottom; injection pushes everything toward
//! row `rows - 1`, the danger row.
//!
//! The pure operations ([`evaluate_selection`], [`resolve_clear`]) are free
//! functions over tile slices. [`Grid`] owns the live tiles together with the
//! random source and the id counter, so generation never hands out an id that
//! is still on the board.

use std::collections::{BTreeMap, HashSet};

use arrayvec::ArrayVec;
use tracing::debug;

use crate::config::{ConfigError, GridConfig, LayoutError};
use crate::rng::RandomSource;
use crate::tile::Tile;
use crate::types::{TileId, MAX_GRID_COLS};

/// One freshly generated row (stack-only, at most `MAX_GRID_COLS` tiles)
pub type Row = ArrayVec<Tile, MAX_GRID_COLS>;

/// Result of checking a selection against the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Sum is still below the target (includes the empty selection)
    Unmatched { sum: u32 },
    /// Sum equals the target; `matched` lists the selected tiles in selection order
    Success { sum: u32, matched: Vec<TileId> },
    /// Sum went past the target; the selection must be dropped
    Overshoot { sum: u32 },
}

impl SelectionOutcome {
    pub fn sum(&self) -> u32 {
        match self {
            SelectionOutcome::Unmatched { sum }
            | SelectionOutcome::Success { sum, .. }
            | SelectionOutcome::Overshoot { sum } => *sum,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SelectionOutcome::Success { .. })
    }
}

/// Result of a row injection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    Injected,
    /// A tile already sat on the danger row; nothing was changed
    Overflow,
}

/// Sum of the values of live tiles whose id is selected.
///
/// Ids that are not on the board contribute nothing.
pub fn selection_sum(tiles: &[Tile], selected: &[TileId]) -> u32 {
    tiles
        .iter()
        .filter(|t| selected.contains(&t.id))
        .fold(0u32, |acc, t| acc.saturating_add(t.value))
}

/// Compare the selection's sum with `target`.
pub fn evaluate_selection(tiles: &[Tile], selected: &[TileId], target: u32) -> SelectionOutcome {
    let sum = selection_sum(tiles, selected);

    if sum > target {
        return SelectionOutcome::Overshoot { sum };
    }

    if sum == target && !selected.is_empty() {
        let matched: Vec<TileId> = selected
            .iter()
            .copied()
            .filter(|id| tiles.iter().any(|t| t.id == *id))
            .collect();
        if !matched.is_empty() {
            return SelectionOutcome::Success { sum, matched };
        }
    }

    SelectionOutcome::Unmatched { sum }
}

/// Remove `matched` tiles and let every column fall toward row 0.
///
/// Within a column the surviving tiles keep their vertical order and are
/// re-ranked from 0. The result is ordered by column, then row, so running it
/// again on its own output returns the same vector.
pub fn resolve_clear(tiles: Vec<Tile>, matched: &[TileId]) -> Vec<Tile> {
    let mut columns: BTreeMap<u8, Vec<Tile>> = BTreeMap::new();
    for tile in tiles.into_iter().filter(|t| !matched.contains(&t.id)) {
        columns.entry(tile.col).or_default().push(tile);
    }

    let mut out = Vec::new();
    for (_, mut column) in columns {
        // Stable: equal rows (never expected) keep their input order.
        column.sort_by_key(|t| t.row);
        for (rank, mut tile) in column.into_iter().enumerate() {
            tile.row = rank as u8;
            out.push(tile);
        }
    }
    out
}

/// First `(row, col)` occupied by more than one tile, if any.
pub fn find_overlap(tiles: &[Tile]) -> Option<(u8, u8)> {
    let mut seen = HashSet::with_capacity(tiles.len());
    tiles
        .iter()
        .map(Tile::position)
        .find(|pos| !seen.insert(*pos))
}

/// Whether every column is packed down from row 0 without gaps.
pub fn is_compacted(tiles: &[Tile]) -> bool {
    let mut heights: BTreeMap<u8, Vec<u8>> = BTreeMap::new();
    for tile in tiles {
        heights.entry(tile.col).or_default().push(tile.row);
    }
    heights.into_values().all(|mut rows| {
        rows.sort_unstable();
        rows.iter().enumerate().all(|(i, &r)| r as usize == i)
    })
}

/// The live tile set plus everything needed to grow it.
#[derive(Debug, Clone)]
pub struct Grid<R> {
    config: GridConfig,
    rng: R,
    next_id: u64,
    tiles: Vec<Tile>,
}

impl<R: RandomSource> Grid<R> {
    /// Create an empty grid. Fails if the configuration is inconsistent.
    pub fn new(config: GridConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            next_id: 1,
            tiles: Vec::with_capacity(config.cols as usize * config.rows as usize),
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.tile(id).is_some()
    }

    /// Tile at `(row, col)`, if any.
    pub fn tile_at(&self, row: u8, col: u8) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.row == row && t.col == col)
    }

    /// Replace the board with a prepared layout.
    ///
    /// The layout must fit the grid (see [`GridConfig::check_layout`]); a
    /// rejected layout leaves the board untouched. The id counter moves past
    /// every id in `tiles`, so later generation stays unique.
    pub fn set_tiles(&mut self, tiles: Vec<Tile>) -> Result<(), LayoutError> {
        self.config.check_layout(&tiles)?;
        if let Some(max) = tiles.iter().map(|t| t.id.0).max() {
            self.next_id = self.next_id.max(max + 1);
        }
        self.tiles = tiles;
        Ok(())
    }

    /// Drop every tile.
    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// Draw a target uniformly from the configured range.
    pub fn generate_target(&mut self) -> u32 {
        self.rng
            .next_inclusive(self.config.target_min, self.config.target_max)
    }

    /// Generate one full row of fresh tiles at `row`, one per column.
    pub fn generate_row(&mut self, row: u8) -> Row {
        let mut out = Row::new();
        for col in 0..self.config.cols {
            let value = self
                .rng
                .next_inclusive(self.config.block_min, self.config.block_max);
            let id = TileId(self.next_id);
            self.next_id += 1;
            out.push(Tile::new(id, value, row, col));
        }
        out
    }

    /// Reset to the opening layout: `initial_rows` rows from the bottom up.
    pub fn fill_initial(&mut self) {
        self.tiles.clear();
        for row in 0..self.config.initial_rows {
            let generated = self.generate_row(row);
            self.tiles.extend(generated);
        }
    }

    /// Whether some tile is already on the danger row.
    pub fn is_full(&self) -> bool {
        let danger = self.config.danger_row();
        self.tiles.iter().any(|t| t.row >= danger)
    }

    /// Shift every tile up one row and add a fresh row at the bottom.
    ///
    /// Reports [`InjectOutcome::Overflow`] without touching the board when a
    /// tile already sits on the danger row.
    pub fn inject_row(&mut self) -> InjectOutcome {
        if self.is_full() {
            debug!(tiles = self.tiles.len(), "row injection overflowed");
            return InjectOutcome::Overflow;
        }

        for tile in &mut self.tiles {
            tile.row += 1;
        }
        let generated = self.generate_row(0);
        self.tiles.extend(generated);

        debug!(tiles = self.tiles.len(), "row injected");
        InjectOutcome::Injected
    }

    /// Check the selection against `target` on the live tiles.
    pub fn evaluate(&self, selected: &[TileId], target: u32) -> SelectionOutcome {
        evaluate_selection(&self.tiles, selected, target)
    }

    /// Flag tiles as part of a pending clear (presentation only).
    pub fn mark_removing(&mut self, ids: &[TileId]) {
        for tile in self.tiles.iter_mut().filter(|t| ids.contains(&t.id)) {
            tile.is_removing = true;
        }
    }

    /// Remove `matched` tiles and compact every column.
    pub fn resolve_clear(&mut self, matched: &[TileId]) {
        let tiles = std::mem::take(&mut self.tiles);
        self.tiles = resolve_clear(tiles, matched);
    }
}
