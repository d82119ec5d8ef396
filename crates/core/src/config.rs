//! Grid configuration - the fixed constants an engine is built with

use std::collections::HashSet;

use thiserror::Error;

use crate::tile::Tile;
use crate::types::{
    TileId, BLOCK_MAX, BLOCK_MIN, GRID_COLS, GRID_ROWS, INITIAL_ROWS, MAX_GRID_COLS,
    SETTLE_DELAY_MS, TARGET_MAX, TARGET_MIN, TIME_LIMIT_SECS,
};

/// Rejected engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must have at least one column")]
    NoColumns,
    #[error("grid has {cols} columns, at most {max} are supported")]
    TooManyColumns { cols: u8, max: usize },
    #[error("initial rows ({initial}) must be fewer than grid rows ({rows})")]
    InitialRowsTooHigh { initial: u8, rows: u8 },
    #[error("tile value range {min}..={max} is empty or starts at zero")]
    InvalidValueRange { min: u32, max: u32 },
    #[error("target range {min}..={max} is empty or starts at zero")]
    InvalidTargetRange { min: u32, max: u32 },
    #[error("smallest target {target} is below the smallest tile value {block}")]
    UnreachableTarget { target: u32, block: u32 },
    #[error("time limit must be at least one second")]
    NoTimeLimit,
}

/// Rejected prepared layout or target
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("tile {id} at ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        id: TileId,
        row: u8,
        col: u8,
        rows: u8,
        cols: u8,
    },
    #[error("tile {id} has value {value}, allowed range is {min}..={max}")]
    ValueOutOfRange { id: TileId, value: u32, min: u32, max: u32 },
    #[error("two tiles occupy ({row}, {col})")]
    Overlap { row: u8, col: u8 },
    #[error("tile id {0} is used more than once")]
    DuplicateId(TileId),
    #[error("target {target} is outside {min}..={max}")]
    TargetOutOfRange { target: u32, min: u32, max: u32 },
    #[error("a layout can only be loaded while playing")]
    NotPlaying,
    #[error("a clear is still settling")]
    ClearPending,
}

/// Engine constants, fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub cols: u8,
    pub rows: u8,
    pub initial_rows: u8,
    pub time_limit_secs: u32,
    pub block_min: u32,
    pub block_max: u32,
    pub target_min: u32,
    pub target_max: u32,
    /// Zero resolves clears on the same call that matched them.
    pub settle_delay_ms: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: GRID_COLS,
            rows: GRID_ROWS,
            initial_rows: INITIAL_ROWS,
            time_limit_secs: TIME_LIMIT_SECS,
            block_min: BLOCK_MIN,
            block_max: BLOCK_MAX,
            target_min: TARGET_MIN,
            target_max: TARGET_MAX,
            settle_delay_ms: SETTLE_DELAY_MS,
        }
    }
}

impl GridConfig {
    /// Same constants with the settle delay removed, for headless use.
    pub fn headless() -> Self {
        Self {
            settle_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn with_settle_delay_ms(mut self, ms: u32) -> Self {
        self.settle_delay_ms = ms;
        self
    }

    /// Check every constraint the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols == 0 {
            return Err(ConfigError::NoColumns);
        }
        if self.cols as usize > MAX_GRID_COLS {
            return Err(ConfigError::TooManyColumns {
                cols: self.cols,
                max: MAX_GRID_COLS,
            });
        }
        if self.initial_rows >= self.rows {
            return Err(ConfigError::InitialRowsTooHigh {
                initial: self.initial_rows,
                rows: self.rows,
            });
        }
        if self.block_min == 0 || self.block_min > self.block_max {
            return Err(ConfigError::InvalidValueRange {
                min: self.block_min,
                max: self.block_max,
            });
        }
        if self.target_min == 0 || self.target_min > self.target_max {
            return Err(ConfigError::InvalidTargetRange {
                min: self.target_min,
                max: self.target_max,
            });
        }
        if self.target_min < self.block_min {
            return Err(ConfigError::UnreachableTarget {
                target: self.target_min,
                block: self.block_min,
            });
        }
        if self.time_limit_secs == 0 {
            return Err(ConfigError::NoTimeLimit);
        }
        Ok(())
    }

    /// Check a prepared tile set against the grid bounds and value range.
    ///
    /// Every tile must sit inside the grid with a unique id and a unique cell.
    pub fn check_layout(&self, tiles: &[Tile]) -> Result<(), LayoutError> {
        let mut cells = HashSet::with_capacity(tiles.len());
        let mut ids = HashSet::with_capacity(tiles.len());
        for tile in tiles {
            if tile.col >= self.cols || tile.row >= self.rows {
                return Err(LayoutError::OutOfBounds {
                    id: tile.id,
                    row: tile.row,
                    col: tile.col,
                    rows: self.rows,
                    cols: self.cols,
                });
            }
            if !(self.block_min..=self.block_max).contains(&tile.value) {
                return Err(LayoutError::ValueOutOfRange {
                    id: tile.id,
                    value: tile.value,
                    min: self.block_min,
                    max: self.block_max,
                });
            }
            if !ids.insert(tile.id) {
                return Err(LayoutError::DuplicateId(tile.id));
            }
            if !cells.insert(tile.position()) {
                return Err(LayoutError::Overlap {
                    row: tile.row,
                    col: tile.col,
                });
            }
        }
        Ok(())
    }

    pub fn check_target(&self, target: u32) -> Result<(), LayoutError> {
        if (self.target_min..=self.target_max).contains(&target) {
            Ok(())
        } else {
            Err(LayoutError::TargetOutOfRange {
                target,
                min: self.target_min,
                max: self.target_max,
            })
        }
    }

    /// Highest row a tile may occupy before the next injection overflows.
    pub fn danger_row(&self) -> u8 {
        self.rows - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GridConfig::default().validate(), Ok(()));
        assert_eq!(GridConfig::headless().validate(), Ok(()));
        assert_eq!(GridConfig::headless().settle_delay_ms, 0);
    }

    #[test]
    fn rejects_degenerate_grids() {
        let cfg = GridConfig {
            cols: 0,
            ..GridConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoColumns));

        let cfg = GridConfig {
            cols: 17,
            ..GridConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::TooManyColumns { cols: 17, .. })
        ));

        let cfg = GridConfig {
            initial_rows: 10,
            rows: 10,
            ..GridConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InitialRowsTooHigh { .. })
        ));
    }

    #[test]
    fn rejects_bad_ranges() {
        let cfg = GridConfig {
            block_min: 0,
            ..GridConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValueRange { .. })
        ));

        let cfg = GridConfig {
            target_min: 30,
            target_max: 20,
            ..GridConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidTargetRange { .. })
        ));

        let cfg = GridConfig {
            block_min: 5,
            block_max: 9,
            target_min: 3,
            target_max: 20,
            ..GridConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::UnreachableTarget { .. })
        ));
    }

    #[test]
    fn error_messages_name_the_problem() {
        let err = ConfigError::InitialRowsTooHigh {
            initial: 4,
            rows: 3,
        };
        assert_eq!(
            err.to_string(),
            "initial rows (4) must be fewer than grid rows (3)"
        );
    }

    fn tile(id: u64, value: u32, row: u8, col: u8) -> Tile {
        Tile::new(TileId(id), value, row, col)
    }

    #[test]
    fn layout_check_rejects_broken_boards() {
        let cfg = GridConfig::default();
        assert_eq!(
            cfg.check_layout(&[tile(1, 3, 0, 0), tile(2, 9, 9, 5)]),
            Ok(())
        );

        assert!(matches!(
            cfg.check_layout(&[tile(1, 3, 0, 40)]),
            Err(LayoutError::OutOfBounds { col: 40, .. })
        ));
        assert!(matches!(
            cfg.check_layout(&[tile(1, 3, 10, 0)]),
            Err(LayoutError::OutOfBounds { row: 10, .. })
        ));
        assert!(matches!(
            cfg.check_layout(&[tile(1, 0, 0, 0)]),
            Err(LayoutError::ValueOutOfRange { value: 0, .. })
        ));
        assert!(matches!(
            cfg.check_layout(&[tile(1, 50, 0, 0)]),
            Err(LayoutError::ValueOutOfRange { value: 50, .. })
        ));
        assert_eq!(
            cfg.check_layout(&[tile(1, 3, 2, 1), tile(2, 4, 2, 1)]),
            Err(LayoutError::Overlap { row: 2, col: 1 })
        );
        assert_eq!(
            cfg.check_layout(&[tile(7, 3, 0, 0), tile(7, 4, 1, 0)]),
            Err(LayoutError::DuplicateId(TileId(7)))
        );
    }

    #[test]
    fn target_check_uses_configured_range() {
        let cfg = GridConfig::default();
        assert_eq!(cfg.check_target(10), Ok(()));
        assert_eq!(cfg.check_target(25), Ok(()));
        assert!(matches!(
            cfg.check_target(500),
            Err(LayoutError::TargetOutOfRange { target: 500, .. })
        ));
        assert!(cfg.check_target(9).is_err());
    }
}
