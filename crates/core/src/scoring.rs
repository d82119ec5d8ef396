//! Scoring module - clear points and score-derived level
//!
//! Level is never stored: it is always `score / SCORE_PER_LEVEL + 1`, and the
//! level at the moment of a clear multiplies that clear's points.

use crate::types::{BIG_CLEAR_TILES, POINTS_PER_TILE, SCORE_PER_LEVEL};

/// Level for a given score (1-based)
pub fn level_for_score(score: u32) -> u32 {
    score / SCORE_PER_LEVEL + 1
}

/// Points for clearing `matched` tiles at `level`
pub fn clear_points(matched: usize, level: u32) -> u32 {
    (matched as u32)
        .saturating_mul(POINTS_PER_TILE)
        .saturating_mul(level)
}

/// Whether a clear is large enough to celebrate
pub fn is_big_clear(matched: usize) -> bool {
    matched >= BIG_CLEAR_TILES
}
