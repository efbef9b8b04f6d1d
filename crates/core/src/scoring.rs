//! Scoring module - sweep rewards, line count and level policy
//!
//! - The k-th row removed by one sweep (k from 0) is worth `100 * 2^k`, so
//!   multi-row clears grow geometrically: 100, 300, 700, 1500 for 1-4 rows.
//! - Every removed row adds one line; each time the running line count hits a
//!   multiple of 10 the level goes up by one.
//! - The auto-drop interval shrinks by 100ms per level, floored at 100ms.

use crate::types::{
    BASE_DROP_MS, DROP_STEP_MS, LINES_PER_LEVEL, LINE_CLEAR_BASE, MIN_DROP_MS,
};

/// Outcome of scoring one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepScore {
    pub rows: u32,
    pub points: u32,
    pub lines: u32,
    pub level: u32,
    pub level_up: bool,
}

/// Points for removing `rows` rows in a single sweep.
pub fn sweep_points(rows: u32) -> u32 {
    let mut multiplier: u32 = 1;
    let mut points: u32 = 0;
    for _ in 0..rows {
        points = points.saturating_add(LINE_CLEAR_BASE.saturating_mul(multiplier));
        multiplier = multiplier.saturating_mul(2);
    }
    points
}

/// Apply a sweep of `rows` rows to the running line count and level.
///
/// The level check runs after every single row, so a multi-row clear that
/// crosses a multiple of 10 still levels up.
pub fn score_sweep(rows: u32, lines: u32, level: u32) -> SweepScore {
    let mut out = SweepScore {
        rows,
        points: sweep_points(rows),
        lines,
        level,
        level_up: false,
    };

    for _ in 0..rows {
        out.lines += 1;
        if out.lines % LINES_PER_LEVEL == 0 {
            out.level += 1;
            out.level_up = true;
        }
    }

    out
}

/// Auto-drop interval in milliseconds for a level (level 1 = 1000ms).
pub fn drop_interval_ms(level: u32) -> u32 {
    let reduction = level.saturating_sub(1).saturating_mul(DROP_STEP_MS);
    BASE_DROP_MS.saturating_sub(reduction).max(MIN_DROP_MS)
}
