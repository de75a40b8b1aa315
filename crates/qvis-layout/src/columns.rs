#![forbid(unsafe_code)]

//! Horizontal geometry derived from the final cycle sequence.
//!
//! Two views are provided:
//!
//! - [`bit_line_segments`]: the row lines split into alternating cut and
//!   uncut stretches, so a renderer can draw a broken line across collapsed
//!   ranges.
//! - [`ColumnLayout`]: one `[x0, x1)` extent per cycle in grid units.
//!
//! # Column rules
//!
//! | cycle           | width                   | cursor advance afterwards          |
//! |-----------------|-------------------------|------------------------------------|
//! | not cut         | `cellSize * lane_count` | width                              |
//! | cut, inside run | `cutCycleWidth`         | none                               |
//! | cut, end of run | `cutCycleWidth`         | `cellSize * cutCycleWidthModifier` |
//!
//! All cycles of one cut range therefore share the same `x0`. The advance
//! rules only apply while cutting is enabled; otherwise every cycle
//! advances by its width.

use crate::cut::runs;
use crate::timeline::Cycle;
use qvis_core::{EndPoints, LayoutConfig};
use serde::Serialize;

// ============================================================================
// Bit lines
// ============================================================================

/// A stretch of a row line with a uniform cut flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BitLineSegment {
    pub range: EndPoints,
    pub cut: bool,
}

/// Split `[0, cycles.len() - 1]` into maximal runs of equal cut flag.
#[must_use]
pub fn bit_line_segments(cycles: &[Cycle]) -> Vec<BitLineSegment> {
    runs(cycles.iter().map(|c| c.cut))
        .into_iter()
        .map(|(range, cut)| BitLineSegment { range, cut })
        .collect()
}

// ============================================================================
// Columns
// ============================================================================

/// Horizontal extent of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub cycle: usize,
    /// Left edge (inclusive).
    pub x0: u32,
    /// Right edge (exclusive).
    pub x1: u32,
}

impl Column {
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.x1 - self.x0
    }
}

/// Column extents for every cycle, in cycle order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnLayout {
    columns: Vec<Column>,
}

impl ColumnLayout {
    /// Compute column extents for `cycles` using the grid and cutting
    /// options of `config`.
    #[must_use]
    pub fn compute(cycles: &[Cycle], config: &LayoutConfig) -> Self {
        let cell = config.grid.cell_size;
        let cutting = &config.cycles.cutting;
        let gap = (cell as f32 * cutting.cut_cycle_width_modifier.max(0.0)) as u32;

        let mut columns = Vec::with_capacity(cycles.len());
        let mut cursor = 0u32;
        for (i, cycle) in cycles.iter().enumerate() {
            let lanes = u32::try_from(cycle.lane_count()).unwrap_or(u32::MAX);
            let width = if cycle.cut {
                cutting.cut_cycle_width
            } else {
                cell.saturating_mul(lanes)
            };
            columns.push(Column {
                cycle: cycle.index,
                x0: cursor,
                x1: cursor.saturating_add(width),
            });

            let advance = if cutting.cut && cycle.cut {
                let run_ends = cycles.get(i + 1).is_some_and(|next| !next.cut);
                if run_ends { gap } else { 0 }
            } else {
                width
            };
            cursor = cursor.saturating_add(advance);
        }

        Self { columns }
    }

    /// All columns in cycle order.
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column of `cycle`, if any.
    #[must_use]
    pub fn column(&self, cycle: usize) -> Option<&Column> {
        self.columns.get(cycle)
    }

    /// Right edge of the last column; 0 when there are no cycles.
    #[must_use]
    pub fn total_width(&self) -> u32 {
        self.columns.last().map_or(0, |c| c.x1)
    }
}
