#![forbid(unsafe_code)]

//! The layout pipeline.
//!
//! [`LayoutEngine`] owns a validated [`LayoutConfig`] and runs one request
//! at a time over a borrowed operation list:
//!
//! ```text
//! copy + measurement fix -> build -> [compress] -> [partition] -> [cut]
//! ```
//!
//! Pulse mode skips the optional stages and stitches channel lines over
//! the uncompacted timeline instead.
//!
//! Each request works on its own copy of the operations, so an engine can
//! be shared between threads and the caller's list is never modified.

use crate::columns::{BitLineSegment, ColumnLayout, bit_line_segments};
use crate::compress::compress;
use crate::cut::cut_empty_cycles;
use crate::partition::partition_lanes;
use crate::pulse::{PulseLayout, WaveformLookup, stitch_qubit_lines};
use crate::timeline::{Cycle, OpId, Timeline};
use qvis_core::{EndPoints, LayoutConfig, LayoutError, Operation};
use serde::Serialize;
use tracing::debug;

/// Result of [`LayoutEngine::layout`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitLayout {
    timeline: Timeline,
    cut_ranges: Vec<EndPoints>,
    compressed_away: usize,
}

impl CircuitLayout {
    /// Final cycle sequence.
    #[inline]
    #[must_use]
    pub fn cycles(&self) -> &[Cycle] {
        self.timeline.cycles()
    }

    #[must_use]
    pub fn cycle(&self, index: usize) -> Option<&Cycle> {
        self.timeline.cycle(index)
    }

    #[inline]
    #[must_use]
    pub fn cycle_count(&self) -> usize {
        self.timeline.len()
    }

    /// The layout's copy of the operations. Start cycles reflect
    /// compression; measurements may carry a default classical operand.
    #[inline]
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        self.timeline.operations()
    }

    #[must_use]
    pub fn operation(&self, id: OpId) -> Option<&Operation> {
        self.timeline.operation(id)
    }

    /// Operations in `lane` of `cycle`; empty when either is out of range.
    pub fn lane_operations(&self, cycle: usize, lane: usize) -> impl Iterator<Item = &Operation> {
        self.timeline
            .cycle(cycle)
            .and_then(|c| c.lanes.get(lane))
            .into_iter()
            .flatten()
            .filter_map(|&id| self.timeline.operation(id))
    }

    /// Collapsed ranges, ordered by start.
    #[inline]
    #[must_use]
    pub fn cut_ranges(&self) -> &[EndPoints] {
        &self.cut_ranges
    }

    #[must_use]
    pub fn is_cycle_cut(&self, cycle: usize) -> bool {
        self.timeline.cycle(cycle).is_some_and(|c| c.cut)
    }

    /// Whether a cut range starts at `cycle`.
    #[must_use]
    pub fn is_first_in_cut_range(&self, cycle: usize) -> bool {
        self.cut_ranges
            .binary_search_by_key(&cycle, |r| r.start)
            .is_ok()
    }

    #[must_use]
    pub fn cut_range_containing(&self, cycle: usize) -> Option<EndPoints> {
        let i = self.cut_ranges.partition_point(|r| r.end < cycle);
        self.cut_ranges.get(i).copied().filter(|r| r.contains(cycle))
    }

    #[inline]
    #[must_use]
    pub fn qubit_count(&self) -> usize {
        self.timeline.qubit_count()
    }

    #[inline]
    #[must_use]
    pub fn cbit_count(&self) -> usize {
        self.timeline.cbit_count()
    }

    /// Number of empty cycles removed by compression (0 when disabled).
    #[inline]
    #[must_use]
    pub fn compressed_away(&self) -> usize {
        self.compressed_away
    }

    /// Row lines split into cut and uncut stretches.
    #[must_use]
    pub fn bit_line_segments(&self) -> Vec<BitLineSegment> {
        bit_line_segments(self.cycles())
    }
}

/// Runs layout requests under one configuration.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create an engine. The configuration is validated here once.
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config: config.validated(),
        }
    }

    /// The validated configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `operations` as a circuit.
    ///
    /// # Errors
    ///
    /// Fails on an empty list, a zero cycle duration, operand indices above
    /// `MAX_ROW_INDEX`, or start cycles (or the last operation's span)
    /// outside the supported range.
    pub fn layout(&self, operations: &[Operation]) -> Result<CircuitLayout, LayoutError> {
        let _span = tracing::debug_span!("qvis.layout", operations = operations.len()).entered();

        let mut operations = operations.to_vec();
        let mut fixed = 0usize;
        for op in &mut operations {
            if op.assign_default_measurement_operand() {
                fixed += 1;
            }
        }
        if fixed > 0 {
            debug!(fixed, "assigned default classical operands to measurements");
        }

        let cycles = &self.config.cycles;
        let mut timeline = Timeline::build(operations, self.config.cycle_duration)?;

        let mut compressed_away = 0;
        if cycles.compress {
            let before = timeline.len();
            timeline = compress(&timeline);
            compressed_away = before - timeline.len();
        }
        if cycles.partition_cycles_with_overlap {
            partition_lanes(&mut timeline);
        }
        let cut_ranges = if cycles.cutting.cut {
            cut_empty_cycles(&mut timeline, cycles.cutting.threshold())
        } else {
            Vec::new()
        };

        Ok(CircuitLayout {
            timeline,
            cut_ranges,
            compressed_away,
        })
    }

    /// Lay out `operations` as per-qubit channel lines.
    ///
    /// Compression, partitioning and cutting never apply here.
    ///
    /// # Errors
    ///
    /// Same conditions as [`LayoutEngine::layout`].
    pub fn pulse_layout(
        &self,
        operations: &[Operation],
        waveforms: &dyn WaveformLookup,
    ) -> Result<PulseLayout, LayoutError> {
        let _span =
            tracing::debug_span!("qvis.pulse_layout", operations = operations.len()).entered();

        let timeline = Timeline::build(operations.to_vec(), self.config.cycle_duration)?;
        Ok(stitch_qubit_lines(&timeline, waveforms))
    }

    /// Column geometry of `layout` under this engine's grid options.
    #[must_use]
    pub fn columns(&self, layout: &CircuitLayout) -> ColumnLayout {
        ColumnLayout::compute(layout.cycles(), &self.config)
    }
}
