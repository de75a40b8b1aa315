#![forbid(unsafe_code)]

//! Cut-range detection: collapse long runs of empty cycles.
//!
//! A maximal run of consecutive empty cycles becomes a cut range when its
//! length reaches the threshold. Every cycle inside an accepted range has
//! its `cut` flag set; shorter runs stay plain empty cycles.
//!
//! # Invariants
//!
//! 1. Cut ranges are pairwise disjoint and ordered by start.
//! 2. `cycle.cut` is true iff the cycle lies in a returned range.
//! 3. With threshold 1 every empty run is cut.

use crate::timeline::{Cycle, Timeline};
use qvis_core::EndPoints;
use tracing::debug;

/// Split `values` into maximal runs of equal values.
///
/// Each run is reported with its inclusive index range.
pub(crate) fn runs<T: PartialEq + Copy>(
    values: impl IntoIterator<Item = T>,
) -> Vec<(EndPoints, T)> {
    let mut out: Vec<(EndPoints, T)> = Vec::new();
    for (i, value) in values.into_iter().enumerate() {
        match out.last_mut() {
            Some((range, current)) if *current == value => range.end = i,
            _ => out.push((EndPoints::single(i), value)),
        }
    }
    out
}

/// Maximal empty runs of at least `threshold` cycles. A threshold of 0 is
/// treated as 1.
#[must_use]
pub fn find_cut_ranges(cycles: &[Cycle], threshold: usize) -> Vec<EndPoints> {
    let threshold = threshold.max(1);
    runs(cycles.iter().map(|c| c.empty))
        .into_iter()
        .filter(|&(range, empty)| empty && range.len() >= threshold)
        .map(|(range, _)| range)
        .collect()
}

/// Detect cut ranges in `timeline` and mark their cycles as cut.
///
/// Flags left over from an earlier pass are cleared first.
pub fn cut_empty_cycles(timeline: &mut Timeline, threshold: usize) -> Vec<EndPoints> {
    let _span = tracing::debug_span!("qvis.cut", cycles = timeline.len(), threshold).entered();

    let ranges = find_cut_ranges(&timeline.cycles, threshold);
    for cycle in &mut timeline.cycles {
        cycle.cut = false;
    }
    for range in &ranges {
        for cycle in &mut timeline.cycles[range.cycles()] {
            cycle.cut = true;
        }
    }

    debug!(ranges = ranges.len(), "detected cut ranges");
    ranges
}
