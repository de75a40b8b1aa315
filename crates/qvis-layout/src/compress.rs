#![forbid(unsafe_code)]

//! Cycle compression: drop empty cycles and renumber the rest.
//!
//! Each kept cycle gets `index = original - empty_cycles_seen_so_far`, and
//! every operation starting in it has its start cycle decreased by the
//! same amount. The input timeline is left untouched; compression works on
//! a copy.
//!
//! # Invariants
//!
//! 1. Relative order of non-empty cycles is preserved.
//! 2. `compressed.len() == original.len() - original.empty_cycle_count()`.
//! 3. Compressing a compressed timeline returns an equal timeline.

use crate::timeline::Timeline;
use tracing::debug;

/// Return a copy of `timeline` without empty cycles.
#[must_use]
pub fn compress(timeline: &Timeline) -> Timeline {
    let _span = tracing::debug_span!("qvis.compress", cycles = timeline.len()).entered();

    let mut compressed = timeline.clone();
    let mut removed = 0usize;
    let mut kept = Vec::with_capacity(timeline.len() - timeline.empty_cycle_count());

    for cycle in &timeline.cycles {
        if cycle.empty {
            removed += 1;
            continue;
        }
        let mut cycle = cycle.clone();
        cycle.index -= removed;
        let shift = i64::try_from(removed).unwrap_or(i64::MAX);
        for id in cycle.operation_ids() {
            compressed.operations[id.raw()].cycle -= shift;
        }
        kept.push(cycle);
    }

    compressed.cycles = kept;
    debug!(removed, remaining = compressed.len(), "compressed cycles");
    compressed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::OpId;
    use qvis_core::Operation;

    fn timeline(starts: &[i64]) -> Timeline {
        let ops = starts
            .iter()
            .enumerate()
            .map(|(i, &c)| Operation::new(format!("g{i}"), c, 20).qubits([0]))
            .collect();
        Timeline::build(ops, 20).unwrap()
    }

    #[test]
    fn removes_empty_cycles_and_reindexes() {
        let original = timeline(&[0, 3, 3, 7]);
        let compressed = compress(&original);
        assert_eq!(compressed.len(), 3);
        let indices: Vec<_> = compressed.cycles().iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(compressed.cycles().iter().all(|c| !c.empty));
    }

    #[test]
    fn rewrites_operation_cycles() {
        let original = timeline(&[0, 3, 3, 7]);
        let compressed = compress(&original);
        let cycles: Vec<_> = compressed.operations().iter().map(|op| op.cycle).collect();
        assert_eq!(cycles, vec![0, 1, 1, 2]);
        assert_eq!(compressed.start_cycle(OpId::from_raw(3)), Some(2));
    }

    #[test]
    fn original_is_untouched() {
        let original = timeline(&[0, 5]);
        let before = original.clone();
        let _ = compress(&original);
        assert_eq!(original, before);
        assert_eq!(original.operations()[1].cycle, 5);
    }

    #[test]
    fn count_matches_empty_cycles() {
        let original = timeline(&[1, 2, 9, 9, 4]);
        let compressed = compress(&original);
        assert_eq!(
            compressed.len(),
            original.len() - original.empty_cycle_count()
        );
    }

    #[test]
    fn idempotent() {
        let once = compress(&timeline(&[0, 4, 4, 10]));
        let twice = compress(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn trailing_duration_cycles_are_removed() {
        let ops = vec![Operation::new("long", 0, 100).qubits([0])];
        let original = Timeline::build(ops, 20).unwrap();
        assert_eq!(original.len(), 5);
        assert_eq!(compress(&original).len(), 1);
    }
}
