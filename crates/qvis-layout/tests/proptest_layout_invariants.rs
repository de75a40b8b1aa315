//! Property-based invariant tests for the layout pipeline.
//!
//! 1. Cycle indices are contiguous after every stage
//! 2. No two operations in a split cycle's lane have intersecting row spans
//! 3. Partitioning never loses or duplicates an operation
//! 4. Compression removes exactly the empty cycles and is idempotent
//! 5. A cut range exists iff a maximal empty run reaches the threshold
//! 6. Channel lines tile `[0, total_cycles - 1]` for any lookup coverage
//! 7. Determinism: the same input yields the same layout

use proptest::prelude::*;
use qvis_core::{Channel, EndPoints, LayoutConfig, Operation, RowSpan};
use qvis_layout::{
    GatePulses, LayoutEngine, SampleRates, Timeline, WaveformMapping, compress, cut_empty_cycles,
    partition_lanes, stitch_qubit_lines,
};

// ── Strategies ──────────────────────────────────────────────────────────

fn operation_strategy() -> impl Strategy<Value = Operation> {
    (
        0i64..40,
        0u64..100,
        prop::collection::vec(0usize..8, 0..4),
        prop::collection::vec(0usize..3, 0..2),
        0u32..6,
    )
        .prop_map(|(cycle, duration, qubits, cbits, codeword)| {
            Operation::new("op", cycle, duration)
                .qubits(qubits)
                .cbits(cbits)
                .codewords([codeword])
        })
}

fn operations_strategy() -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(operation_strategy(), 1..40)
}

fn build(ops: Vec<Operation>) -> Timeline {
    Timeline::build(ops, 20).expect("generated operations are valid")
}

/// Maximal runs of empty cycles, computed independently of the detector.
fn empty_runs(timeline: &Timeline) -> Vec<EndPoints> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, cycle) in timeline.cycles().iter().enumerate() {
        match (cycle.empty, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                out.push(EndPoints::new(s, i - 1).unwrap());
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push(EndPoints::new(s, timeline.len() - 1).unwrap());
    }
    out
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Contiguous indices
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn indices_contiguous_after_every_stage(ops in operations_strategy()) {
        let mut timeline = compress(&build(ops));
        partition_lanes(&mut timeline);
        cut_empty_cycles(&mut timeline, 2);
        for (i, cycle) in timeline.cycles().iter().enumerate() {
            prop_assert_eq!(cycle.index, i);
            prop_assert!(cycle.lane_count() >= 1);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2-3. Lane partitioning
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn split_lanes_never_share_rows(ops in operations_strategy()) {
        let mut timeline = build(ops);
        partition_lanes(&mut timeline);
        let qubits = timeline.qubit_count();

        for cycle in timeline.cycles().iter().filter(|c| c.lane_count() > 1) {
            for lane in &cycle.lanes {
                let spans: Vec<RowSpan> = lane
                    .iter()
                    .filter_map(|&id| {
                        let op = timeline.operation(id).unwrap();
                        RowSpan::of(op.operands(), qubits)
                    })
                    .collect();
                for (i, a) in spans.iter().enumerate() {
                    for b in &spans[i + 1..] {
                        prop_assert!(
                            !a.intersects(b),
                            "cycle {} lane shares rows: {:?} vs {:?}",
                            cycle.index,
                            a,
                            b
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn operations_without_operands_never_leave_lane_zero(ops in operations_strategy()) {
        let mut timeline = build(ops);
        partition_lanes(&mut timeline);

        for cycle in timeline.cycles() {
            for lane in &cycle.lanes[1..] {
                for &id in lane {
                    prop_assert!(timeline.operation(id).unwrap().operand_count() > 0);
                }
            }
        }
    }

    #[test]
    fn partition_preserves_membership(ops in operations_strategy()) {
        let before = build(ops);
        let mut after = before.clone();
        partition_lanes(&mut after);

        for (a, b) in before.cycles().iter().zip(after.cycles()) {
            let mut x: Vec<_> = a.operation_ids().collect();
            let mut y: Vec<_> = b.operation_ids().collect();
            x.sort();
            y.sort();
            prop_assert_eq!(x, y);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Compression
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn compression_count_and_idempotence(ops in operations_strategy()) {
        let original = build(ops);
        let once = compress(&original);
        prop_assert_eq!(once.len(), original.len() - original.empty_cycle_count());
        prop_assert!(once.cycles().iter().all(|c| !c.empty));
        prop_assert_eq!(compress(&once), once.clone());
    }

    #[test]
    fn compression_keeps_relative_order(ops in operations_strategy()) {
        let original = build(ops);
        let compressed = compress(&original);
        for (a, b) in original.operations().iter().zip(compressed.operations()) {
            prop_assert!(b.cycle <= a.cycle);
        }
        for (i, a) in original.operations().iter().enumerate() {
            for (j, b) in original.operations().iter().enumerate() {
                let ca = compressed.operations()[i].cycle;
                let cb = compressed.operations()[j].cycle;
                prop_assert_eq!(a.cycle.cmp(&b.cycle), ca.cmp(&cb));
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Cut ranges
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cut_iff_run_reaches_threshold(ops in operations_strategy(), threshold in 1usize..8) {
        let mut timeline = build(ops);
        let expected: Vec<_> = empty_runs(&timeline)
            .into_iter()
            .filter(|r| r.len() >= threshold)
            .collect();
        let ranges = cut_empty_cycles(&mut timeline, threshold);
        prop_assert_eq!(&ranges, &expected);

        for cycle in timeline.cycles() {
            let inside = ranges.iter().any(|r| r.contains(cycle.index));
            prop_assert_eq!(cycle.cut, inside);
        }
        for pair in ranges.windows(2) {
            prop_assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn threshold_one_cuts_every_empty_cycle(ops in operations_strategy()) {
        let mut timeline = build(ops);
        cut_empty_cycles(&mut timeline, 1);
        for cycle in timeline.cycles() {
            prop_assert_eq!(cycle.cut, cycle.empty);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 6. Channel tiling
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn channel_lines_tile_the_timeline(
        ops in operations_strategy(),
        known in prop::collection::vec((0u32..6, 0usize..8), 0..20),
    ) {
        let mut mapping = WaveformMapping::new(SampleRates {
            microwave: 1000,
            flux: 1000,
            readout: 500,
        });
        for (codeword, qubit) in known {
            mapping.insert(
                codeword,
                qubit,
                GatePulses {
                    microwave: vec![0.5],
                    flux: if qubit % 2 == 0 { vec![-1.0] } else { Vec::new() },
                    readout: vec![0.25, 0.75],
                },
            );
        }

        let timeline = build(ops);
        let layout = stitch_qubit_lines(&timeline, &mapping);
        prop_assert_eq!(layout.rows.len(), timeline.qubit_count());
        for lines in &layout.rows {
            for channel in Channel::ALL {
                let line = lines.line(channel);
                prop_assert!(line.tiles(layout.total_cycles), "{:?} line does not tile", channel);
                prop_assert!(line.max_amplitude >= 0.0);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 7. Determinism
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn layout_is_deterministic(ops in operations_strategy(), compressed in any::<bool>()) {
        let mut config = LayoutConfig::default();
        config.cycles.compress = compressed;
        let engine = LayoutEngine::new(config);
        prop_assert_eq!(engine.layout(&ops), engine.layout(&ops));
    }
}
