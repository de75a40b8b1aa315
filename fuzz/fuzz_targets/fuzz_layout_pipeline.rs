#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use qvis_core::{LayoutConfig, Operation, RowSpan};
use qvis_layout::LayoutEngine;

#[derive(Debug, Arbitrary)]
struct FuzzOp {
    cycle: u8,
    duration: u8,
    qubits: Vec<u8>,
    cbits: Vec<u8>,
    measure: bool,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    compress: bool,
    partition: bool,
    cut: bool,
    threshold: i8,
    ops: Vec<FuzzOp>,
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(input) = FuzzInput::arbitrary(&mut u) else {
        return;
    };

    let mut config = LayoutConfig::default();
    config.cycles.compress = input.compress;
    config.cycles.partition_cycles_with_overlap = input.partition;
    config.cycles.cutting.cut = input.cut;
    config.cycles.cutting.empty_cycle_threshold = i64::from(input.threshold);
    let engine = LayoutEngine::new(config);

    let ops: Vec<Operation> = input
        .ops
        .iter()
        .take(64)
        .map(|op| {
            let name = if op.measure { "measure" } else { "gate" };
            Operation::new(name, i64::from(op.cycle), u64::from(op.duration))
                .qubits(op.qubits.iter().take(4).map(|&q| usize::from(q % 16)))
                .cbits(op.cbits.iter().take(2).map(|&c| usize::from(c % 8)))
        })
        .collect();

    let Ok(layout) = engine.layout(&ops) else {
        assert!(ops.is_empty(), "only an empty list may fail here");
        return;
    };

    // Post-conditions that must always hold:
    for (i, cycle) in layout.cycles().iter().enumerate() {
        assert_eq!(cycle.index, i, "cycle indices not contiguous");
        assert!(cycle.lane_count() >= 1, "cycle without lanes");
        let inside = layout.cut_ranges().iter().any(|r| r.contains(i));
        assert_eq!(cycle.cut, inside, "cut flag disagrees with ranges");

        if cycle.lane_count() > 1 {
            for lane in &cycle.lanes {
                let spans: Vec<RowSpan> = lane
                    .iter()
                    .filter_map(|&id| layout.operation(id))
                    .filter_map(|op| RowSpan::of(op.operands(), layout.qubit_count()))
                    .collect();
                for (j, a) in spans.iter().enumerate() {
                    for b in &spans[j + 1..] {
                        assert!(!a.intersects(b), "overlapping spans share a lane");
                    }
                }
            }
        }
    }

    let placed: usize = layout.cycles().iter().map(|c| c.operation_count()).sum();
    assert_eq!(placed, ops.len(), "operation lost or duplicated");
    for pair in layout.cut_ranges().windows(2) {
        assert!(pair[0].end < pair[1].start, "cut ranges overlap");
    }
    if input.compress {
        assert!(layout.cycles().iter().all(|c| !c.empty), "empty cycle survived");
    }
});
