#![forbid(unsafe_code)]

//! Lane partitioning for cycles with overlapping multi-operand operations.
//!
//! A multi-operand operation is drawn as a vertical connection between its
//! extreme rows. Two such connections in the same cycle that share a row
//! would be drawn on top of each other, so the cycle is split into lanes.
//!
//! # Algorithm
//!
//! Per cycle, only when lane 0 holds more than one operation:
//!
//! 1. Candidates are operations with two or more operands in total.
//! 2. Each candidate's [`RowSpan`] covers `[min row, max row]` in the
//!    shared row space (classical rows offset by the qubit count).
//! 3. First fit: each candidate, in input order, goes into the first lane
//!    (in creation order) whose spans it does not intersect; otherwise it
//!    opens a new lane.
//! 4. If that yields one lane, the cycle keeps its original single lane.
//! 5. Otherwise single-row operations are placed by the same first-fit rule
//!    so that no operation disappears from the cycle.
//! 6. Operations without operands (waits, barriers) occupy no row. They
//!    join lane 0 without an overlap check and never open a lane.
//!
//! Only the extreme rows are compared. An operation on rows {0, 5} spans
//! [0, 5] and therefore clashes with one on rows {3, 4}, although it never
//! touches rows 3 or 4 itself.
//!
//! # Invariants
//!
//! 1. No two operations sharing a lane have intersecting row spans
//!    (whenever the cycle was split).
//! 2. Lane order is deterministic given input order.

use crate::timeline::{OpId, Timeline};
use qvis_core::{Operation, RowSpan};
use tracing::{debug, trace};

/// A lane under construction.
#[derive(Debug, Default)]
struct Lane {
    members: Vec<OpId>,
    spans: Vec<RowSpan>,
}

impl Lane {
    fn accepts(&self, span: &RowSpan) -> bool {
        !self.spans.iter().any(|placed| placed.intersects(span))
    }

    fn push(&mut self, id: OpId, span: RowSpan) {
        self.members.push(id);
        self.spans.push(span);
    }
}

/// Place `(id, span)` in the first lane that accepts it, opening a new
/// lane when none does.
fn first_fit(lanes: &mut Vec<Lane>, id: OpId, span: RowSpan) {
    match lanes.iter_mut().find(|lane| lane.accepts(&span)) {
        Some(lane) => lane.push(id, span),
        None => {
            let mut lane = Lane::default();
            lane.push(id, span);
            lanes.push(lane);
        }
    }
}

fn span_of(op: &Operation, qubit_count: usize) -> Option<RowSpan> {
    RowSpan::of(op.operands(), qubit_count)
}

/// Split overlapping cycles of `timeline` into lanes.
///
/// Returns the number of cycles that were split.
pub fn partition_lanes(timeline: &mut Timeline) -> usize {
    let _span = tracing::debug_span!("qvis.partition", cycles = timeline.len()).entered();

    let qubit_count = timeline.qubit_count();
    let mut split = 0;

    for cycle in &mut timeline.cycles {
        if cycle.lanes[0].len() < 2 {
            continue;
        }

        let mut candidates = Vec::new();
        let mut singles = Vec::new();
        let mut rowless = Vec::new();
        for &id in &cycle.lanes[0] {
            let op = &timeline.operations[id.raw()];
            match span_of(op, qubit_count) {
                Some(span) if op.operand_count() > 1 => candidates.push((id, span)),
                Some(span) => singles.push((id, span)),
                None => rowless.push(id),
            }
        }
        if candidates.len() < 2 {
            continue;
        }

        let mut lanes: Vec<Lane> = Vec::new();
        for (id, span) in candidates {
            first_fit(&mut lanes, id, span);
        }
        if lanes.len() < 2 {
            continue;
        }
        for (id, span) in singles {
            first_fit(&mut lanes, id, span);
        }
        lanes[0].members.extend(rowless);

        debug!(
            cycle = cycle.index,
            lanes = lanes.len(),
            "divided cycle into lanes"
        );
        for (i, lane) in lanes.iter().enumerate() {
            trace!(cycle = cycle.index, lane = i, members = ?lane.members);
        }

        cycle.lanes = lanes.into_iter().map(|lane| lane.members).collect();
        split += 1;
    }

    split
}
