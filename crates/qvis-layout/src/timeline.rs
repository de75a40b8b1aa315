#![forbid(unsafe_code)]

//! Timeline construction: bucket operations into cycles.
//!
//! # Cycle count
//!
//! `cycles = max(start) + 1`, extended by `ceil(last.duration / cycle) - 1`
//! when the last operation in the list spans more than one cycle. None of
//! those trailing cycles shows up as a start cycle of any operation, so
//! they are only visible through the duration.
//!
//! # Invariants
//!
//! 1. Cycle indices are `0..len()` in order.
//! 2. A cycle is empty iff no operation starts in it.
//! 3. Right after [`Timeline::build`] every cycle has exactly one lane,
//!    holding the operations that start there in input order.
//!
//! # Failure Modes
//!
//! Start cycles outside `0..=MAX_CYCLE_INDEX`, operand indices above
//! `MAX_ROW_INDEX`, an empty operation list and a zero cycle duration are
//! fatal; see [`LayoutError`].

use qvis_core::{LayoutError, MAX_CYCLE_INDEX, MAX_ROW_INDEX, Operand, Operation};
use serde::Serialize;
use std::fmt;
use tracing::debug;

const MAX_CYCLE: usize = MAX_CYCLE_INDEX as usize;

// ============================================================================
// OpId
// ============================================================================

/// Handle to an operation owned by a [`Timeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OpId(usize);

impl OpId {
    /// Create an id from a raw index into [`Timeline::operations`].
    #[must_use]
    pub const fn from_raw(index: usize) -> Self {
        Self(index)
    }

    /// The raw index.
    #[must_use]
    pub const fn raw(self) -> usize {
        self.0
    }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op{}", self.0)
    }
}

// ============================================================================
// Cycle
// ============================================================================

/// One time slot of the layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    /// Position in the owning timeline.
    pub index: usize,
    /// No operation starts in this cycle.
    pub empty: bool,
    /// Part of a collapsed idle range.
    pub cut: bool,
    /// Parallel lanes; each holds operations whose row spans are disjoint
    /// once the cycle has been partitioned.
    pub lanes: Vec<Vec<OpId>>,
}

impl Cycle {
    fn new(index: usize) -> Self {
        Self {
            index,
            empty: true,
            cut: false,
            lanes: vec![Vec::new()],
        }
    }

    /// Number of lanes (at least 1).
    #[inline]
    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Every operation starting in this cycle, lane by lane.
    pub fn operation_ids(&self) -> impl Iterator<Item = OpId> + '_ {
        self.lanes.iter().flatten().copied()
    }

    /// Number of operations starting in this cycle.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.lanes.iter().map(Vec::len).sum()
    }
}

// ============================================================================
// Timeline
// ============================================================================

/// Operations bucketed into cycles.
///
/// The timeline owns its copy of the operation list. Later stages rewrite
/// that copy, never the caller's list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub(crate) cycles: Vec<Cycle>,
    pub(crate) operations: Vec<Operation>,
    qubit_count: usize,
    cbit_count: usize,
    cycle_duration: u64,
}

impl Timeline {
    /// Bucket `operations` into cycles of `cycle_duration`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] for an empty list, a zero cycle duration, a
    /// start cycle outside `0..=MAX_CYCLE_INDEX`, an operand index above
    /// `MAX_ROW_INDEX`, or a last operation that ends past the cycle bound.
    pub fn build(operations: Vec<Operation>, cycle_duration: u64) -> Result<Self, LayoutError> {
        let _span = tracing::debug_span!(
            "qvis.timeline",
            operations = operations.len(),
            cycle_duration
        )
        .entered();

        if cycle_duration == 0 {
            return Err(LayoutError::InvalidCycleDuration {
                duration: cycle_duration,
            });
        }
        let Some(last) = operations.last() else {
            return Err(LayoutError::NoOperations);
        };

        let mut starts = Vec::with_capacity(operations.len());
        for op in &operations {
            starts.push(validated_start(op)?);
            validate_rows(op)?;
        }
        let max_start = starts.iter().copied().max().unwrap_or(0);

        let extra = usize::try_from(last.duration_in_cycles(cycle_duration).saturating_sub(1))
            .unwrap_or(usize::MAX);
        let last_cycle = max_start.saturating_add(extra);
        if last_cycle > MAX_CYCLE {
            return Err(LayoutError::SpanOutOfRange {
                operation: last.name.clone(),
                end_cycle: last_cycle,
                max: MAX_CYCLE_INDEX,
            });
        }

        let mut cycles: Vec<Cycle> = (0..=last_cycle).map(Cycle::new).collect();
        for (i, &start) in starts.iter().enumerate() {
            let cycle = &mut cycles[start];
            cycle.empty = false;
            cycle.lanes[0].push(OpId(i));
        }

        let qubit_count = row_count(operations.iter().flat_map(|op| op.qubits.iter()));
        let cbit_count = row_count(operations.iter().flat_map(|op| op.cbits.iter()));
        debug!(
            cycles = cycles.len(),
            qubit_count, cbit_count, "built timeline"
        );

        Ok(Self {
            cycles,
            operations,
            qubit_count,
            cbit_count,
            cycle_duration,
        })
    }

    /// All cycles in index order.
    #[inline]
    #[must_use]
    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    /// The cycle at `index`, if any.
    #[must_use]
    pub fn cycle(&self, index: usize) -> Option<&Cycle> {
        self.cycles.get(index)
    }

    /// Number of cycles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    /// Whether there are no cycles. Never true for a built timeline.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Number of cycles in which no operation starts.
    #[must_use]
    pub fn empty_cycle_count(&self) -> usize {
        self.cycles.iter().filter(|c| c.empty).count()
    }

    /// The timeline's copy of the operations, in input order.
    #[inline]
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Look up an operation by id.
    #[must_use]
    pub fn operation(&self, id: OpId) -> Option<&Operation> {
        self.operations.get(id.0)
    }

    /// Start cycle of an operation.
    ///
    /// Start cycles are validated non-negative on build and only ever
    /// decreased by compression down to their cycle's new index.
    #[must_use]
    pub fn start_cycle(&self, id: OpId) -> Option<usize> {
        self.operations
            .get(id.0)
            .and_then(|op| usize::try_from(op.cycle).ok())
    }

    /// Number of quantum rows (highest qubit index + 1).
    #[inline]
    #[must_use]
    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    /// Number of classical rows (highest classical index + 1).
    #[inline]
    #[must_use]
    pub fn cbit_count(&self) -> usize {
        self.cbit_count
    }

    /// Cycle duration the timeline was built with.
    #[inline]
    #[must_use]
    pub fn cycle_duration(&self) -> u64 {
        self.cycle_duration
    }
}

fn validated_start(op: &Operation) -> Result<usize, LayoutError> {
    match usize::try_from(op.cycle) {
        Ok(start) if start <= MAX_CYCLE => Ok(start),
        _ => Err(LayoutError::CycleOutOfRange {
            operation: op.name.clone(),
            cycle: op.cycle,
            max: MAX_CYCLE_INDEX,
        }),
    }
}

fn validate_rows(op: &Operation) -> Result<(), LayoutError> {
    match op.operands().find(|operand| operand.index() > MAX_ROW_INDEX) {
        Some(operand) => Err(LayoutError::RowOutOfRange {
            operation: op.name.clone(),
            operand,
            max: MAX_ROW_INDEX,
        }),
        None => Ok(()),
    }
}

fn row_count<'a>(indices: impl Iterator<Item = &'a usize>) -> usize {
    indices.max().map_or(0, |&max| max.saturating_add(1))
}
