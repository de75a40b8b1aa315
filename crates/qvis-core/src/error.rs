#![forbid(unsafe_code)]

//! Fatal layout errors.
//!
//! Only malformed scheduling input is fatal. Soft conditions such as a
//! missing waveform or an out-of-range configuration value are resolved
//! where they occur and reported through `tracing` instead.

use crate::operand::Operand;
use std::fmt;

/// Error returned when the operation list cannot be laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The operation list is empty.
    NoOperations,
    /// An operation starts at a cycle outside `0..=max`.
    CycleOutOfRange {
        operation: String,
        cycle: i64,
        max: i64,
    },
    /// The last operation runs past the largest supported cycle.
    SpanOutOfRange {
        operation: String,
        end_cycle: usize,
        max: i64,
    },
    /// An operation addresses a qubit or classical bit above `max`.
    RowOutOfRange {
        operation: String,
        operand: Operand,
        max: usize,
    },
    /// The cycle duration is zero, so no duration can be converted to cycles.
    InvalidCycleDuration { duration: u64 },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOperations => write!(f, "operation list contains no operations"),
            Self::CycleOutOfRange {
                operation,
                cycle,
                max,
            } => write!(
                f,
                "operation '{operation}' has cycle index {cycle}; only indices between 0 and {max} \
                 are allowed (was the circuit scheduled?)"
            ),
            Self::SpanOutOfRange {
                operation,
                end_cycle,
                max,
            } => write!(
                f,
                "operation '{operation}' ends at cycle {end_cycle}, past the maximum cycle {max}"
            ),
            Self::RowOutOfRange {
                operation,
                operand,
                max,
            } => write!(
                f,
                "operation '{operation}' addresses {operand}; only indices up to {max} are allowed"
            ),
            Self::InvalidCycleDuration { duration } => {
                write!(f, "invalid cycle duration {duration}: must be > 0")
            }
        }
    }
}

impl std::error::Error for LayoutError {}
