#![forbid(unsafe_code)]

//! Operands and the shared linear row space.
//!
//! Quantum and classical operands live in two disjoint row spaces that are
//! drawn in one grid. For overlap checks both are mapped onto a single
//! linear row index: quantum rows keep their index and classical rows are
//! placed after every quantum row.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which row space an operand addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BitKind {
    /// Qubit rows (primary).
    Quantum,
    /// Classical bit rows (auxiliary), always ordered after quantum rows.
    Classical,
}

/// A single operand of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operand {
    Quantum(usize),
    Classical(usize),
}

impl Operand {
    /// The row space this operand belongs to.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> BitKind {
        match self {
            Self::Quantum(_) => BitKind::Quantum,
            Self::Classical(_) => BitKind::Classical,
        }
    }

    /// Index within its own row space.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Quantum(i) | Self::Classical(i) => i,
        }
    }

    /// Row in the shared linear space, given the number of quantum rows.
    ///
    /// Saturates at `usize::MAX` instead of wrapping.
    #[inline]
    #[must_use]
    pub const fn row(self, qubit_count: usize) -> usize {
        match self {
            Self::Quantum(i) => i,
            Self::Classical(i) => qubit_count.saturating_add(i),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quantum(i) => write!(f, "q{i}"),
            Self::Classical(i) => write!(f, "c{i}"),
        }
    }
}

/// Closed interval of linear rows occupied by a multi-operand operation.
///
/// Only the extreme rows are kept. An operation on rows {0, 5} spans
/// `[0, 5]` even though rows 1..=4 are untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSpan {
    pub low: usize,
    pub high: usize,
}

impl RowSpan {
    /// Span of the given operands, or `None` for an empty operand list.
    #[must_use]
    pub fn of(operands: impl IntoIterator<Item = Operand>, qubit_count: usize) -> Option<Self> {
        operands.into_iter().fold(None, |span, operand| {
            let row = operand.row(qubit_count);
            Some(match span {
                None => Self {
                    low: row,
                    high: row,
                },
                Some(Self { low, high }) => Self {
                    low: low.min(row),
                    high: high.max(row),
                },
            })
        })
    }

    /// Whether the two closed spans share at least one row.
    #[inline]
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.low <= other.high && other.low <= self.high
    }
}
