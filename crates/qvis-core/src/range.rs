#![forbid(unsafe_code)]

//! Inclusive cycle ranges.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive `[start, end]` range of cycle indices.
///
/// Constructors never build an inverted range; those that could return
/// `None` instead. The fields are public and deserializable, so a range
/// with `end < start` can still be written by hand. Such a range is empty
/// and covers no cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EndPoints {
    /// First cycle (inclusive).
    pub start: usize,
    /// Last cycle (inclusive).
    pub end: usize,
}

impl EndPoints {
    /// Create a range, returning `None` when `end < start`.
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Option<Self> {
        if end < start {
            None
        } else {
            Some(Self { start, end })
        }
    }

    /// A range covering exactly one cycle.
    #[inline]
    #[must_use]
    pub const fn single(cycle: usize) -> Self {
        Self {
            start: cycle,
            end: cycle,
        }
    }

    /// A range of `len` cycles starting at `start`. `None` when `len == 0`.
    #[inline]
    #[must_use]
    pub const fn with_len(start: usize, len: usize) -> Option<Self> {
        if len == 0 {
            None
        } else {
            Some(Self {
                start,
                end: start + (len - 1),
            })
        }
    }

    /// Number of cycles covered (`end - start + 1`, or 0 when inverted).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }

    /// Whether the range is inverted. Constructed ranges never are.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Whether `cycle` lies inside the range.
    #[inline]
    #[must_use]
    pub const fn contains(&self, cycle: usize) -> bool {
        cycle >= self.start && cycle <= self.end
    }

    /// Clip the range to `[.., max]`. `None` if it starts after `max`.
    #[inline]
    #[must_use]
    pub const fn clip_end(self, max: usize) -> Option<Self> {
        if self.start > max {
            None
        } else if self.end > max {
            Some(Self {
                start: self.start,
                end: max,
            })
        } else {
            Some(self)
        }
    }

    /// Iterate over every cycle in the range.
    pub fn cycles(self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

impl fmt::Display for EndPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
