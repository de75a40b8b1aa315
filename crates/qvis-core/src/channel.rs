#![forbid(unsafe_code)]

//! Per-qubit pulse channels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the independent sub-lines drawn for every qubit in pulse mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Microwave,
    Flux,
    Readout,
}

impl Channel {
    /// All channels in drawing order (top to bottom).
    pub const ALL: [Self; 3] = [Self::Microwave, Self::Flux, Self::Readout];

    /// Position in [`ALL`](Self::ALL).
    #[inline]
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Lowercase name, matching the waveform mapping keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Microwave => "microwave",
            Self::Flux => "flux",
            Self::Readout => "readout",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
