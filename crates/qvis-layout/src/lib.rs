#![forbid(unsafe_code)]

//! Timeline layout for scheduled quantum operations.
//!
//! # Role in qvis
//! `qvis-layout` turns a flat, already-scheduled operation list into a
//! renderable layout. It never renders; the renderer consumes the cycle
//! sequence, cut ranges, column geometry and (in pulse mode) channel lines.
//!
//! # Stages
//! - [`timeline`]: bucket operations into cycles.
//! - [`compress`]: drop empty cycles and renumber.
//! - [`partition`]: split cycles with overlapping connections into lanes.
//! - [`cut`]: collapse long runs of empty cycles.
//! - [`pulse`]: stitch gap-free channel lines from waveform data.
//! - [`columns`]: column extents and bit-line segments.
//! - [`engine`]: the pipeline composing the stages under one config.
//!
//! # Example
//!
//! ```
//! use qvis_core::{EndPoints, LayoutConfig, Operation};
//! use qvis_layout::LayoutEngine;
//!
//! let mut config = LayoutConfig::default();
//! config.cycles.cutting.empty_cycle_threshold = 3;
//! let engine = LayoutEngine::new(config);
//!
//! let ops = [
//!     Operation::new("x", 0, 20).qubits([0]),
//!     Operation::new("y", 5, 20).qubits([0]),
//! ];
//! let layout = engine.layout(&ops).unwrap();
//! assert_eq!(layout.cut_ranges(), &[EndPoints::new(1, 4).unwrap()]);
//! ```

pub mod columns;
pub mod compress;
pub mod cut;
pub mod engine;
pub mod partition;
pub mod pulse;
pub mod timeline;

pub use columns::{BitLineSegment, Column, ColumnLayout, bit_line_segments};
pub use compress::compress;
pub use cut::{cut_empty_cycles, find_cut_ranges};
pub use engine::{CircuitLayout, LayoutEngine};
pub use partition::partition_lanes;
pub use pulse::{
    GatePulses, Line, LineSegment, Pulse, PulseLayout, QubitLines, SampleRates, SegmentContent,
    SegmentKind, WaveformLookup, WaveformMapping, stitch_line, stitch_qubit_lines,
};
pub use timeline::{Cycle, OpId, Timeline};
