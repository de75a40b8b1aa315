#![forbid(unsafe_code)]

//! Pulse mode: per-qubit channel lines stitched from waveform data.
//!
//! Every qubit row gets one [`Line`] per [`Channel`]. A line is a list of
//! segments that tiles `[0, total_cycles - 1]`: PULSE segments come from
//! the waveform lookup, FLAT segments fill whatever is left.
//!
//! # Pulse spans
//!
//! An operation starting at `s` with a duration of `n` cycles (rounded up,
//! at least 1) covers `[s, s + n - 1]`, clipped to the last cycle. PULSE
//! segments are never merged, even when they touch.
//!
//! # Failure Modes
//!
//! Nothing here is fatal. A missing codeword, a lookup miss and an empty
//! waveform all leave the span to FLAT filler. A PULSE overlapping an
//! earlier one on the same channel is clipped to start after it, or dropped
//! when nothing is left. Misses and clips are reported with `warn!`.
//!
//! # Invariants
//!
//! 1. Segments are sorted by start and contiguous
//!    (`next.start == prev.end + 1`).
//! 2. The first segment starts at 0 and the last ends at `total_cycles - 1`.
//! 3. `max_amplitude` is the largest `|sample|` over the PULSE segments.

use crate::timeline::Timeline;
use qvis_core::{Channel, EndPoints};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ============================================================================
// Waveform lookup
// ============================================================================

/// Waveforms of one operation on one qubit, per channel.
///
/// Absent channels deserialize as empty waveforms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatePulses {
    pub microwave: Vec<f64>,
    pub flux: Vec<f64>,
    pub readout: Vec<f64>,
}

impl GatePulses {
    /// Samples for `channel`.
    #[must_use]
    pub fn waveform(&self, channel: Channel) -> &[f64] {
        match channel {
            Channel::Microwave => &self.microwave,
            Channel::Flux => &self.flux,
            Channel::Readout => &self.readout,
        }
    }
}

/// Sample rate per channel. All three are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRates {
    pub microwave: u32,
    pub flux: u32,
    pub readout: u32,
}

impl SampleRates {
    #[must_use]
    pub const fn get(&self, channel: Channel) -> u32 {
        match channel {
            Channel::Microwave => self.microwave,
            Channel::Flux => self.flux,
            Channel::Readout => self.readout,
        }
    }
}

/// Source of waveform data for the stitcher.
pub trait WaveformLookup {
    /// Waveforms for `codeword` on `qubit`, if the source knows them.
    fn pulses(&self, codeword: u32, qubit: usize) -> Option<&GatePulses>;

    /// Sample rate of `channel`.
    fn sample_rate(&self, channel: Channel) -> u32;
}

/// Waveform mapping keyed by codeword, then qubit.
///
/// Deserializes from documents shaped like
///
/// ```json
/// { "samplerates": { "microwave": 1000, "flux": 1000, "readout": 500 },
///   "codewords": { "3": { "0": { "microwave": [0.0, 0.5, 0.0] } } } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformMapping {
    pub samplerates: SampleRates,
    #[serde(default)]
    pub codewords: FxHashMap<u32, FxHashMap<usize, GatePulses>>,
}

impl WaveformMapping {
    /// An empty mapping with the given sample rates.
    #[must_use]
    pub fn new(samplerates: SampleRates) -> Self {
        Self {
            samplerates,
            codewords: FxHashMap::default(),
        }
    }

    /// Register waveforms for `codeword` on `qubit`, replacing earlier ones.
    pub fn insert(&mut self, codeword: u32, qubit: usize, pulses: GatePulses) {
        self.codewords
            .entry(codeword)
            .or_default()
            .insert(qubit, pulses);
    }
}

impl WaveformLookup for WaveformMapping {
    fn pulses(&self, codeword: u32, qubit: usize) -> Option<&GatePulses> {
        self.codewords.get(&codeword)?.get(&qubit)
    }

    fn sample_rate(&self, channel: Channel) -> u32 {
        self.samplerates.get(channel)
    }
}

// ============================================================================
// Lines
// ============================================================================

/// Waveform drawn in a PULSE segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pulse {
    pub waveform: Vec<f64>,
    pub sample_rate: u32,
}

impl Pulse {
    /// Largest absolute sample; 0.0 for an empty waveform.
    #[must_use]
    pub fn peak(&self) -> f64 {
        self.waveform.iter().fold(0.0, |acc: f64, s| acc.max(s.abs()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SegmentKind {
    Flat,
    Pulse,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SegmentContent {
    Flat,
    Pulse(Pulse),
}

/// A labelled stretch of a channel line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSegment {
    pub range: EndPoints,
    pub content: SegmentContent,
}

impl LineSegment {
    #[must_use]
    pub const fn flat(range: EndPoints) -> Self {
        Self {
            range,
            content: SegmentContent::Flat,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> SegmentKind {
        match self.content {
            SegmentContent::Flat => SegmentKind::Flat,
            SegmentContent::Pulse(_) => SegmentKind::Pulse,
        }
    }

    /// The pulse, for PULSE segments.
    #[must_use]
    pub const fn pulse(&self) -> Option<&Pulse> {
        match &self.content {
            SegmentContent::Flat => None,
            SegmentContent::Pulse(pulse) => Some(pulse),
        }
    }
}

/// One channel line of one qubit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Line {
    pub segments: Vec<LineSegment>,
    /// Largest absolute sample across the PULSE segments.
    pub max_amplitude: f64,
}

impl Line {
    /// Whether the segments tile `[0, total_cycles - 1]` exactly.
    #[must_use]
    pub fn tiles(&self, total_cycles: usize) -> bool {
        let mut next = 0usize;
        for segment in &self.segments {
            if segment.range.start != next || segment.range.is_empty() {
                return false;
            }
            next = segment.range.end + 1;
        }
        next == total_cycles
    }

    /// Number of PULSE segments.
    #[must_use]
    pub fn pulse_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| s.kind() == SegmentKind::Pulse)
            .count()
    }
}

/// The three channel lines of one qubit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QubitLines {
    pub microwave: Line,
    pub flux: Line,
    pub readout: Line,
}

impl QubitLines {
    #[must_use]
    pub fn line(&self, channel: Channel) -> &Line {
        match channel {
            Channel::Microwave => &self.microwave,
            Channel::Flux => &self.flux,
            Channel::Readout => &self.readout,
        }
    }

    fn line_mut(&mut self, channel: Channel) -> &mut Line {
        match channel {
            Channel::Microwave => &mut self.microwave,
            Channel::Flux => &mut self.flux,
            Channel::Readout => &mut self.readout,
        }
    }
}

/// Pulse-mode output: one [`QubitLines`] per qubit row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PulseLayout {
    pub total_cycles: usize,
    pub rows: Vec<QubitLines>,
}

impl PulseLayout {
    /// Lines of `qubit`, if it exists.
    #[must_use]
    pub fn qubit(&self, qubit: usize) -> Option<&QubitLines> {
        self.rows.get(qubit)
    }
}

// ============================================================================
// Stitching
// ============================================================================

/// Stitch the PULSE spans of one channel into a gap-free line.
///
/// `pulses` may arrive in any order; they are stably sorted by start, so
/// equal starts keep their input order. Inverted ranges are dropped with a
/// warning.
#[must_use]
pub fn stitch_line(mut pulses: Vec<(EndPoints, Pulse)>, total_cycles: usize) -> Line {
    let Some(last_cycle) = total_cycles.checked_sub(1) else {
        return Line::default();
    };
    pulses.sort_by_key(|(range, _)| range.start);

    let mut segments = Vec::with_capacity(pulses.len() * 2 + 1);
    let mut max_amplitude = 0.0f64;
    let mut next_free = 0usize;

    for (range, pulse) in pulses {
        if range.is_empty() {
            warn!(%range, "dropping pulse with an inverted range");
            continue;
        }
        let Some(range) = range.clip_end(last_cycle) else {
            warn!(%range, last_cycle, "dropping pulse that starts after the last cycle");
            continue;
        };
        let range = if range.start < next_free {
            let Some(clipped) = EndPoints::new(next_free, range.end) else {
                warn!(%range, "dropping pulse hidden by an earlier pulse");
                continue;
            };
            warn!(%range, start = next_free, "clipping pulse that overlaps an earlier pulse");
            clipped
        } else {
            range
        };

        if range.start > next_free {
            segments.push(LineSegment::flat(EndPoints {
                start: next_free,
                end: range.start - 1,
            }));
        }
        max_amplitude = max_amplitude.max(pulse.peak());
        segments.push(LineSegment {
            range,
            content: SegmentContent::Pulse(pulse),
        });
        next_free = range.end + 1;
    }

    if next_free <= last_cycle {
        segments.push(LineSegment::flat(EndPoints {
            start: next_free,
            end: last_cycle,
        }));
    }

    Line {
        segments,
        max_amplitude,
    }
}

/// Build the channel lines of every qubit of `timeline`.
///
/// The timeline must be uncompacted: spans are taken from the operations'
/// own start cycles.
#[must_use]
pub fn stitch_qubit_lines(timeline: &Timeline, lookup: &dyn WaveformLookup) -> PulseLayout {
    let _span = tracing::debug_span!(
        "qvis.stitch",
        qubits = timeline.qubit_count(),
        cycles = timeline.len()
    )
    .entered();

    let total_cycles = timeline.len();
    let cycle_duration = timeline.cycle_duration();

    let mut per_qubit: Vec<Vec<usize>> = vec![Vec::new(); timeline.qubit_count()];
    for (i, op) in timeline.operations().iter().enumerate() {
        let mut qubits = op.qubits.clone();
        qubits.sort_unstable();
        qubits.dedup();
        for q in qubits {
            per_qubit[q].push(i);
        }
    }

    let mut rows = Vec::with_capacity(per_qubit.len());
    for (qubit, ops) in per_qubit.into_iter().enumerate() {
        let mut spans: [Vec<(EndPoints, Pulse)>; 3] = Default::default();

        for i in ops {
            let op = &timeline.operations()[i];
            let Ok(start) = usize::try_from(op.cycle) else {
                continue;
            };
            let cycles = usize::try_from(op.duration_in_cycles(cycle_duration).max(1))
                .unwrap_or(usize::MAX);
            let Some(range) = EndPoints::with_len(start, cycles.min(total_cycles)) else {
                continue;
            };

            let Some(codeword) = op.primary_codeword() else {
                warn!(
                    operation = %op.name,
                    qubit,
                    "operation has no codeword; replacing pulse with flat line"
                );
                continue;
            };
            let Some(pulses) = lookup.pulses(codeword, qubit) else {
                warn!(
                    operation = %op.name,
                    codeword,
                    qubit,
                    "missing codeword and/or qubit in waveform mapping; replacing pulse with flat line"
                );
                continue;
            };

            for channel in Channel::ALL {
                let waveform = pulses.waveform(channel);
                if waveform.is_empty() {
                    continue;
                }
                spans[channel.ordinal()].push((
                    range,
                    Pulse {
                        waveform: waveform.to_vec(),
                        sample_rate: lookup.sample_rate(channel),
                    },
                ));
            }
        }

        let mut lines = QubitLines::default();
        for (channel, pulses) in Channel::ALL.into_iter().zip(spans) {
            *lines.line_mut(channel) = stitch_line(pulses, total_cycles);
        }
        rows.push(lines);
    }

    debug!(rows = rows.len(), total_cycles, "stitched channel lines");
    PulseLayout { total_cycles, rows }
}
