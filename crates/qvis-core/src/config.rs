#![forbid(unsafe_code)]

//! Layout configuration.
//!
//! The configuration arrives from an external loader (any serde format).
//! Field names follow the visualizer configuration vocabulary, so a JSON
//! document such as
//!
//! ```json
//! { "cycles": { "compress": true,
//!               "cutting": { "cut": true, "emptyCycleThreshold": 3 } } }
//! ```
//!
//! deserializes directly; every missing field takes its default.
//!
//! # Validation
//!
//! [`LayoutConfig::validated`] never fails. Out-of-range values are clamped
//! to the nearest valid value and modes that cannot be combined with pulse
//! rendering are switched off. Each adjustment emits a `warn!` event.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Top-level layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Length of one cycle, in the unit operation durations use.
    pub cycle_duration: u64,
    pub cycles: CycleConfig,
    pub grid: GridConfig,
    pub pulses: PulseConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cycle_duration: 20,
            cycles: CycleConfig::default(),
            grid: GridConfig::default(),
            pulses: PulseConfig::default(),
        }
    }
}

/// Cycle-axis options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CycleConfig {
    /// Remove empty cycles and renumber the rest.
    pub compress: bool,
    /// Split cycles whose multi-operand operations overlap into lanes.
    pub partition_cycles_with_overlap: bool,
    pub cutting: CuttingConfig,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            compress: false,
            partition_cycles_with_overlap: true,
            cutting: CuttingConfig::default(),
        }
    }
}

/// Collapsing of long idle stretches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CuttingConfig {
    /// Detect and collapse empty-cycle runs.
    pub cut: bool,
    /// Minimum run length that gets collapsed. Values below 1 clamp to 1.
    pub empty_cycle_threshold: i64,
    /// Width of a collapsed range's column.
    pub cut_cycle_width: u32,
    /// Gap after a collapsed range, as a fraction of the cell size.
    pub cut_cycle_width_modifier: f32,
}

impl Default for CuttingConfig {
    fn default() -> Self {
        Self {
            cut: true,
            empty_cycle_threshold: 2,
            cut_cycle_width: 16,
            cut_cycle_width_modifier: 0.5,
        }
    }
}

impl CuttingConfig {
    /// Effective threshold, never below 1.
    #[inline]
    #[must_use]
    pub fn threshold(&self) -> usize {
        usize::try_from(self.empty_cycle_threshold.max(1)).unwrap_or(usize::MAX)
    }
}

/// Grid metrics used for column geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Width of one lane of one cycle.
    pub cell_size: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { cell_size: 40 }
    }
}

/// Pulse rendering mode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PulseConfig {
    /// Draw operations as waveforms on per-qubit channel lines.
    pub display_gates_as_pulses: bool,
}

impl LayoutConfig {
    /// Whether pulse mode is on.
    #[inline]
    #[must_use]
    pub fn pulses_enabled(&self) -> bool {
        self.pulses.display_gates_as_pulses
    }

    /// Clamp out-of-range values and resolve mode conflicts.
    #[must_use]
    pub fn validated(mut self) -> Self {
        let cutting = &mut self.cycles.cutting;
        if cutting.empty_cycle_threshold < 1 {
            warn!(
                configured = cutting.empty_cycle_threshold,
                "adjusting emptyCycleThreshold to minimum value of 1"
            );
            cutting.empty_cycle_threshold = 1;
        }
        let modifier = cutting.cut_cycle_width_modifier;
        if modifier.is_nan() || modifier < 0.0 {
            warn!(
                configured = f64::from(modifier),
                "adjusting cutCycleWidthModifier to 0"
            );
            cutting.cut_cycle_width_modifier = 0.0;
        }

        if self.pulses_enabled() {
            if self.cycles.partition_cycles_with_overlap {
                warn!("disabling partitionCyclesWithOverlap: lanes are not used in pulse mode");
                self.cycles.partition_cycles_with_overlap = false;
            }
            if self.cycles.compress {
                warn!("disabling compress: cycles cannot be compressed in pulse mode");
                self.cycles.compress = false;
            }
            if self.cycles.cutting.cut {
                warn!("disabling cut: cycle cutting is not available in pulse mode");
                self.cycles.cutting.cut = false;
            }
        }

        self
    }
}
