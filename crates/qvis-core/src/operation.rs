#![forbid(unsafe_code)]

//! Scheduled operations.

use crate::operand::Operand;
use serde::{Deserialize, Serialize};

/// Largest start cycle the layout engine accepts.
///
/// Anything above this is treated as an upstream scheduling bug rather
/// than a circuit that really runs for that long.
pub const MAX_CYCLE_INDEX: i64 = 1 << 20;

/// Largest qubit or classical bit index the layout engine accepts.
///
/// Row tables are allocated per index, so an unbounded index would size
/// them from garbage input.
pub const MAX_ROW_INDEX: usize = 1 << 16;

/// A scheduled operation: a gate or pulse with a start cycle and duration.
///
/// The start cycle is assigned upstream. The layout engine never moves an
/// operation to a different cycle; it only renumbers cycles when empty
/// ones are compressed away.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Operation {
    /// Gate name, used for logging and measurement detection.
    pub name: String,
    /// Quantum operands in declaration order.
    pub qubits: Vec<usize>,
    /// Classical operands in declaration order.
    pub cbits: Vec<usize>,
    /// Duration in the same unit as the cycle duration.
    pub duration: u64,
    /// Start cycle. Signed so that upstream garbage can be reported.
    pub cycle: i64,
    /// Opaque tag the renderer uses to pick a visual.
    pub display_type: String,
    /// Codewords for waveform lookup; the first one is used.
    pub codewords: Vec<u32>,
}

impl Operation {
    /// Create an operation with no operands.
    pub fn new(name: impl Into<String>, cycle: i64, duration: u64) -> Self {
        Self {
            name: name.into(),
            cycle,
            duration,
            ..Default::default()
        }
    }

    /// Set the quantum operands.
    #[must_use]
    pub fn qubits(mut self, qubits: impl IntoIterator<Item = usize>) -> Self {
        self.qubits = qubits.into_iter().collect();
        self
    }

    /// Set the classical operands.
    #[must_use]
    pub fn cbits(mut self, cbits: impl IntoIterator<Item = usize>) -> Self {
        self.cbits = cbits.into_iter().collect();
        self
    }

    /// Set the display type tag.
    #[must_use]
    pub fn display_type(mut self, display_type: impl Into<String>) -> Self {
        self.display_type = display_type.into();
        self
    }

    /// Set the codewords.
    #[must_use]
    pub fn codewords(mut self, codewords: impl IntoIterator<Item = u32>) -> Self {
        self.codewords = codewords.into_iter().collect();
        self
    }

    /// All operands, quantum first, each group in declaration order.
    pub fn operands(&self) -> impl Iterator<Item = Operand> + '_ {
        self.qubits
            .iter()
            .map(|&q| Operand::Quantum(q))
            .chain(self.cbits.iter().map(|&c| Operand::Classical(c)))
    }

    /// Total number of operands across both row spaces.
    #[inline]
    #[must_use]
    pub fn operand_count(&self) -> usize {
        self.qubits.len() + self.cbits.len()
    }

    /// Name-based measurement detection.
    #[must_use]
    pub fn is_measurement(&self) -> bool {
        self.name.contains("measure")
    }

    /// The codeword used for waveform lookup.
    #[inline]
    #[must_use]
    pub fn primary_codeword(&self) -> Option<u32> {
        self.codewords.first().copied()
    }

    /// A measurement with a single qubit and no classical operand writes
    /// to the classical bit with the same index. Returns whether an
    /// operand was added.
    pub fn assign_default_measurement_operand(&mut self) -> bool {
        if self.is_measurement() && self.operand_count() == 1 {
            if let Some(&qubit) = self.qubits.first() {
                self.cbits.push(qubit);
                return true;
            }
        }
        false
    }

    /// Number of cycles the operation spans, rounding partial cycles up.
    ///
    /// `cycle_duration` must be non-zero.
    #[inline]
    #[must_use]
    pub fn duration_in_cycles(&self, cycle_duration: u64) -> u64 {
        self.duration.div_ceil(cycle_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operands_are_quantum_then_classical() {
        let op = Operation::new("measure", 0, 20).qubits([2]).cbits([1]);
        let operands: Vec<_> = op.operands().collect();
        assert_eq!(operands, vec![Operand::Quantum(2), Operand::Classical(1)]);
        assert_eq!(op.operand_count(), 2);
    }

    #[test]
    fn duration_rounds_up() {
        let op = Operation::new("x", 0, 41);
        assert_eq!(op.duration_in_cycles(20), 3);
        assert_eq!(Operation::new("x", 0, 40).duration_in_cycles(20), 2);
        assert_eq!(Operation::new("wait", 0, 0).duration_in_cycles(20), 0);
    }

    #[test]
    fn default_measurement_operand() {
        let mut op = Operation::new("measure_z", 3, 300).qubits([4]);
        assert!(op.assign_default_measurement_operand());
        assert_eq!(op.cbits, vec![4]);
        // Already has two operands now.
        assert!(!op.assign_default_measurement_operand());
    }

    #[test]
    fn non_measurement_left_alone() {
        let mut op = Operation::new("h", 0, 20).qubits([0]);
        assert!(!op.assign_default_measurement_operand());
        assert!(op.cbits.is_empty());
    }

    #[test]
    fn primary_codeword() {
        assert_eq!(Operation::new("x", 0, 20).primary_codeword(), None);
        let op = Operation::new("x", 0, 20).codewords([7, 9]);
        assert_eq!(op.primary_codeword(), Some(7));
    }

    #[test]
    fn deserializes_with_defaults() {
        let op: Operation =
            serde_json::from_str(r#"{"name":"cz","qubits":[0,2],"duration":40,"cycle":5}"#)
                .unwrap();
        assert_eq!(op.qubits, vec![0, 2]);
        assert!(op.cbits.is_empty());
        assert_eq!(op.cycle, 5);
    }
}
