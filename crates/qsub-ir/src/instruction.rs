//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::gate::{Gate, StandardGate};
use crate::qubit::{ClbitId, QubitId};

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A unitary gate.
    Gate(Gate),
    /// Measurement of one qubit into one classical bit.
    Measure,
}

/// A complete instruction with operands.
///
/// Gate operands are ordered `controls..., target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
    /// Classical bits this instruction writes (measurements only).
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate.into()),
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, control: QubitId, target: QubitId) -> Self {
        Self::gate(gate, [control, target])
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            InstructionKind::Measure => None,
        }
    }

    /// The qubit acted on (gate target, or measured qubit).
    pub fn target(&self) -> Option<QubitId> {
        self.qubits.last().copied()
    }

    /// The control qubits of a gate; empty for measurements and `X`.
    pub fn controls(&self) -> &[QubitId] {
        match self.qubits.split_last() {
            Some((_, controls)) if self.is_gate() => controls,
            _ => &[],
        }
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::single_qubit_gate(StandardGate::X, QubitId(0));
        assert!(inst.is_gate());
        assert_eq!(inst.qubits.len(), 1);
        assert_eq!(inst.name(), "x");
        assert!(inst.controls().is_empty());
    }

    #[test]
    fn test_toffoli_operands() {
        let inst = Instruction::gate(StandardGate::CCX, [QubitId(0), QubitId(1), QubitId(2)]);
        assert_eq!(inst.controls(), &[QubitId(0), QubitId(1)]);
        assert_eq!(inst.target(), Some(QubitId(2)));
    }

    #[test]
    fn test_measure_instruction() {
        let inst = Instruction::measure(QubitId(3), ClbitId(0));
        assert!(inst.is_measure());
        assert!(inst.as_gate().is_none());
        assert_eq!(inst.name(), "measure");
        assert_eq!(inst.clbits, vec![ClbitId(0)]);
        assert!(inst.controls().is_empty());
    }
}
