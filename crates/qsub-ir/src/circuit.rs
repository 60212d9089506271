//! Circuits and the builder that assembles them.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};
use crate::register::{Register, label_in};

/// A quantum circuit: an ordered gate sequence followed by measurements.
///
/// A `Circuit` is immutable. All construction goes through
/// [`CircuitBuilder`], which validates every operand as it is appended, so a
/// built circuit never references a qubit or classical bit it does not own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    qregs: Vec<Register>,
    cregs: Vec<Register>,
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Start building a new circuit.
    pub fn builder(name: impl Into<String>) -> CircuitBuilder {
        CircuitBuilder::new(name)
    }

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Named quantum registers, in allocation order.
    pub fn qregs(&self) -> &[Register] {
        &self.qregs
    }

    /// Named classical registers, in allocation order.
    pub fn cregs(&self) -> &[Register] {
        &self.cregs
    }

    /// All instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Gate instructions in application order.
    pub fn gates(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter().filter(|inst| inst.is_gate())
    }

    /// Number of gate instructions.
    pub fn gate_count(&self) -> usize {
        self.gates().count()
    }

    /// Gate instructions carrying the given stage label.
    pub fn stage<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Instruction> + 'a {
        self.gates()
            .filter(move |inst| inst.as_gate().is_some_and(|g| g.has_label(label)))
    }

    /// The measurement map as `(qubit, clbit)` pairs, in instruction order.
    pub fn measurements(&self) -> Vec<(QubitId, ClbitId)> {
        self.instructions
            .iter()
            .filter(|inst| inst.is_measure())
            .map(|inst| (inst.qubits[0], inst.clbits[0]))
            .collect()
    }

    /// Count instructions by name.
    pub fn count_ops(&self) -> BTreeMap<&str, usize> {
        let mut ops = BTreeMap::new();
        for inst in &self.instructions {
            *ops.entry(inst.name()).or_insert(0) += 1;
        }
        ops
    }

    /// `reg[i]` for a qubit inside a named register, `q<n>` otherwise.
    pub fn qubit_label(&self, id: QubitId) -> String {
        label_in(&self.qregs, id.0).unwrap_or_else(|| id.to_string())
    }

    /// `reg[i]` for a classical bit inside a named register, `c<n>` otherwise.
    pub fn clbit_label(&self, id: ClbitId) -> String {
        label_in(&self.cregs, id.0).unwrap_or_else(|| id.to_string())
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "circuit {} ({} qubits, {} clbits)",
            self.name,
            self.num_qubits(),
            self.num_clbits()
        )?;
        for inst in &self.instructions {
            let operands: Vec<_> = inst.qubits.iter().map(|q| self.qubit_label(*q)).collect();
            match &inst.kind {
                InstructionKind::Gate(_) => {
                    writeln!(f, "  {} {}", inst.name(), operands.join(", "))?;
                }
                InstructionKind::Measure => {
                    writeln!(
                        f,
                        "  measure {} -> {}",
                        operands.join(", "),
                        self.clbit_label(inst.clbits[0])
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Builder for [`Circuit`].
///
/// Gates may be tagged with a stage label via [`CircuitBuilder::stage`]; every
/// gate appended afterwards carries that label until the stage changes.
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    qregs: Vec<Register>,
    cregs: Vec<Register>,
    instructions: Vec<Instruction>,
    stage: Option<String>,
    measured: bool,
}

impl CircuitBuilder {
    /// Create a new empty builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            num_qubits: 0,
            num_clbits: 0,
            qregs: vec![],
            cregs: vec![],
            instructions: vec![],
            stage: None,
            measured: false,
        }
    }

    /// Create a builder with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut builder = Self::new(name);
        for _ in 0..num_qubits {
            builder.add_qubit();
        }
        for _ in 0..num_clbits {
            builder.add_clbit();
        }
        builder
    }

    /// Add a single qubit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.num_qubits);
        self.num_qubits += 1;
        id
    }

    /// Add a named quantum register of `size` qubits, returned little-endian.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let span = self.num_qubits..self.num_qubits + size;
        self.num_qubits = span.end;
        self.qregs.push(Register::new(name, span.clone()));
        span.map(QubitId).collect()
    }

    /// Add a single classical bit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.num_clbits);
        self.num_clbits += 1;
        id
    }

    /// Add a named classical register of `size` bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> Vec<ClbitId> {
        let span = self.num_clbits..self.num_clbits + size;
        self.num_clbits = span.end;
        self.cregs.push(Register::new(name, span.clone()));
        span.map(ClbitId).collect()
    }

    /// Label subsequently appended gates with `label`.
    pub fn stage(&mut self, label: impl Into<String>) -> &mut Self {
        self.stage = Some(label.into());
        self
    }

    /// Stop labelling subsequently appended gates.
    pub fn clear_stage(&mut self) -> &mut Self {
        self.stage = None;
        self
    }

    /// Number of qubits allocated so far.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Number of classical bits allocated so far.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::X, [qubit])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CZ, [control, target])
    }

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CX, [control, target])
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CCX, [c1, c2, target])
    }

    /// Append a gate after validating its operands.
    ///
    /// Nothing is appended when validation fails.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        let mut gate = gate.into();
        let qubits: Vec<_> = qubits.into_iter().collect();
        self.validate_gate(&gate, &qubits)?;
        if gate.label.is_none() {
            gate.label.clone_from(&self.stage);
        }
        self.instructions.push(Instruction::gate(gate, qubits));
        Ok(self)
    }

    fn validate_gate(&self, gate: &Gate, qubits: &[QubitId]) -> IrResult<()> {
        let name = gate.name();
        if qubits.len() != gate.num_qubits() as usize {
            return Err(IrError::QubitCountMismatch {
                gate_name: name.to_string(),
                expected: gate.num_qubits(),
                got: qubits.len() as u32,
            });
        }
        if self.measured {
            return Err(IrError::GateAfterMeasurement(name.to_string()));
        }
        for (i, &qubit) in qubits.iter().enumerate() {
            self.check_qubit(qubit, Some(name))?;
            if qubits[..i].contains(&qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: Some(name.to_string()),
                });
            }
        }
        Ok(())
    }

    fn check_qubit(&self, qubit: QubitId, gate_name: Option<&str>) -> IrResult<()> {
        if qubit.0 >= self.num_qubits {
            return Err(IrError::InvalidQubitIndex {
                qubit,
                num_qubits: self.num_qubits,
                gate_name: gate_name.map(str::to_string),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Measure a qubit into a classical bit.
    ///
    /// The measurement map must stay injective: a qubit is measured at most
    /// once and a classical bit is written at most once.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.check_qubit(qubit, Some("measure"))?;
        if clbit.0 >= self.num_clbits {
            return Err(IrError::ClbitNotFound {
                clbit,
                gate_name: Some("measure".into()),
            });
        }
        let overlaps = self
            .instructions
            .iter()
            .filter(|inst| inst.is_measure())
            .any(|inst| inst.qubits[0] == qubit || inst.clbits[0] == clbit);
        if overlaps {
            return Err(IrError::DuplicateMeasurement { qubit, clbit });
        }
        self.instructions.push(Instruction::measure(qubit, clbit));
        self.measured = true;
        Ok(self)
    }

    /// Measure `qubits[i]` into `clbits[i]` for every `i`.
    pub fn measure_register(
        &mut self,
        qubits: &[QubitId],
        clbits: &[ClbitId],
    ) -> IrResult<&mut Self> {
        if qubits.len() != clbits.len() {
            return Err(IrError::QubitCountMismatch {
                gate_name: "measure".into(),
                expected: clbits.len() as u32,
                got: qubits.len() as u32,
            });
        }
        for (&q, &c) in qubits.iter().zip(clbits) {
            self.measure(q, c)?;
        }
        Ok(self)
    }

    /// Finish construction.
    pub fn build(self) -> Circuit {
        Circuit {
            name: self.name,
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits,
            qregs: self.qregs,
            cregs: self.cregs,
            instructions: self.instructions,
        }
    }
}
