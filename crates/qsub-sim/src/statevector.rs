//! Statevector simulation engine.
//!
//! Amplitudes are indexed little-endian: qubit `q` is bit `q` of the basis
//! index. Every supported gate is a permutation or a sign flip of amplitudes,
//! so applying one never changes `|psi|^2`.

use num_complex::Complex64;

use qsub_ir::{Instruction, InstructionKind, QubitId, StandardGate};

use crate::error::{SimError, SimResult};

/// A statevector representing a quantum state.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Create a statevector in the computational basis state `|index⟩`.
    pub fn from_basis_state(num_qubits: usize, index: usize) -> SimResult<Self> {
        if index >= 1 << num_qubits {
            return Err(SimError::InvalidBasisState { index, num_qubits });
        }
        let mut sv = Self::new(num_qubits);
        sv.amplitudes.swap(0, index);
        Ok(sv)
    }

    /// Wrap raw amplitudes. The length must be a power of two; the norm is
    /// not checked here.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let dim = amplitudes.len();
        if !dim.is_power_of_two() {
            return Err(SimError::InvalidDimension(dim));
        }
        Ok(Self {
            amplitudes,
            num_qubits: dim.trailing_zeros() as usize,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of amplitudes (2^n).
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Read-only view of the amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Squared norm `Σ|ψ_i|²`.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Born-rule probabilities of each basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Consume the state, keeping only its probability vector.
    pub fn into_probabilities(self) -> Vec<f64> {
        self.probabilities()
    }

    /// Apply an instruction to the statevector.
    ///
    /// Measurements only have their operand validated; sampling happens later
    /// on the final probability vector.
    pub fn apply(&mut self, instruction: &Instruction) -> SimResult<()> {
        match &instruction.kind {
            InstructionKind::Gate(gate) => self.apply_gate(gate.kind, &instruction.qubits),
            InstructionKind::Measure => {
                for &qubit in &instruction.qubits {
                    self.check_qubit(qubit, "measure")?;
                }
                Ok(())
            }
        }
    }

    /// Apply a gate to specific qubits.
    ///
    /// All operands are checked before any amplitude is touched, so a failed
    /// call leaves the state unchanged.
    pub fn apply_gate(&mut self, gate: StandardGate, qubits: &[QubitId]) -> SimResult<()> {
        let name = gate.name();
        if qubits.len() != gate.num_qubits() as usize {
            return Err(SimError::QubitCountMismatch {
                gate: name,
                expected: gate.num_qubits(),
                got: qubits.len(),
            });
        }
        for (i, &qubit) in qubits.iter().enumerate() {
            self.check_qubit(qubit, name)?;
            if qubits[..i].contains(&qubit) {
                return Err(SimError::DuplicateQubit {
                    qubit: qubit.0,
                    gate: name,
                });
            }
        }

        let q: Vec<usize> = qubits.iter().map(|q| q.index()).collect();
        match gate {
            StandardGate::X => self.apply_x(q[0]),
            StandardGate::CZ => self.apply_cz(q[0], q[1]),
            StandardGate::CX => self.apply_cx(q[0], q[1]),
            StandardGate::CCX => self.apply_ccx(q[0], q[1], q[2]),
        }
        Ok(())
    }

    fn check_qubit(&self, qubit: QubitId, gate: &'static str) -> SimResult<()> {
        if qubit.index() >= self.num_qubits {
            return Err(SimError::InvalidQubitIndex {
                qubit: qubit.0,
                num_qubits: self.num_qubits,
                gate,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.dim() {
            if i & mask == 0 {
                let j = i | mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.dim() {
            if (i & ctrl_mask != 0) && (i & tgt_mask != 0) {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.dim() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_ccx(&mut self, c1: usize, c2: usize, target: usize) {
        let c1_mask = 1 << c1;
        let c2_mask = 1 << c2;
        let tgt_mask = 1 << target;
        for i in 0..self.dim() {
            if (i & c1_mask != 0) && (i & c2_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn one() -> Complex64 {
        Complex64::new(1.0, 0.0)
    }

    /// Index holding the single nonzero amplitude of a basis state.
    fn basis_index(sv: &Statevector) -> usize {
        let hits: Vec<_> = sv
            .amplitudes()
            .iter()
            .enumerate()
            .filter(|(_, a)| a.norm() > 0.5)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(hits.len(), 1, "not a basis state");
        hits[0]
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], one()));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(0.0, 0.0)));
        assert_eq!(sv.dim(), 4);
    }

    #[test]
    fn test_x_gate() {
        let mut sv = Statevector::new(2);
        sv.apply_gate(StandardGate::X, &[QubitId(1)]).unwrap();
        assert_eq!(basis_index(&sv), 0b10);
    }

    #[test]
    fn test_cx_truth_table() {
        for input in 0..4 {
            let mut sv = Statevector::from_basis_state(2, input).unwrap();
            sv.apply_gate(StandardGate::CX, &[QubitId(0), QubitId(1)])
                .unwrap();
            let expected = if input & 1 == 1 { input ^ 0b10 } else { input };
            assert_eq!(basis_index(&sv), expected, "input {input:02b}");
        }
    }

    #[test]
    fn test_ccx_truth_table() {
        for input in 0..8 {
            let mut sv = Statevector::from_basis_state(3, input).unwrap();
            sv.apply_gate(StandardGate::CCX, &[QubitId(0), QubitId(1), QubitId(2)])
                .unwrap();
            let expected = if input & 0b011 == 0b011 {
                input ^ 0b100
            } else {
                input
            };
            assert_eq!(basis_index(&sv), expected, "input {input:03b}");
        }
    }

    #[test]
    fn test_cz_flips_sign_of_11_only() {
        for input in 0..4 {
            let mut sv = Statevector::from_basis_state(2, input).unwrap();
            sv.apply_gate(StandardGate::CZ, &[QubitId(0), QubitId(1)])
                .unwrap();
            let expected = if input == 0b11 { -one() } else { one() };
            assert!(approx_eq(sv.amplitudes[input], expected));
        }
    }

    #[test]
    fn test_out_of_range_gate_leaves_state_untouched() {
        let mut sv = Statevector::new(2);
        sv.apply_gate(StandardGate::X, &[QubitId(0)]).unwrap();
        let before = sv.clone();

        let err = sv
            .apply_gate(StandardGate::CX, &[QubitId(0), QubitId(2)])
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidQubitIndex {
                qubit: 2,
                num_qubits: 2,
                gate: "cx"
            }
        ));
        assert_eq!(sv, before);
    }

    #[test]
    fn test_duplicate_and_arity_errors() {
        let mut sv = Statevector::new(3);
        assert!(matches!(
            sv.apply_gate(StandardGate::CCX, &[QubitId(0), QubitId(0), QubitId(1)]),
            Err(SimError::DuplicateQubit { qubit: 0, .. })
        ));
        assert!(matches!(
            sv.apply_gate(StandardGate::CZ, &[QubitId(0)]),
            Err(SimError::QubitCountMismatch {
                expected: 2,
                got: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_from_basis_state_bounds() {
        assert!(Statevector::from_basis_state(2, 3).is_ok());
        assert!(matches!(
            Statevector::from_basis_state(2, 4),
            Err(SimError::InvalidBasisState { index: 4, .. })
        ));
    }

    #[test]
    fn test_from_amplitudes() {
        let sv = Statevector::from_amplitudes(vec![Complex64::new(0.0, 0.0); 8]).unwrap();
        assert_eq!(sv.num_qubits(), 3);
        assert!(matches!(
            Statevector::from_amplitudes(vec![one(); 3]),
            Err(SimError::InvalidDimension(3))
        ));
    }

    #[test]
    fn test_probabilities_follow_born_rule() {
        let mut sv = Statevector::new(2);
        sv.apply_gate(StandardGate::X, &[QubitId(0)]).unwrap();
        sv.apply_gate(StandardGate::CZ, &[QubitId(0), QubitId(1)])
            .unwrap();
        assert_eq!(sv.probabilities(), vec![0.0, 1.0, 0.0, 0.0]);
        assert!((sv.norm_sqr() - 1.0).abs() < 1e-12);
    }
}
