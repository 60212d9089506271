//! Error types for the simulator crate.

use thiserror::Error;

/// Errors that can occur while simulating or sampling a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// A gate references a qubit outside the statevector.
    #[error("Gate '{gate}' references qubit {qubit} but the state has {num_qubits} qubits")]
    InvalidQubitIndex {
        /// The offending qubit index.
        qubit: u32,
        /// Number of qubits in the statevector.
        num_qubits: usize,
        /// Name of the gate being applied.
        gate: &'static str,
    },

    /// A gate names the same qubit twice.
    #[error("Gate '{gate}' uses qubit {qubit} more than once")]
    DuplicateQubit {
        /// The repeated qubit index.
        qubit: u32,
        /// Name of the gate being applied.
        gate: &'static str,
    },

    /// A gate was given the wrong number of operands.
    #[error("Gate '{gate}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate being applied.
        gate: &'static str,
        /// Expected number of operands.
        expected: u32,
        /// Actual number of operands.
        got: usize,
    },

    /// A basis-state index does not fit the register.
    #[error("Basis state {index} does not exist in a {num_qubits}-qubit register")]
    InvalidBasisState {
        /// The requested basis index.
        index: usize,
        /// Number of qubits in the register.
        num_qubits: usize,
    },

    /// Amplitude count is not a power of two.
    #[error("Statevector dimension {0} is not a power of two")]
    InvalidDimension(usize),

    /// The state left the unit sphere. Indicates a defective gate sequence.
    #[error(
        "State is not normalized: |psi|^2 = {norm_sqr} (tolerance {tolerance}){}",
        format_gate_position(.after_gate)
    )]
    UnnormalizedState {
        /// The observed squared norm.
        norm_sqr: f64,
        /// The configured tolerance.
        tolerance: f64,
        /// Index of the gate after which the check failed, if checked per gate.
        after_gate: Option<usize>,
    },

    /// Circuit exceeds the simulator's qubit limit.
    #[error("Circuit has {num_qubits} qubits but the simulator supports at most {max_qubits}")]
    CircuitTooLarge {
        /// Qubits in the circuit.
        num_qubits: usize,
        /// Configured limit.
        max_qubits: usize,
    },

    /// More classical bits than a measured outcome can address.
    #[error("Circuit has {num_clbits} classical bits but at most {max_clbits} can be sampled")]
    TooManyClbits {
        /// Classical bits in the circuit.
        num_clbits: usize,
        /// Widest supported outcome.
        max_clbits: usize,
    },

    /// A measurement writes a classical bit the distribution does not have.
    #[error("Measurement writes classical bit {clbit} but only {num_clbits} exist")]
    ClbitOutOfRange {
        /// The offending classical bit.
        clbit: u32,
        /// Number of classical bits.
        num_clbits: usize,
    },

    /// Configuration value rejected.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[allow(clippy::ref_option)]
fn format_gate_position(after_gate: &Option<usize>) -> String {
    match after_gate {
        Some(i) => format!(" after gate #{i}"),
        None => String::new(),
    }
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;
