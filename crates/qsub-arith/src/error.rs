//! Error types for circuit arithmetic.

use qsub_ir::IrError;
use qsub_sim::SimError;
use thiserror::Error;

/// Errors raised while building, running or decoding a subtraction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArithError {
    /// The register width is zero or wider than the supported maximum.
    #[error("Invalid bit width {width}: must be between 1 and {max}")]
    InvalidBitWidth {
        /// The rejected width.
        width: u32,
        /// Largest supported width.
        max: u32,
    },

    /// An operand cannot be represented in the chosen width.
    #[error("Operand {operand} does not fit a {width}-bit two's-complement register")]
    OperandOutOfRange {
        /// The operand value.
        operand: i64,
        /// The register width.
        width: u32,
    },

    /// Decoding was attempted on a histogram with no shots.
    #[error("Cannot decode an empty histogram")]
    EmptyHistogram,

    /// A measured bitstring is malformed.
    #[error("Invalid bitstring '{bitstring}': {reason}")]
    InvalidBitstring {
        /// The offending bitstring.
        bitstring: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Circuit construction failed.
    #[error("Circuit error: {0}")]
    Ir(#[from] IrError),

    /// Simulation failed.
    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),
}

/// Result type for arithmetic operations.
pub type ArithResult<T> = Result<T, ArithError>;
