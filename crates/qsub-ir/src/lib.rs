//! qsub Circuit Intermediate Representation
//!
//! Core data structures for describing the arithmetic circuits that the
//! `qsub` simulator executes.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`] address a
//!   register of `n` qubits as `0..n`; a [`Register`] names a contiguous span
//! - **Gates**: [`StandardGate`] covers the permutation/sign-flip family
//!   (`X`, `CZ`, `CX`, `CCX`)
//! - **Instructions**: [`Instruction`] combines a gate or measurement with its
//!   operands
//! - **Circuit**: [`Circuit`] is an immutable, ordered instruction list built
//!   through [`CircuitBuilder`]
//!
//! # Example: a two-bit half adder
//!
//! ```rust
//! use qsub_ir::{CircuitBuilder, ClbitId, QubitId};
//!
//! let mut builder = CircuitBuilder::with_size("half_adder", 3, 2);
//! builder
//!     .x(QubitId(0))?
//!     .ccx(QubitId(0), QubitId(1), QubitId(2))?
//!     .cx(QubitId(0), QubitId(1))?
//!     .measure(QubitId(1), ClbitId(0))?
//!     .measure(QubitId(2), ClbitId(1))?;
//!
//! let circuit = builder.build();
//! assert_eq!(circuit.num_qubits(), 3);
//! assert_eq!(circuit.gate_count(), 3);
//! # Ok::<(), qsub_ir::IrError>(())
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `X` | 1 | Pauli-X (bit flip) |
//! | `CZ` | 2 | Controlled-Z |
//! | `CX` | 2 | Controlled-NOT (CNOT) |
//! | `CCX` | 3 | Toffoli (CCNOT) |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;
pub mod register;

pub use circuit::{Circuit, CircuitBuilder};
pub use error::{IrError, IrResult};
pub use gate::{Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId};
pub use register::Register;
