//! Integer subtraction on a simulated quantum register.
//!
//! Builds a reversible circuit computing `a - b` in `w`-bit two's complement,
//! runs it on the [`qsub_sim`] statevector simulator and decodes the measured
//! histogram back into an integer.
//!
//! # Pipeline
//!
//! ```text
//! (a, b, w) -> SubtractorBuilder -> Circuit -> Simulator -> Distribution
//!                                                               |
//!                      SubtractionOutcome <- decode_counts <- Sampler
//! ```
//!
//! # Example
//!
//! ```rust
//! use qsub_arith::{Subtraction, subtract};
//!
//! let outcome = Subtraction::new(10, 5).seed(7).run()?;
//! assert_eq!(outcome.value, 5);
//! assert_eq!(outcome.width, 5);
//! assert!(!outcome.overflow);
//!
//! // 3 - (-3) = 6 does not fit 3 bits and wraps to -2.
//! let wrapped = subtract(3, -3, 64)?;
//! assert_eq!(wrapped.value, -2);
//! assert!(wrapped.overflow);
//! # Ok::<(), qsub_arith::ArithError>(())
//! ```
//!
//! # Circuit layout
//!
//! | Qubits | Register | Role |
//! |--------|----------|------|
//! | `0..w` | `a` | minuend, then the difference |
//! | `w..2w` | `b` | subtrahend, then its complement |
//!
//! Classical bit `c[i]` measures `a[i]`; bitstrings print `c[w-1]` first.

pub mod adder;
pub mod decode;
pub mod error;
pub mod pipeline;
pub mod subtractor;

pub use adder::ripple_carry_add;
pub use decode::{DecodedResult, decode_bitstring, decode_counts};
pub use error::{ArithError, ArithResult};
pub use pipeline::{DEFAULT_SHOTS, Subtraction, SubtractionOutcome, detect_overflow, subtract};
pub use subtractor::{
    MAX_WIDTH, STAGE_ADD, STAGE_ENCODE, STAGE_NEGATE, SubtractionCircuit, SubtractorBuilder,
    auto_width, bit_length, fits_width, to_twos_complement,
};
