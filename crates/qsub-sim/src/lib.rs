//! qsub Statevector Simulator
//!
//! Exact simulation of the `qsub-ir` gate family, followed by Born-rule shot
//! sampling.
//!
//! # Pipeline
//!
//! 1. [`Simulator::run`] applies the circuit's gates, in order, to a fresh
//!    [`Statevector`] and checks that the final state is still normalized.
//! 2. The amplitudes are reduced to a [`Distribution`] (probabilities plus the
//!    measurement map).
//! 3. [`Sampler::sample`] draws shots in parallel and returns [`Counts`].
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 16 | ~1 MB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 24 | ~256 MB | Slow (default limit) |
//!
//! # Example
//!
//! ```rust
//! use qsub_ir::{CircuitBuilder, ClbitId, QubitId};
//! use qsub_sim::{Simulator, SimulatorConfig};
//!
//! let mut builder = CircuitBuilder::with_size("flip", 2, 2);
//! builder
//!     .x(QubitId(0))?
//!     .cx(QubitId(0), QubitId(1))?
//!     .measure(QubitId(0), ClbitId(0))?
//!     .measure(QubitId(1), ClbitId(1))?;
//! let circuit = builder.build();
//!
//! let sim = Simulator::with_config(SimulatorConfig::new().with_seed(1))?;
//! let result = sim.execute(&circuit, 1024)?;
//! assert_eq!(result.counts.get("11"), 1024);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod counts;
pub mod error;
pub mod sampler;
pub mod simulator;
pub mod statevector;

pub use config::SimulatorConfig;
pub use counts::{Counts, ExecutionResult, outcome_to_bitstring};
pub use error::{SimError, SimResult};
pub use sampler::Sampler;
pub use simulator::{Distribution, MAX_CLBITS, Simulator};
pub use statevector::Statevector;
