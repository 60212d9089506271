//! End-to-end subtraction: build, simulate, sample, decode.

use serde::Serialize;
use tracing::{debug, instrument};

use qsub_sim::{Counts, Simulator, SimulatorConfig};

use crate::decode::{decode_bitstring, decode_counts};
use crate::error::{ArithError, ArithResult};
use crate::subtractor::{SubtractionCircuit, SubtractorBuilder};

/// Shots drawn when the caller does not choose.
pub const DEFAULT_SHOTS: u64 = 1024;

/// Result of a subtraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtractionOutcome {
    /// The decoded difference, wrapped to `width` bits.
    pub value: i64,
    /// Measured histogram. Empty for [`Subtraction::exact`].
    pub counts: Counts,
    /// Register width used.
    pub width: u32,
    /// Whether `a - b` falls outside the signed `width`-bit range.
    pub overflow: bool,
}

/// Configures and runs one subtraction.
///
/// ```rust
/// use qsub_arith::Subtraction;
///
/// let outcome = Subtraction::new(2, 5).shots(256).seed(11).run()?;
/// assert_eq!(outcome.value, -3);
/// assert_eq!(outcome.counts.total(), 256);
/// # Ok::<(), qsub_arith::ArithError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Subtraction {
    a: i64,
    b: i64,
    shots: u64,
    width: Option<u32>,
    config: SimulatorConfig,
}

impl Subtraction {
    /// Compute `a - b` with default settings.
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            a,
            b,
            shots: DEFAULT_SHOTS,
            width: None,
            config: SimulatorConfig::default(),
        }
    }

    /// Number of measurement shots.
    #[must_use]
    pub fn shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    /// Seed the sampler.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Use a fixed register width instead of the automatic one.
    ///
    /// The circuit needs `2 * width` qubits, which must fit the configured
    /// `max_qubits` (24 by default).
    #[must_use]
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Replace the simulator configuration. A seed set earlier is kept unless
    /// `config` has its own.
    #[must_use]
    pub fn config(mut self, config: SimulatorConfig) -> Self {
        let seed = config.seed.or(self.config.seed);
        self.config = config;
        self.config.seed = seed;
        self
    }

    /// Build the circuit without running it.
    pub fn circuit(&self) -> ArithResult<SubtractionCircuit> {
        let builder = SubtractorBuilder::new(self.a, self.b);
        match self.width {
            Some(width) => builder.with_width(width).build(),
            None => builder.build(),
        }
    }

    /// Simulate, sample and decode the most frequent outcome.
    ///
    /// Zero shots produce [`ArithError::EmptyHistogram`].
    #[instrument(skip(self), fields(a = self.a, b = self.b, shots = self.shots))]
    pub fn run(&self) -> ArithResult<SubtractionOutcome> {
        let sub = self.circuit()?;
        let simulator = Simulator::with_config(self.config.clone())?;
        let result = simulator.execute(sub.circuit(), self.shots)?;

        let decoded = decode_counts(&result.counts, sub.width())?;
        debug!(
            value = decoded.value,
            bitstring = %decoded.bitstring,
            count = decoded.count,
            "decoded"
        );
        Ok(self.outcome(decoded.value, result.counts, sub.width()))
    }

    /// Decode the exact most probable outcome without sampling.
    #[instrument(skip(self), fields(a = self.a, b = self.b))]
    pub fn exact(&self) -> ArithResult<SubtractionOutcome> {
        let sub = self.circuit()?;
        let simulator = Simulator::with_config(self.config.clone())?;
        let distribution = simulator.run(sub.circuit())?;

        let (bitstring, _) = distribution
            .most_probable()
            .ok_or(ArithError::EmptyHistogram)?;
        let value = decode_bitstring(&bitstring)?;
        Ok(self.outcome(value, Counts::new(), sub.width()))
    }

    fn outcome(&self, value: i64, counts: Counts, width: u32) -> SubtractionOutcome {
        SubtractionOutcome {
            value,
            counts,
            width,
            overflow: detect_overflow(self.a, self.b, value),
        }
    }
}

/// Compute `a - b` with `shots` measurements and an automatic width.
///
/// Under the default configuration the operands' magnitudes must stay below
/// `2^11`: larger values need more than 24 qubits and fail with
/// [`SimError::CircuitTooLarge`](qsub_sim::SimError::CircuitTooLarge). Use
/// [`Subtraction::config`] to raise the limit.
pub fn subtract(a: i64, b: i64, shots: u64) -> ArithResult<SubtractionOutcome> {
    Subtraction::new(a, b).shots(shots).run()
}

/// Two's-complement subtraction overflows exactly when the operands have
/// different signs and the result's sign differs from the minuend's.
pub fn detect_overflow(a: i64, b: i64, result: i64) -> bool {
    (a < 0) != (b < 0) && (result < 0) != (a < 0)
}
