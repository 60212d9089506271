//! Circuit execution.

use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, instrument, trace};

use qsub_ir::{Circuit, ClbitId, QubitId};

use crate::config::SimulatorConfig;
use crate::counts::{ExecutionResult, outcome_to_bitstring};
use crate::error::{SimError, SimResult};
use crate::sampler::Sampler;
use crate::statevector::Statevector;

/// Widest measured outcome: every classical bit is one bit of a `usize`.
pub const MAX_CLBITS: usize = usize::BITS as usize;

/// Final probability distribution of a circuit run, with the measurement map
/// needed to project basis states onto classical bits.
///
/// This is all the sampler needs; the amplitudes are dropped once it exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    probabilities: Vec<f64>,
    measurements: Vec<(QubitId, ClbitId)>,
    num_clbits: usize,
}

impl Distribution {
    /// Create a distribution over `probabilities.len()` basis states.
    ///
    /// Fails if outcomes are wider than [`MAX_CLBITS`] or a measurement
    /// writes a classical bit outside `0..num_clbits`.
    pub fn new(
        probabilities: Vec<f64>,
        measurements: Vec<(QubitId, ClbitId)>,
        num_clbits: usize,
    ) -> SimResult<Self> {
        check_clbit_width(num_clbits)?;
        if let Some(&(_, clbit)) = measurements.iter().find(|(_, c)| c.index() >= num_clbits) {
            return Err(SimError::ClbitOutOfRange {
                clbit: clbit.0,
                num_clbits,
            });
        }
        Ok(Self {
            probabilities,
            measurements,
            num_clbits,
        })
    }

    /// Probability of each basis state, little-endian indexed.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// The `(qubit, clbit)` measurement map.
    pub fn measurements(&self) -> &[(QubitId, ClbitId)] {
        &self.measurements
    }

    /// Width of measured bitstrings.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Classical outcome (bit `i` = `c[i]`) observed for a basis state.
    ///
    /// Unmeasured classical bits read 0.
    pub fn project(&self, basis: usize) -> usize {
        self.measurements
            .iter()
            .filter(|(q, _)| (basis >> q.index()) & 1 == 1)
            .fold(0, |acc, (_, c)| acc | (1 << c.index()))
    }

    /// Exact probability of every reachable measured bitstring.
    pub fn marginal(&self) -> BTreeMap<String, f64> {
        let mut marginal = BTreeMap::new();
        for (basis, &p) in self.probabilities.iter().enumerate() {
            if p > 0.0 {
                let bits = outcome_to_bitstring(self.project(basis), self.num_clbits);
                *marginal.entry(bits).or_insert(0.0) += p;
            }
        }
        marginal
    }

    /// The exact most probable measured bitstring. Ties go to the
    /// lexicographically smallest.
    pub fn most_probable(&self) -> Option<(String, f64)> {
        // BTreeMap iterates in ascending key order; keep the first maximum.
        self.marginal()
            .into_iter()
            .fold(None, |best: Option<(String, f64)>, (bits, p)| match best {
                Some((_, best_p)) if best_p >= p => best,
                _ => Some((bits, p)),
            })
    }
}

/// Statevector simulator.
///
/// Each instance is owned by its caller; there is no shared backend state.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a simulator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a simulator from a validated configuration.
    pub fn with_config(config: SimulatorConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a simulator from a JSON configuration document.
    pub fn from_json(json: &str) -> SimResult<Self> {
        Ok(Self {
            config: SimulatorConfig::from_json(json)?,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// A sampler configured like this simulator.
    pub fn sampler(&self) -> Sampler {
        Sampler::from_config(&self.config)
    }

    /// Run the circuit and return its final probability distribution.
    ///
    /// Normalization is checked once at the end, or after every gate when
    /// `check_every_gate` is set.
    pub fn run(&self, circuit: &Circuit) -> SimResult<Distribution> {
        self.run_inner(circuit, self.config.check_every_gate)
    }

    /// Like [`Simulator::run`], but checks normalization after every gate.
    pub fn run_checked(&self, circuit: &Circuit) -> SimResult<Distribution> {
        self.run_inner(circuit, true)
    }

    /// Evolve the initial state through the circuit and return it.
    pub fn statevector(&self, circuit: &Circuit) -> SimResult<Statevector> {
        self.evolve(circuit, self.config.check_every_gate)
    }

    /// Run the circuit and sample `shots` measurements.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub fn execute(&self, circuit: &Circuit, shots: u64) -> SimResult<ExecutionResult> {
        let start = Instant::now();
        let distribution = self.run(circuit)?;
        let counts = self.sampler().sample(&distribution, shots);

        let elapsed = start.elapsed();
        debug!("Execution completed in {:?}", elapsed);

        Ok(ExecutionResult::new(counts, shots)
            .with_execution_time(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)))
    }

    fn run_inner(&self, circuit: &Circuit, check_every_gate: bool) -> SimResult<Distribution> {
        let sv = self.evolve(circuit, check_every_gate)?;
        Distribution::new(
            sv.into_probabilities(),
            circuit.measurements(),
            circuit.num_clbits(),
        )
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn evolve(&self, circuit: &Circuit, check_every_gate: bool) -> SimResult<Statevector> {
        let num_qubits = circuit.num_qubits();
        if num_qubits > self.config.max_qubits {
            return Err(SimError::CircuitTooLarge {
                num_qubits,
                max_qubits: self.config.max_qubits,
            });
        }
        check_clbit_width(circuit.num_clbits())?;

        debug!(
            num_qubits,
            gates = circuit.gate_count(),
            "Starting simulation"
        );

        self.apply_all(Statevector::new(num_qubits), circuit, check_every_gate)
    }

    fn apply_all(
        &self,
        mut sv: Statevector,
        circuit: &Circuit,
        check_every_gate: bool,
    ) -> SimResult<Statevector> {
        for (i, inst) in circuit.instructions().iter().enumerate() {
            sv.apply(inst)?;
            trace!(index = i, gate = inst.name(), "applied");
            if check_every_gate && inst.is_gate() {
                self.check_normalized(&sv, Some(i))?;
            }
        }
        self.check_normalized(&sv, None)?;
        Ok(sv)
    }

    fn check_normalized(&self, sv: &Statevector, after_gate: Option<usize>) -> SimResult<()> {
        let norm_sqr = sv.norm_sqr();
        if (norm_sqr - 1.0).abs() > self.config.tolerance || !norm_sqr.is_finite() {
            return Err(SimError::UnnormalizedState {
                norm_sqr,
                tolerance: self.config.tolerance,
                after_gate,
            });
        }
        Ok(())
    }
}

fn check_clbit_width(num_clbits: usize) -> SimResult<()> {
    if num_clbits > MAX_CLBITS {
        return Err(SimError::TooManyClbits {
            num_clbits,
            max_clbits: MAX_CLBITS,
        });
    }
    Ok(())
}
