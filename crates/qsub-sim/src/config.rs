//! Simulator configuration.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Default maximum register size (2^24 amplitudes, 256 MiB).
pub const DEFAULT_MAX_QUBITS: usize = 24;

/// Default normalization tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Default number of shots drawn per parallel chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Configuration for a [`Simulator`](crate::Simulator) instance.
///
/// Every field has a default, so partial JSON documents are accepted:
///
/// ```rust
/// use qsub_sim::SimulatorConfig;
///
/// let config = SimulatorConfig::from_json(r#"{ "seed": 7, "max_qubits": 12 }"#)?;
/// assert_eq!(config.seed, Some(7));
/// assert_eq!(config.max_qubits, 12);
/// assert_eq!(config.tolerance, 1e-9);
/// # Ok::<(), qsub_sim::SimError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Largest circuit, in qubits, the simulator accepts.
    pub max_qubits: usize,
    /// Allowed deviation of `|psi|^2` from 1.
    pub tolerance: f64,
    /// Check normalization after every gate rather than once at the end.
    pub check_every_gate: bool,
    /// Seed for shot sampling; `None` draws from OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Shots drawn per parallel chunk.
    pub chunk_size: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            tolerance: DEFAULT_TOLERANCE,
            check_every_gate: false,
            seed: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl SimulatorConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the qubit limit.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Set the normalization tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Enable or disable per-gate normalization checks.
    #[must_use]
    pub fn with_check_every_gate(mut self, enabled: bool) -> Self {
        self.check_every_gate = enabled;
        self
    }

    /// Fix the sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of shots per parallel chunk.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Reject values the simulator cannot work with.
    pub fn validate(&self) -> SimResult<()> {
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(SimError::Config(format!(
                "tolerance must be a positive finite number, got {}",
                self.tolerance
            )));
        }
        if self.chunk_size == 0 {
            return Err(SimError::Config("chunk_size must be at least 1".into()));
        }
        if self.max_qubits >= usize::BITS as usize {
            return Err(SimError::Config(format!(
                "max_qubits must be below {}, got {}",
                usize::BITS,
                self.max_qubits
            )));
        }
        Ok(())
    }
}
