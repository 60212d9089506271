//! Gate types.
//!
//! The gate family is closed: every gate is a permutation or a sign flip of
//! basis-state amplitudes, so simulation never leaves the unit sphere.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard gates with known semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardGate {
    /// Pauli-X (bit flip).
    X,
    /// Controlled-Z (phase flip when both qubits are 1).
    CZ,
    /// Controlled-X (CNOT).
    CX,
    /// Toffoli gate (CCX / CCNOT).
    CCX,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::X => "x",
            StandardGate::CZ => "cz",
            StandardGate::CX => "cx",
            StandardGate::CCX => "ccx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::X => 1,
            StandardGate::CZ | StandardGate::CX => 2,
            StandardGate::CCX => 3,
        }
    }

    /// Number of leading operands that act as controls.
    ///
    /// CZ is symmetric; its first operand is reported as the control.
    #[inline]
    pub fn num_controls(&self) -> u32 {
        self.num_qubits() - 1
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A gate with associated metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: StandardGate,
    /// Optional label, used to tag the construction stage a gate belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    /// Create a new unlabelled gate.
    pub fn standard(kind: StandardGate) -> Self {
        Self { kind, label: None }
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }

    /// Whether this gate carries `label`.
    pub fn has_label(&self, label: &str) -> bool {
        self.label.as_deref() == Some(label)
    }
}

impl From<StandardGate> for Gate {
    fn from(kind: StandardGate) -> Self {
        Gate::standard(kind)
    }
}
