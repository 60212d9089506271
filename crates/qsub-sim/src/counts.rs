//! Measurement histograms.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Render a measured outcome as a bitstring, most significant classical bit
/// first.
///
/// Bit `i` of `outcome` is classical bit `c[i]`. Positions past the width of
/// `usize` read `0`.
pub fn outcome_to_bitstring(outcome: usize, num_clbits: usize) -> String {
    (0..num_clbits)
        .rev()
        .map(|bit| {
            let set = u32::try_from(bit)
                .ok()
                .and_then(|bit| outcome.checked_shr(bit))
                .is_some_and(|rest| rest & 1 == 1);
            if set { '1' } else { '0' }
        })
        .collect()
}

/// Histogram of observed bitstrings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Observations of `bitstring` (0 if never seen).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Number of distinct bitstrings.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no shot was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of recorded shots.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate `(bitstring, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Pairs sorted by bitstring.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
        pairs
    }

    /// The most frequent bitstring. Ties go to the lexicographically smallest.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
    }

    /// Relative frequency of `bitstring`.
    pub fn frequency(&self, bitstring: &str) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.get(bitstring) as f64 / total as f64
    }

    /// Fold another histogram into this one.
    pub fn merge(&mut self, other: Counts) {
        for (bitstring, count) in other.counts {
            self.insert(bitstring, count);
        }
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (bitstring, count) in iter {
            counts.insert(bitstring, count);
        }
        counts
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        write!(f, "{{")?;
        for (bitstring, count) in self.sorted() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{bitstring}: {count}")?;
            first = false;
        }
        write!(f, "}}")
    }
}

/// Histogram plus the run metadata it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Observed bitstring counts.
    pub counts: Counts,
    /// Number of shots requested.
    pub shots: u64,
    /// Wall-clock time spent simulating and sampling, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a result.
    pub fn new(counts: Counts, shots: u64) -> Self {
        Self {
            counts,
            shots,
            execution_time_ms: None,
        }
    }

    /// Attach the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }
}
