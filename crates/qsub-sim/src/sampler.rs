//! Shot sampling from a final probability distribution.
//!
//! Shots are split into fixed-size chunks drawn in parallel. Each chunk owns
//! its RNG and tally; tallies are merged in a single reduction. A seeded chunk
//! RNG depends only on `(seed, chunk index)`, so seeded results do not depend
//! on how many worker threads run.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use crate::config::{DEFAULT_CHUNK_SIZE, SimulatorConfig};
use crate::counts::{Counts, outcome_to_bitstring};
use crate::simulator::Distribution;

/// Draws measurement shots from a [`Distribution`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sampler {
    seed: Option<u64>,
    chunk_size: usize,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler {
    /// Create an unseeded sampler.
    pub fn new() -> Self {
        Self {
            seed: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Create a sampler matching a simulator configuration.
    pub fn from_config(config: &SimulatorConfig) -> Self {
        Self {
            seed: config.seed,
            chunk_size: config.chunk_size.max(1),
        }
    }

    /// Fix the seed for reproducible sampling.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of shots per parallel chunk (at least 1).
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Draw `shots` samples and histogram the measured outcomes.
    ///
    /// Zero shots produce an empty histogram.
    #[instrument(skip(self, distribution), fields(seed = ?self.seed))]
    pub fn sample(&self, distribution: &Distribution, shots: u64) -> Counts {
        if shots == 0 {
            return Counts::new();
        }

        let cdf = CumulativeTable::new(distribution.probabilities());
        let chunk_size = self.chunk_size as u64;
        let num_chunks = shots.div_ceil(chunk_size);
        debug!(shots, num_chunks, chunk_size, "sampling shots");

        let tally = (0..num_chunks)
            .into_par_iter()
            .map(|chunk| {
                let start = chunk * chunk_size;
                let n = chunk_size.min(shots - start);
                let mut rng = self.chunk_rng(chunk);
                let mut local: FxHashMap<usize, u64> = FxHashMap::default();
                for _ in 0..n {
                    let basis = cdf.draw(&mut rng);
                    *local.entry(distribution.project(basis)).or_insert(0) += 1;
                }
                local
            })
            .reduce(FxHashMap::default, merge_tallies);

        let num_clbits = distribution.num_clbits();
        tally
            .into_iter()
            .map(|(outcome, count)| (outcome_to_bitstring(outcome, num_clbits), count))
            .collect()
    }

    fn chunk_rng(&self, chunk: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(chunk_seed(seed, chunk)),
            None => StdRng::from_entropy(),
        }
    }
}

fn merge_tallies(
    mut a: FxHashMap<usize, u64>,
    b: FxHashMap<usize, u64>,
) -> FxHashMap<usize, u64> {
    for (outcome, count) in b {
        *a.entry(outcome).or_insert(0) += count;
    }
    a
}

/// SplitMix64 finalizer over `seed ^ chunk`, so neighbouring chunks get
/// unrelated streams.
fn chunk_seed(seed: u64, chunk: u64) -> u64 {
    let mut z = seed ^ chunk.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Cumulative distribution over basis states (CDF method, binary search).
struct CumulativeTable {
    cdf: Vec<f64>,
    /// Last basis state with nonzero probability; absorbs rounding at the top.
    last_nonzero: usize,
}

impl CumulativeTable {
    fn new(probabilities: &[f64]) -> Self {
        let mut cumsum = 0.0;
        let cdf: Vec<f64> = probabilities
            .iter()
            .map(|&p| {
                cumsum += p;
                cumsum
            })
            .collect();
        let last_nonzero = probabilities.iter().rposition(|&p| p > 0.0).unwrap_or(0);
        Self { cdf, last_nonzero }
    }

    fn total(&self) -> f64 {
        self.cdf.last().copied().unwrap_or(0.0)
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> usize {
        let u = rng.r#gen::<f64>() * self.total();
        self.cdf
            .partition_point(|&c| c <= u)
            .min(self.last_nonzero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsub_ir::{ClbitId, QubitId};

    fn one_hot(dim: usize, index: usize) -> Vec<f64> {
        let mut p = vec![0.0; dim];
        p[index] = 1.0;
        p
    }

    #[test]
    fn test_zero_shots_is_empty() {
        let dist =
            Distribution::new(one_hot(2, 1), vec![(QubitId(0), ClbitId(0))], 1).unwrap();
        let counts = Sampler::new().with_seed(1).sample(&dist, 0);
        assert!(counts.is_empty());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_one_hot_distribution_yields_single_key() {
        let dist = Distribution::new(
            one_hot(8, 0b101),
            vec![(QubitId(0), ClbitId(0)), (QubitId(2), ClbitId(1))],
            2,
        ).unwrap();
        for shots in [1, 7, 1000, 10_000] {
            let counts = Sampler::new().with_chunk_size(64).sample(&dist, shots);
            assert_eq!(counts.len(), 1);
            assert_eq!(counts.get("11"), shots);
        }
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let dist = Distribution::new(
            vec![0.25; 4],
            vec![(QubitId(0), ClbitId(0)), (QubitId(1), ClbitId(1))],
            2,
        ).unwrap();
        let sampler = Sampler::new().with_seed(42).with_chunk_size(100);
        let a = sampler.sample(&dist, 5_000);
        let b = sampler.sample(&dist, 5_000);
        assert_eq!(a, b);
        assert_eq!(a.total(), 5_000);
    }

    #[test]
    fn test_uniform_distribution_is_roughly_uniform() {
        let dist =
            Distribution::new(vec![0.5, 0.5], vec![(QubitId(0), ClbitId(0))], 1).unwrap();
        let counts = Sampler::new().with_seed(7).sample(&dist, 20_000);
        let f = counts.frequency("1");
        assert!((f - 0.5).abs() < 0.03, "frequency {f}");
    }

    #[test]
    fn test_zero_probability_states_are_never_drawn() {
        let table = CumulativeTable::new(&[0.0, 0.5, 0.0, 0.5, 0.0]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..2_000 {
            let i = table.draw(&mut rng);
            assert!(i == 1 || i == 3, "drew {i}");
        }
    }

    #[test]
    fn test_chunk_seeds_differ() {
        assert_ne!(chunk_seed(1, 0), chunk_seed(1, 1));
        assert_ne!(chunk_seed(1, 0), chunk_seed(2, 0));
    }
}
