//! Seeded synthetic execution-time traces.

use rand::distr::Distribution;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Reproducible stream of samples drawn from a distribution.
///
/// Works with any `rand` distribution, including the crate's own
/// [`crate::Gev`], [`crate::Gpd`] and [`crate::Distribution`].
///
/// # Example
///
/// ```
/// use pwcet_oracle::measurement::SyntheticTrace;
/// use rand_distr::Exp;
///
/// let trace = SyntheticTrace::new(Exp::new(1.0).unwrap(), 42).samples(200);
/// assert_eq!(trace.len(), 200);
/// ```
#[derive(Debug, Clone)]
pub struct SyntheticTrace<D> {
    distribution: D,
    rng: Xoshiro256PlusPlus,
}

impl<D: Distribution<f64>> SyntheticTrace<D> {
    /// Create a trace with a fixed seed.
    pub fn new(distribution: D, seed: u64) -> Self {
        Self {
            distribution,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Draw one sample.
    pub fn sample(&mut self) -> f64 {
        self.distribution.sample(&mut self.rng)
    }

    /// Draw `n` samples.
    pub fn samples(mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.sample()).collect()
    }
}

impl<D: Distribution<f64>> Iterator for SyntheticTrace<D> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.sample())
    }
}
