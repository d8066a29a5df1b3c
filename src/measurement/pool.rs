//! Sample pools and their training/test split.

use std::collections::{BTreeMap, BTreeSet};

use crate::constants::ROUNDING_SLACK;
use crate::types::{InputId, Sample};

/// Arrival-ordered, append-only collection of samples.
///
/// Samples of different inputs are interleaved in the order they were
/// recorded; per-input views preserve that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasuresPool {
    samples: Vec<Sample>,
    max: Option<f64>,
}

impl MeasuresPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool holding `values` for a single input, in order.
    pub fn from_values(input: InputId, values: impl IntoIterator<Item = f64>) -> Self {
        values.into_iter().map(|t| Sample::new(input, t)).collect()
    }

    /// Append one sample.
    pub fn push(&mut self, sample: Sample) {
        self.max = Some(match self.max {
            Some(m) => m.max(sample.time),
            None => sample.time,
        });
        self.samples.push(sample);
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest time recorded so far, across all inputs.
    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// All samples in arrival order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// All times in arrival order.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time).collect()
    }

    /// Times recorded for `input`, in arrival order.
    pub fn values_for(&self, input: InputId) -> Vec<f64> {
        self.samples
            .iter()
            .filter(|s| s.input == input)
            .map(|s| s.time)
            .collect()
    }

    /// Number of samples recorded for `input`.
    pub fn count_for(&self, input: InputId) -> usize {
        self.samples.iter().filter(|s| s.input == input).count()
    }

    /// Distinct inputs, in ascending order.
    pub fn inputs(&self) -> Vec<InputId> {
        self.samples
            .iter()
            .map(|s| s.input)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Extend<Sample> for MeasuresPool {
    fn extend<I: IntoIterator<Item = Sample>>(&mut self, iter: I) {
        for sample in iter {
            self.push(sample);
        }
    }
}

impl FromIterator<Sample> for MeasuresPool {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        let mut pool = Self::new();
        pool.extend(iter);
        pool
    }
}

/// Deterministic split of a pool into training and test sub-pools.
///
/// Each input is split on its own: the chronologically first
/// `n - floor(n * reserve)` samples of an input go to training, the rest to
/// test.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuresPoolSet {
    training: MeasuresPool,
    test: MeasuresPool,
}

impl MeasuresPoolSet {
    /// Split `pool`, keeping only `input`'s samples when one is given.
    ///
    /// # Arguments
    ///
    /// * `pool` - Samples collected so far
    /// * `reserve` - Fraction of each input's samples placed in the test pool
    /// * `input` - Restrict the split to this input (`None` keeps all inputs)
    pub fn split(pool: &MeasuresPool, reserve: f64, input: Option<InputId>) -> Self {
        let reserve = reserve.clamp(0.0, 1.0);
        let keep = |s: &Sample| input.map_or(true, |id| s.input == id);

        let mut totals: BTreeMap<InputId, usize> = BTreeMap::new();
        for sample in pool.samples().iter().filter(|s| keep(s)) {
            *totals.entry(sample.input).or_default() += 1;
        }
        let train_sizes: BTreeMap<InputId, usize> = totals
            .iter()
            .map(|(&id, &n)| {
                let n_test = ((n as f64 * reserve) + ROUNDING_SLACK).floor() as usize;
                (id, n - n_test.min(n))
            })
            .collect();

        let mut seen: BTreeMap<InputId, usize> = BTreeMap::new();
        let mut training = MeasuresPool::new();
        let mut test = MeasuresPool::new();
        for &sample in pool.samples().iter().filter(|s| keep(s)) {
            let index = seen.entry(sample.input).or_default();
            if *index < train_sizes[&sample.input] {
                training.push(sample);
            } else {
                test.push(sample);
            }
            *index += 1;
        }

        Self { training, test }
    }

    /// Training sub-pool.
    pub fn training(&self) -> &MeasuresPool {
        &self.training
    }

    /// Test sub-pool.
    pub fn test(&self) -> &MeasuresPool {
        &self.test
    }
}
