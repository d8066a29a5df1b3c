//! Dense survival grid for the exponential tail of the CV-automatic path.
//!
//! The grid evaluates the discretised exponential survival function at
//! `rank_length` evenly spaced excess values covering
//! `[0, RANK_SPAN_FACTOR * (max - min of tail)]`. Queries are binary searches
//! over the precomputed, non-increasing survival sequence.
//!
//! Three grids are built in the same pass: the best-estimate rate and the two
//! confidence-adjusted rates.

use crate::constants::{RANK_SPAN_FACTOR, ROUNDING_SLACK};
use crate::error::QueryError;

use super::check_probability;

/// Exponential tail model with confidence bounds, backed by survival grids.
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialTail {
    rate: f64,
    rate_low: f64,
    rate_high: f64,
    /// Added to every grid point to map excesses back to execution times.
    offset: f64,
    step: f64,
    tail: Vec<f64>,
    survival: Vec<f64>,
    survival_low: Vec<f64>,
    survival_high: Vec<f64>,
}

/// Which of the three rates a query refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Estimate,
    Low,
    High,
}

impl ExponentialTail {
    /// Build the survival grids.
    ///
    /// # Arguments
    ///
    /// * `rates` - `[rate, rate_low, rate_high]`
    /// * `tail` - The extracted tail values (any order, non-empty)
    /// * `offset` - Shift applied to grid points when answering queries
    /// * `rank_length` - Number of grid points (at least 2)
    ///
    /// The discretised survival at grid point `r_i` is
    ///
    /// ```text
    /// S_i = 1 - sum_{j < i} f(r_j) / sum_j f(r_j)
    ///     = (exp(-rate r_i) - exp(-rate N step)) / (1 - exp(-rate N step))
    /// ```
    ///
    /// with `f` the exponential density, which is evaluated in one pass
    /// without materialising the density.
    pub fn new(rates: [f64; 3], tail: Vec<f64>, offset: f64, rank_length: usize) -> Self {
        let rank_length = rank_length.max(2);
        let (min, max) = tail
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
        let span = if tail.is_empty() { 0.0 } else { RANK_SPAN_FACTOR * (max - min) };
        let step = span / (rank_length - 1) as f64;

        let [rate, rate_low, rate_high] = rates;
        let total = step * rank_length as f64;
        let floor = [(-rate * total).exp(), (-rate_low * total).exp(), (-rate_high * total).exp()];
        let norm = floor.map(|q| 1.0 - q);

        let mut survival = Vec::with_capacity(rank_length);
        let mut survival_low = Vec::with_capacity(rank_length);
        let mut survival_high = Vec::with_capacity(rank_length);
        for i in 0..rank_length {
            let r = i as f64 * step;
            survival.push(discrete_survival(rate, r, floor[0], norm[0]));
            survival_low.push(discrete_survival(rate_low, r, floor[1], norm[1]));
            survival_high.push(discrete_survival(rate_high, r, floor[2], norm[2]));
        }

        Self {
            rate,
            rate_low,
            rate_high,
            offset,
            step,
            tail,
            survival,
            survival_low,
            survival_high,
        }
    }

    /// Best-estimate rate.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Rate at the lower confidence bound, `rate (1 + 1.96/sqrt(n))`.
    pub fn rate_low(&self) -> f64 {
        self.rate_low
    }

    /// Rate at the upper confidence bound, `rate (1 - 1.96/sqrt(n))`.
    pub fn rate_high(&self) -> f64 {
        self.rate_high
    }

    /// Shift applied to grid points.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Number of grid points.
    pub fn rank_length(&self) -> usize {
        self.survival.len()
    }

    /// Tail values the model was fitted on.
    pub fn tail_values(&self) -> &[f64] {
        &self.tail
    }

    /// Largest value in the tail (the maximum observed execution time).
    pub fn max_observed(&self) -> Option<f64> {
        self.tail.iter().copied().reduce(f64::max)
    }

    /// Execution time not exceeded with probability `p` (best estimate).
    pub fn quantile(&self, p: f64) -> Result<f64, QueryError> {
        self.lookup(p, Bound::Estimate)
    }

    /// Execution time at `p` under the faster-decaying (optimistic) rate.
    pub fn quantile_low(&self, p: f64) -> Result<f64, QueryError> {
        self.lookup(p, Bound::Low)
    }

    /// Execution time at `p` under the slower-decaying (pessimistic) rate.
    pub fn quantile_high(&self, p: f64) -> Result<f64, QueryError> {
        self.lookup(p, Bound::High)
    }

    /// Probability of exceeding `x` (best estimate).
    pub fn survival(&self, x: f64) -> f64 {
        let grid = &self.survival;
        let r = x - self.offset;
        if r < 0.0 {
            return 1.0;
        }
        // Number of grid points <= r, tolerant to the rounding of offset + i * step
        let i = if self.step > 0.0 {
            (((r / self.step) + ROUNDING_SLACK).floor() as usize)
                .saturating_add(1)
                .min(grid.len())
        } else {
            grid.len()
        };
        if i == 0 {
            1.0
        } else {
            grid[i - 1]
        }
    }

    fn lookup(&self, p: f64, bound: Bound) -> Result<f64, QueryError> {
        check_probability(p)?;
        let grid = match bound {
            Bound::Estimate => &self.survival,
            Bound::Low => &self.survival_low,
            Bound::High => &self.survival_high,
        };
        let exceedance = 1.0 - p;
        // First index whose survival has dropped to the target
        let idx = grid
            .partition_point(|&s| s > exceedance)
            .min(grid.len() - 1);
        Ok(self.offset + idx as f64 * self.step)
    }
}

fn discrete_survival(rate: f64, r: f64, floor: f64, norm: f64) -> f64 {
    if norm <= 0.0 {
        return 0.0;
    }
    (((-rate * r).exp() - floor) / norm).max(0.0)
}
