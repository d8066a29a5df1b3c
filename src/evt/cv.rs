//! CV-automatic tail selection.
//!
//! An exponential tail has a coefficient of variation of 1. Candidate tails
//! are the `m` largest samples, for `m = 2, 3, ...` up to `half - 2` where
//! `half = n / 2`. For each one the CV of the excesses over its smallest
//! value is compared with the upper edge of the 95% acceptance band
//! `1 + 1.96 / sqrt(m)`. The tail grows while it stays below that edge; the
//! last accepted length is the selected tail.

use crate::constants::{MIN_TAIL_ELEMENTS, Z_95};
use crate::error::InsufficientData;
use crate::measurement::{MeasuresPool, MeasuresPoolSet};
use crate::statistics::OnlineStats;
use crate::types::Sample;

use super::{ApproachKind, EvtApproach, ExtractedPools};

/// Single-shot CV-automatic approach.
///
/// Training and test sub-pools are merged; the selected tail, expressed as
/// excesses over its smallest value, is returned as both the training and
/// the test extremes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoefficientOfVariation {
    min_tail: usize,
}

impl Default for CoefficientOfVariation {
    fn default() -> Self {
        Self {
            min_tail: MIN_TAIL_ELEMENTS,
        }
    }
}

impl CoefficientOfVariation {
    /// Create with the default floor of 10 tail elements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of the accepted tail for values sorted in descending order.
    fn tail_length(sorted_desc: &[f64]) -> usize {
        let half = sorted_desc.len() / 2;
        if half < 4 {
            return 0;
        }

        let mut stats = OnlineStats::new();
        stats.update(sorted_desc[0]);
        let mut accepted = 0;
        for used in 2..=half - 2 {
            stats.update(sorted_desc[used - 1]);
            // Variance is shift invariant; only the mean moves with the base.
            let mean_excess = stats.mean() - sorted_desc[used - 1];
            let cv = if mean_excess > 0.0 {
                stats.std_dev() / mean_excess
            } else {
                0.0
            };
            if cv >= 1.0 + Z_95 / (used as f64).sqrt() {
                break;
            }
            accepted = used;
        }
        accepted
    }
}

impl EvtApproach for CoefficientOfVariation {
    fn kind(&self) -> ApproachKind {
        ApproachKind::CoefficientOfVariation
    }

    fn name(&self) -> &'static str {
        "CV-automatic"
    }

    /// Smallest population whose scan range can reach the tail floor.
    fn minimal_sample_size(&self) -> usize {
        2 * (self.min_tail + 2)
    }

    fn perform(&self, set: &MeasuresPoolSet) -> Result<ExtractedPools, InsufficientData> {
        let mut samples: Vec<Sample> = set
            .training()
            .samples()
            .iter()
            .chain(set.test().samples())
            .copied()
            .collect();
        let n = samples.len();
        if n <= self.min_tail {
            return Err(InsufficientData {
                available: n,
                required: self.min_tail + 1,
            });
        }

        let trace_mean = samples.iter().map(|s| s.time).sum::<f64>() / n as f64;
        samples.sort_by(|a, b| b.time.total_cmp(&a.time));
        let sorted: Vec<f64> = samples.iter().map(|s| s.time).collect();

        let nelems = Self::tail_length(&sorted);
        if nelems < self.min_tail {
            return Err(InsufficientData {
                available: nelems,
                required: self.min_tail,
            });
        }

        let threshold = sorted[nelems - 1];
        let tail: MeasuresPool = samples[..nelems]
            .iter()
            .map(|s| Sample::new(s.input, s.time - threshold))
            .collect();

        Ok(ExtractedPools {
            test: tail.clone(),
            training: tail,
            threshold: Some(threshold),
            blocks: None,
            trace_mean: Some(trace_mean),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InputId;

    fn two_pass_cv(tail: &[f64]) -> f64 {
        let base = tail[tail.len() - 1];
        let deltas: Vec<f64> = tail.iter().map(|x| x - base).collect();
        let n = deltas.len() as f64;
        let mean = deltas.iter().sum::<f64>() / n;
        let var = deltas.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / (n - 1.0);
        var.sqrt() / mean
    }

    #[test]
    fn test_tail_length_matches_direct_scan() {
        // Deterministic exponential quantiles, shuffled order is irrelevant
        let n = 200;
        let mut values: Vec<f64> = (1..=n)
            .map(|i| -(1.0 - (i as f64 - 0.5) / n as f64).ln())
            .collect();
        values.sort_by(|a, b| b.total_cmp(a));

        let nelems = CoefficientOfVariation::tail_length(&values);
        let mut expected = 0;
        for used in 2..=n / 2 - 2 {
            if two_pass_cv(&values[..used]) >= 1.0 + 1.96 / (used as f64).sqrt() {
                break;
            }
            expected = used;
        }
        assert_eq!(nelems, expected);
        assert!(nelems >= 10);
    }

    #[test]
    fn test_too_few_samples() {
        let pool = MeasuresPool::from_values(InputId(0), (0..10).map(|x| x as f64));
        let set = MeasuresPoolSet::split(&pool, 0.2, None);
        let err = CoefficientOfVariation::new().perform(&set).unwrap_err();
        assert_eq!(err.available, 10);
    }

    #[test]
    fn test_non_exponential_tail_rejected() {
        // Two tight clusters: the CV of the top values explodes immediately
        let mut values = vec![1000.0, 1000.0];
        values.extend((0..98).map(|i| 1.0 + (i % 3) as f64 * 1e-3));
        let pool = MeasuresPool::from_values(InputId(0), values);
        let set = MeasuresPoolSet::split(&pool, 0.2, None);
        assert!(CoefficientOfVariation::new().perform(&set).is_err());
    }

    #[test]
    fn test_tail_is_excess_over_threshold() {
        let n = 200;
        let values: Vec<f64> = (1..=n)
            .map(|i| 5.0 - (1.0 - (i as f64 - 0.5) / n as f64).ln())
            .collect();
        let pool = MeasuresPool::from_values(InputId(3), values.clone());
        let set = MeasuresPoolSet::split(&pool, 0.2, None);
        let out = CoefficientOfVariation::new().perform(&set).unwrap();

        let threshold = out.threshold.unwrap();
        assert_eq!(out.training, out.test);
        assert!(out.training.values().iter().all(|&x| x >= 0.0));
        assert_eq!(out.training.values().iter().copied().fold(f64::INFINITY, f64::min), 0.0);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!((out.training.max().unwrap() + threshold - max).abs() < 1e-12);
        let mean = values.iter().sum::<f64>() / n as f64;
        assert!((out.trace_mean.unwrap() - mean).abs() < 1e-12);
    }
}
