//! Peaks-over-Threshold extraction.

use crate::constants::ROUNDING_SLACK;
use crate::error::InsufficientData;
use crate::measurement::{MeasuresPool, MeasuresPoolSet};
use crate::statistics::compute_quantile;
use crate::types::Sample;

use super::{ApproachKind, EvtApproach, ExtractedPools};

/// How the threshold is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    /// Fixed, externally agreed value.
    Fixed(f64),
    /// Empirical quantile (R-7) of the training pool, in `[0, 1)`.
    Quantile(f64),
}

/// Keeps samples strictly above a threshold, re-centred by subtracting it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeaksOverThreshold {
    threshold: Threshold,
}

impl PeaksOverThreshold {
    /// Use a fixed threshold.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: Threshold::Fixed(threshold),
        }
    }

    /// Use the `q` quantile of each training pool as the threshold.
    pub fn at_quantile(q: f64) -> Self {
        Self {
            threshold: Threshold::Quantile(q.clamp(0.0, 1.0)),
        }
    }

    /// Threshold rule.
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    fn excesses(pool: &MeasuresPool, threshold: f64) -> MeasuresPool {
        pool.samples()
            .iter()
            .filter(|s| s.time > threshold)
            .map(|s| Sample::new(s.input, s.time - threshold))
            .collect()
    }
}

impl EvtApproach for PeaksOverThreshold {
    fn kind(&self) -> ApproachKind {
        ApproachKind::PeaksOverThreshold
    }

    fn name(&self) -> &'static str {
        "Peaks over Threshold"
    }

    /// Enough samples to expect at least one exceedance.
    fn minimal_sample_size(&self) -> usize {
        match self.threshold {
            Threshold::Fixed(_) => 1,
            Threshold::Quantile(q) if q < 1.0 => (1.0 / (1.0 - q) - ROUNDING_SLACK).ceil().max(1.0) as usize,
            Threshold::Quantile(_) => usize::MAX,
        }
    }

    fn perform(&self, set: &MeasuresPoolSet) -> Result<ExtractedPools, InsufficientData> {
        let threshold = match self.threshold {
            Threshold::Fixed(u) => u,
            Threshold::Quantile(q) => {
                let mut values = set.training().values();
                compute_quantile(&mut values, q).ok_or(InsufficientData {
                    available: 0,
                    required: 1,
                })?
            }
        };

        Ok(ExtractedPools {
            threshold: Some(threshold),
            ..ExtractedPools::new(
                Self::excesses(set.training(), threshold),
                Self::excesses(set.test(), threshold),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InputId;

    #[test]
    fn test_fixed_threshold() {
        let pool = MeasuresPool::from_values(InputId(0), [1.0, 5.0, 3.0, 7.0, 2.0, 9.0, 4.0, 8.0, 6.0, 10.0]);
        let set = MeasuresPoolSet::split(&pool, 0.2, None);
        let out = PeaksOverThreshold::new(4.0).perform(&set).unwrap();

        assert_eq!(out.threshold, Some(4.0));
        assert_eq!(out.training.values(), vec![1.0, 3.0, 5.0, 4.0]);
        assert_eq!(out.test.values(), vec![2.0, 6.0]);
    }

    #[test]
    fn test_value_equal_to_threshold_excluded() {
        let pool = MeasuresPool::from_values(InputId(0), [4.0, 4.0, 4.5]);
        let set = MeasuresPoolSet::split(&pool, 0.01, None);
        let out = PeaksOverThreshold::new(4.0).perform(&set).unwrap();
        assert_eq!(out.training.values(), vec![0.5]);
    }

    #[test]
    fn test_quantile_threshold() {
        let pool = MeasuresPool::from_values(InputId(0), (1..=100).map(|x| x as f64));
        let set = MeasuresPoolSet::split(&pool, 0.2, None);
        let pot = PeaksOverThreshold::at_quantile(0.9);
        let out = pot.perform(&set).unwrap();

        // Training is 1..=80, its 0.9 quantile is 72.1
        let u = out.threshold.unwrap();
        assert!((u - 72.1).abs() < 1e-9);
        assert_eq!(out.training.len(), 8);
        assert_eq!(out.test.len(), 20);
        assert_eq!(pot.minimal_sample_size(), 10);
    }

    #[test]
    fn test_quantile_threshold_on_empty_pool() {
        let set = MeasuresPoolSet::split(&MeasuresPool::new(), 0.2, None);
        assert!(PeaksOverThreshold::at_quantile(0.9).perform(&set).is_err());
    }
}
