//! Exponential rate estimator for CV-selected tails.

use crate::config::Config;
use crate::constants::{DEFAULT_RANK_LENGTH, MIN_TAIL_ELEMENTS, Z_95};
use crate::distribution::{ExponentialTail, Gpd};
use crate::error::EstimatorError;
use crate::evt::{ApproachKind, ExtractedPools};

use super::{check_run, Estimator, Fit};

/// Fits `rate = 1 / mean(excess)` and the normal-approximation bounds
/// `rate (1 ± 1.96 / sqrt(n))`.
///
/// The best estimate is reported as a two-parameter GPD with shape 0 and
/// scale `1 / rate`; queries at small probabilities go through the dense
/// survival grid attached to the fit.
#[derive(Debug, Clone)]
pub struct CvRateEstimator {
    source: Option<ApproachKind>,
    rank_length: usize,
    fit: Option<Fit>,
}

impl Default for CvRateEstimator {
    fn default() -> Self {
        Self {
            source: None,
            rank_length: DEFAULT_RANK_LENGTH,
            fit: None,
        }
    }
}

impl CvRateEstimator {
    /// Create an estimator with the default grid resolution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of survival grid points.
    pub fn rank_length(mut self, n: usize) -> Self {
        self.rank_length = n.max(2);
        self
    }
}

impl Estimator for CvRateEstimator {
    fn name(&self) -> &'static str {
        "CV rate"
    }

    fn set_source_approach(&mut self, kind: ApproachKind) {
        self.source = Some(kind);
    }

    fn source_approach(&self) -> Option<ApproachKind> {
        self.source
    }

    fn supports(&self, kind: ApproachKind) -> bool {
        kind == ApproachKind::CoefficientOfVariation
    }

    fn minimal_sample_size(&self) -> usize {
        MIN_TAIL_ELEMENTS
    }

    fn configure(&mut self, config: &Config) {
        self.rank_length = config.rank_length.max(2);
    }

    fn run(&mut self, extremes: &ExtractedPools) -> Result<(), EstimatorError> {
        self.fit = None;
        check_run(
            self.source,
            &[ApproachKind::CoefficientOfVariation],
            extremes.training.len(),
            self.minimal_sample_size(),
        )?;

        let values = extremes.training.values();
        let n = values.len() as f64;
        let base = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mean_excess = values.iter().map(|x| x - base).sum::<f64>() / n;
        if !(mean_excess > 0.0 && mean_excess.is_finite()) {
            return Err(EstimatorError::Degenerate("tail has no spread".into()));
        }

        let rate = 1.0 / mean_excess;
        let margin = Z_95 / n.sqrt();
        let rates = [rate, rate * (1.0 + margin), rate * (1.0 - margin)];

        let threshold = extremes.threshold.unwrap_or(0.0);
        let tail: Vec<f64> = values.iter().map(|x| x + threshold).collect();
        let offset = extremes.trace_mean.unwrap_or(threshold + base);

        let distribution = Gpd::exponential(rate)?.into();
        self.fit = Some(Fit {
            distribution,
            tail: Some(ExponentialTail::new(rates, tail, offset, self.rank_length)),
        });
        Ok(())
    }

    fn result(&self) -> Result<&Fit, EstimatorError> {
        self.fit.as_ref().ok_or(EstimatorError::NotRun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::MeasuresPool;
    use crate::types::InputId;

    fn cv_extremes(values: Vec<f64>, threshold: f64) -> ExtractedPools {
        ExtractedPools {
            threshold: Some(threshold),
            trace_mean: Some(threshold - 1.0),
            ..ExtractedPools::from_extremes(MeasuresPool::from_values(InputId(0), values))
        }
    }

    #[test]
    fn test_rate_and_bounds() {
        // Excesses 0, 0.5, ..., 5.5: mean 2.75
        let values: Vec<f64> = (0..12).map(|i| i as f64 * 0.5).collect();
        let mut est = CvRateEstimator::new().rank_length(1_000);
        est.set_source_approach(ApproachKind::CoefficientOfVariation);
        est.run(&cv_extremes(values, 100.0)).unwrap();

        let fit = est.result().unwrap();
        let rate = 1.0 / 2.75;
        assert!((fit.distribution.scale() - 2.75).abs() < 1e-12);
        assert_eq!(fit.distribution.shape(), 0.0);
        assert_eq!(fit.distribution.location(), 0.0);

        let tail = fit.tail.as_ref().unwrap();
        let margin = 1.96 / 12f64.sqrt();
        assert!((tail.rate() - rate).abs() < 1e-12);
        assert!((tail.rate_low() - rate * (1.0 + margin)).abs() < 1e-12);
        assert!((tail.rate_high() - rate * (1.0 - margin)).abs() < 1e-12);
        assert_eq!(tail.max_observed(), Some(105.5));
        assert_eq!(tail.offset(), 99.0);
        assert_eq!(tail.rank_length(), 1_000);
    }

    #[test]
    fn test_requires_cv_source() {
        let values: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let mut est = CvRateEstimator::new();
        assert_eq!(
            est.run(&cv_extremes(values.clone(), 0.0)).unwrap_err(),
            EstimatorError::NoSourceApproach
        );
        est.set_source_approach(ApproachKind::BlockMaxima);
        assert_eq!(
            est.run(&cv_extremes(values, 0.0)).unwrap_err(),
            EstimatorError::UnsupportedApproach(ApproachKind::BlockMaxima)
        );
    }

    #[test]
    fn test_short_or_flat_tail() {
        let mut est = CvRateEstimator::new();
        est.set_source_approach(ApproachKind::CoefficientOfVariation);
        assert!(matches!(
            est.run(&cv_extremes(vec![1.0; 5], 0.0)),
            Err(EstimatorError::InsufficientSamples { available: 5, required: 10 })
        ));
        assert!(matches!(
            est.run(&cv_extremes(vec![1.0; 20], 0.0)),
            Err(EstimatorError::Degenerate(_))
        ));
    }

    #[test]
    fn test_configure_picks_rank_length() {
        let mut est = CvRateEstimator::new();
        est.configure(&Config::quick());
        est.set_source_approach(ApproachKind::CoefficientOfVariation);
        est.run(&cv_extremes((0..15).map(|i| i as f64).collect(), 0.0)).unwrap();
        assert_eq!(est.result().unwrap().tail.as_ref().unwrap().rank_length(), 10_000);
    }
}
