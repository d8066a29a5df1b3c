//! Probability-weighted-moment estimator.
//!
//! GEV for block maxima (Hosking, Wallis & Wood 1985):
//!
//! ```text
//! c = (2 b1 - b0) / (3 b2 - b0) - ln 2 / ln 3
//! k = 7.8590 c + 2.9554 c^2
//! σ = (2 b1 - b0) k / (Γ(1 + k) (1 - 2^-k))
//! μ = b0 + σ (Γ(1 + k) - 1) / k
//! ξ = -k
//! ```
//!
//! GPD for threshold excesses. The minimum of `n` GPD samples sits on
//! average `σ / (n (1 + k)) = l1 / n` above the location, which gives the
//! location in closed form (floored at zero):
//!
//! ```text
//! μ  = (n x_(1) - b0) / (n - 1)
//! l1 = b0 - μ,  l2 = 2 b1 - b0
//! k  = l1 / l2 - 2
//! σ  = (1 + k) l1
//! ξ  = -k
//! ```

use statrs::function::gamma::gamma;

use crate::distribution::{Distribution, Gev, Gpd};
use crate::error::EstimatorError;
use crate::evt::{ApproachKind, ExtractedPools};
use crate::statistics::probability_weighted_moments;

use super::{check_run, Estimator, Fit};

const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

/// Closed-form PWM estimator for GEV and GPD.
#[derive(Debug, Clone, Default)]
pub struct PwmEstimator {
    source: Option<ApproachKind>,
    fit: Option<Fit>,
}

impl PwmEstimator {
    /// Create an estimator with no designated approach.
    pub fn new() -> Self {
        Self::default()
    }

    fn fit_gev(data: &[f64]) -> Result<Gev, EstimatorError> {
        let [b0, b1, b2] = probability_weighted_moments(data)
            .ok_or_else(|| EstimatorError::Degenerate("fewer than three samples".into()))?;

        let l2 = 2.0 * b1 - b0;
        let denom = 3.0 * b2 - b0;
        if !(l2 > 0.0) || denom == 0.0 {
            return Err(EstimatorError::Degenerate("zero spread in block maxima".into()));
        }

        let c = l2 / denom - 2.0f64.ln() / 3.0f64.ln();
        let k = 7.8590 * c + 2.9554 * c * c;

        let (location, scale) = if k.abs() < 1e-8 {
            let scale = l2 / 2.0f64.ln();
            (b0 - EULER_MASCHERONI * scale, scale)
        } else {
            if 1.0 + k <= 0.0 {
                return Err(EstimatorError::Degenerate(format!("shape {} out of range", -k)));
            }
            let g = gamma(1.0 + k);
            let scale = l2 * k / (g * (1.0 - 2.0f64.powf(-k)));
            (b0 + scale * (g - 1.0) / k, scale)
        };

        Ok(Gev::new(location, scale, -k)?)
    }

    fn fit_gpd(data: &[f64]) -> Result<Gpd, EstimatorError> {
        let [b0, b1, _] = probability_weighted_moments(data)
            .ok_or_else(|| EstimatorError::Degenerate("fewer than three samples".into()))?;
        let n = data.len() as f64;
        let lowest = data.iter().copied().fold(f64::INFINITY, f64::min);
        let location = ((n * lowest - b0) / (n - 1.0)).max(0.0);

        let l1 = b0 - location;
        let l2 = 2.0 * b1 - b0;
        if !(l2 > 0.0) {
            return Err(EstimatorError::Degenerate("zero spread in excesses".into()));
        }

        let k = l1 / l2 - 2.0;
        let scale = (1.0 + k) * l1;
        Ok(Gpd::new(location, scale, -k)?)
    }
}

impl Estimator for PwmEstimator {
    fn name(&self) -> &'static str {
        "PWM"
    }

    fn set_source_approach(&mut self, kind: ApproachKind) {
        self.source = Some(kind);
    }

    fn source_approach(&self) -> Option<ApproachKind> {
        self.source
    }

    fn supports(&self, kind: ApproachKind) -> bool {
        matches!(kind, ApproachKind::BlockMaxima | ApproachKind::PeaksOverThreshold)
    }

    fn minimal_sample_size(&self) -> usize {
        3
    }

    fn run(&mut self, extremes: &ExtractedPools) -> Result<(), EstimatorError> {
        self.fit = None;
        let kind = check_run(
            self.source,
            &[ApproachKind::BlockMaxima, ApproachKind::PeaksOverThreshold],
            extremes.training.len(),
            self.minimal_sample_size(),
        )?;

        let data = extremes.training.values();
        let distribution: Distribution = match kind {
            ApproachKind::PeaksOverThreshold => Self::fit_gpd(&data)?.into(),
            _ => Self::fit_gev(&data)?.into(),
        };
        self.fit = Some(Fit::from(distribution));
        Ok(())
    }

    fn result(&self) -> Result<&Fit, EstimatorError> {
        self.fit.as_ref().ok_or(EstimatorError::NotRun)
    }
}
