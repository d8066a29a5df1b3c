//! Maximum-likelihood estimator.
//!
//! Minimises the negative log-likelihood over `(μ, ln σ, ξ)` with a
//! Nelder–Mead simplex. Points outside the support evaluate to `+inf`.
//!
//! The GPD likelihood is unbounded for `ξ < -1` (the density diverges at
//! the upper endpoint), so the GPD search is restricted to `ξ >= -1`. At
//! `ξ = -1` the GPD is uniform and the fit is the sample range.

use nalgebra::Vector3;

use crate::constants::SHAPE_EPSILON;
use crate::distribution::{Distribution, Gev, Gpd};
use crate::error::EstimatorError;
use crate::evt::{ApproachKind, ExtractedPools};
use crate::statistics::{mean, NelderMead};

use super::{check_run, Estimator, Fit};

const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

/// Numerical maximum-likelihood estimator for GEV and GPD.
#[derive(Debug, Clone, Default)]
pub struct MleEstimator {
    source: Option<ApproachKind>,
    optimizer: NelderMead,
    fit: Option<Fit>,
}

impl MleEstimator {
    /// Create an estimator with the default optimizer settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the optimizer iteration budget.
    pub fn max_iterations(mut self, n: usize) -> Self {
        self.optimizer.max_iterations = n;
        self
    }

    fn fit_gev(&self, data: &[f64]) -> Result<Gev, EstimatorError> {
        let n = data.len() as f64;
        let m = mean(data).unwrap_or(0.0);
        // Population variance for the Gumbel method-of-moments start
        let var = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / n;
        if !(var > 0.0) {
            return Err(EstimatorError::Degenerate("zero variance in block maxima".into()));
        }
        let scale = var.sqrt() * 6.0f64.sqrt() / std::f64::consts::PI;
        let start = Vector3::new(m - EULER_MASCHERONI * scale, scale.ln(), 0.0);

        let min = self
            .optimizer
            .minimize(|p: &Vector3<f64>| gev_nll(p, data), start)
            .ok_or(EstimatorError::NotConverged {
                iterations: self.optimizer.max_iterations,
            })?;
        let p = min.point;
        Ok(Gev::new(p[0], p[1].exp(), p[2])?)
    }

    fn fit_gpd(&self, data: &[f64]) -> Result<Gpd, EstimatorError> {
        let n = data.len() as f64;
        let m = mean(data).unwrap_or(0.0);
        let lowest = data.iter().copied().fold(f64::INFINITY, f64::min);
        if !(m > lowest) {
            return Err(EstimatorError::Degenerate("zero spread in excesses".into()));
        }
        let start = Vector3::new(lowest - (m - lowest) / n, (m - lowest).ln(), 0.0);

        let min = self
            .optimizer
            .minimize(|p: &Vector3<f64>| gpd_nll(p, data), start)
            .ok_or(EstimatorError::NotConverged {
                iterations: self.optimizer.max_iterations,
            })?;
        let p = min.point;
        // The likelihood may place the location marginally below zero for
        // excesses starting at zero.
        Ok(Gpd::new(p[0].max(0.0), p[1].exp(), p[2])?)
    }
}

fn gev_nll(p: &Vector3<f64>, data: &[f64]) -> f64 {
    let (mu, log_scale, xi) = (p[0], p[1], p[2]);
    let scale = log_scale.exp();
    let mut nll = data.len() as f64 * log_scale;

    if xi.abs() < SHAPE_EPSILON {
        for &x in data {
            let z = (x - mu) / scale;
            nll += z + (-z).exp();
        }
        return nll;
    }

    for &x in data {
        let t = 1.0 + xi * (x - mu) / scale;
        if t <= 0.0 {
            return f64::INFINITY;
        }
        nll += (1.0 + 1.0 / xi) * t.ln() + t.powf(-1.0 / xi);
    }
    nll
}

fn gpd_nll(p: &Vector3<f64>, data: &[f64]) -> f64 {
    let (mu, log_scale, xi) = (p[0], p[1], p[2]);
    if xi < -1.0 {
        return f64::INFINITY;
    }
    let scale = log_scale.exp();
    let mut nll = data.len() as f64 * log_scale;

    for &x in data {
        let y = (x - mu) / scale;
        if y < 0.0 {
            return f64::INFINITY;
        }
        if xi.abs() < SHAPE_EPSILON {
            nll += y;
        } else {
            let t = 1.0 + xi * y;
            if t <= 0.0 {
                return f64::INFINITY;
            }
            nll += (1.0 + 1.0 / xi) * t.ln();
        }
    }
    nll
}

impl Estimator for MleEstimator {
    fn name(&self) -> &'static str {
        "MLE"
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
        10
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
            ApproachKind::PeaksOverThreshold => self.fit_gpd(&data)?.into(),
            _ => self.fit_gev(&data)?.into(),
        };
        self.fit = Some(Fit::from(distribution));
        Ok(())
    }

    fn result(&self) -> Result<&Fit, EstimatorError> {
        self.fit.as_ref().ok_or(EstimatorError::NotRun)
    }
}
