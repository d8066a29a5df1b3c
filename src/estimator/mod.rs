//! Distribution estimators.
//!
//! An estimator is told at configuration time which approach produced its
//! input ([`Estimator::set_source_approach`]), then fitted with
//! [`Estimator::run`]; [`Estimator::result`] exposes the fit.
//!
//! - [`PwmEstimator`]: closed-form probability-weighted moments
//! - [`MleEstimator`]: maximum likelihood via Nelder–Mead
//! - [`CvRateEstimator`]: exponential rate of a CV-selected tail

mod cv_rate;
mod mle;
mod pwm;

pub use cv_rate::CvRateEstimator;
pub use mle::MleEstimator;
pub use pwm::PwmEstimator;

use crate::config::Config;
use crate::distribution::{Distribution, ExponentialTail};
use crate::error::EstimatorError;
use crate::evt::{ApproachKind, ExtractedPools};

/// A fitted model.
#[derive(Debug, Clone, PartialEq)]
pub struct Fit {
    /// Fitted distribution.
    pub distribution: Distribution,
    /// Dense survival grid, for exponential tails.
    pub tail: Option<ExponentialTail>,
}

impl From<Distribution> for Fit {
    fn from(distribution: Distribution) -> Self {
        Self {
            distribution,
            tail: None,
        }
    }
}

/// Fits a distribution to extracted extremes.
pub trait Estimator {
    /// Human-readable name.
    fn name(&self) -> &'static str;

    /// Designate the approach whose output will be fitted.
    fn set_source_approach(&mut self, kind: ApproachKind);

    /// Approach designated so far.
    fn source_approach(&self) -> Option<ApproachKind>;

    /// Whether the estimator has formulas for `kind`.
    fn supports(&self, kind: ApproachKind) -> bool;

    /// Minimum number of training extremes.
    fn minimal_sample_size(&self) -> usize;

    /// Pick up run-wide settings.
    fn configure(&mut self, _config: &Config) {}

    /// Fit the training extremes.
    fn run(&mut self, extremes: &ExtractedPools) -> Result<(), EstimatorError>;

    /// Result of the last successful `run`.
    fn result(&self) -> Result<&Fit, EstimatorError>;
}

impl<E: Estimator + ?Sized> Estimator for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn set_source_approach(&mut self, kind: ApproachKind) {
        (**self).set_source_approach(kind)
    }

    fn source_approach(&self) -> Option<ApproachKind> {
        (**self).source_approach()
    }

    fn supports(&self, kind: ApproachKind) -> bool {
        (**self).supports(kind)
    }

    fn minimal_sample_size(&self) -> usize {
        (**self).minimal_sample_size()
    }

    fn configure(&mut self, config: &Config) {
        (**self).configure(config)
    }

    fn run(&mut self, extremes: &ExtractedPools) -> Result<(), EstimatorError> {
        (**self).run(extremes)
    }

    fn result(&self) -> Result<&Fit, EstimatorError> {
        (**self).result()
    }
}

/// Resolve the designated approach and check the sample count.
fn check_run(
    source: Option<ApproachKind>,
    supported: &[ApproachKind],
    available: usize,
    required: usize,
) -> Result<ApproachKind, EstimatorError> {
    let kind = source.ok_or(EstimatorError::NoSourceApproach)?;
    if !supported.contains(&kind) {
        return Err(EstimatorError::UnsupportedApproach(kind));
    }
    if available < required {
        return Err(EstimatorError::InsufficientSamples {
            available,
            required,
        });
    }
    Ok(kind)
}
