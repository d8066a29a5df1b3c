//! Generalized Extreme Value distribution.

use serde::{Deserialize, Serialize};

use crate::constants::SHAPE_EPSILON;
use crate::error::{DistributionError, QueryError};

use super::check_probability;

/// GEV distribution fitted to block maxima.
///
/// Uses the Coles sign convention: `shape > 0` is heavy-tailed (Fréchet),
/// `shape < 0` has a finite upper endpoint (Weibull), `shape = 0` is Gumbel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gev {
    location: f64,
    scale: f64,
    shape: f64,
}

impl Gev {
    /// Create a GEV distribution, rejecting non-finite parameters and
    /// non-positive scale.
    pub fn new(location: f64, scale: f64, shape: f64) -> Result<Self, DistributionError> {
        if !location.is_finite() {
            return Err(DistributionError::InvalidLocation(location));
        }
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(DistributionError::InvalidScale(scale));
        }
        if !shape.is_finite() {
            return Err(DistributionError::InvalidShape(shape));
        }
        Ok(Self {
            location,
            scale,
            shape,
        })
    }

    /// Location parameter μ.
    pub fn location(&self) -> f64 {
        self.location
    }

    /// Scale parameter σ.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Shape parameter ξ.
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Cumulative distribution function `P(X <= x)`.
    pub fn cdf(&self, x: f64) -> f64 {
        let z = (x - self.location) / self.scale;
        if self.shape.abs() < SHAPE_EPSILON {
            return (-(-z).exp()).exp();
        }
        let t = 1.0 + self.shape * z;
        if t <= 0.0 {
            // Outside the support: below the lower endpoint for ξ > 0,
            // above the upper endpoint for ξ < 0.
            return if self.shape > 0.0 { 0.0 } else { 1.0 };
        }
        (-t.powf(-1.0 / self.shape)).exp()
    }

    /// Survival function `P(X > x)`.
    pub fn survival(&self, x: f64) -> f64 {
        // -expm1(-t) keeps precision for tiny exceedance probabilities
        let z = (x - self.location) / self.scale;
        if self.shape.abs() < SHAPE_EPSILON {
            return -(-(-z).exp()).exp_m1();
        }
        let t = 1.0 + self.shape * z;
        if t <= 0.0 {
            return if self.shape > 0.0 { 1.0 } else { 0.0 };
        }
        -(-t.powf(-1.0 / self.shape)).exp_m1()
    }

    /// Value not exceeded with probability `p`.
    ///
    /// ```text
    /// x(p) = μ + σ ((-ln p)^(-ξ) - 1) / ξ     ξ != 0
    /// x(p) = μ - σ ln(-ln p)                   ξ == 0
    /// ```
    pub fn quantile(&self, p: f64) -> Result<f64, QueryError> {
        check_probability(p)?;
        Ok(self.quantile_unchecked(p))
    }

    pub(crate) fn quantile_unchecked(&self, p: f64) -> f64 {
        let y = -p.ln();
        if self.shape.abs() < SHAPE_EPSILON {
            self.location - self.scale * y.ln()
        } else {
            self.location + self.scale * (y.powf(-self.shape) - 1.0) / self.shape
        }
    }

    /// Finite upper endpoint `μ - σ/ξ` when `ξ < 0`.
    pub fn upper_endpoint(&self) -> Option<f64> {
        (self.shape < -SHAPE_EPSILON).then(|| self.location - self.scale / self.shape)
    }
}
