//! Generalized Pareto distribution.

use serde::{Deserialize, Serialize};

use crate::constants::SHAPE_EPSILON;
use crate::error::{DistributionError, QueryError};

use super::check_probability;

/// GPD distribution fitted to threshold excesses.
///
/// The two-parameter form has no location (fixed at 0); the three-parameter
/// form carries a non-negative location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gpd {
    location: Option<f64>,
    scale: f64,
    shape: f64,
}

impl Gpd {
    /// Three-parameter GPD.
    pub fn new(location: f64, scale: f64, shape: f64) -> Result<Self, DistributionError> {
        if !(location >= 0.0 && location.is_finite()) {
            return Err(DistributionError::InvalidLocation(location));
        }
        Self::build(Some(location), scale, shape)
    }

    /// Two-parameter GPD (location fixed at 0).
    pub fn two_parameter(scale: f64, shape: f64) -> Result<Self, DistributionError> {
        Self::build(None, scale, shape)
    }

    /// Exponential excess model with the given rate, as a two-parameter GPD
    /// with shape 0.
    pub fn exponential(rate: f64) -> Result<Self, DistributionError> {
        Self::two_parameter(1.0 / rate, 0.0)
    }

    fn build(location: Option<f64>, scale: f64, shape: f64) -> Result<Self, DistributionError> {
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

    /// Location parameter, `None` for the two-parameter form.
    pub fn location(&self) -> Option<f64> {
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

    fn mu(&self) -> f64 {
        self.location.unwrap_or(0.0)
    }

    /// Survival function `P(X > x)`.
    ///
    /// ```text
    /// S(x) = (1 + ξ (x - μ) / σ)^(-1/ξ)     ξ != 0
    /// S(x) = exp(-(x - μ) / σ)               ξ == 0
    /// ```
    pub fn survival(&self, x: f64) -> f64 {
        let y = (x - self.mu()) / self.scale;
        if y <= 0.0 {
            return 1.0;
        }
        if self.shape.abs() < SHAPE_EPSILON {
            return (-y).exp();
        }
        let t = 1.0 + self.shape * y;
        if t <= 0.0 {
            return 0.0;
        }
        t.powf(-1.0 / self.shape)
    }

    /// Cumulative distribution function `P(X <= x)`.
    pub fn cdf(&self, x: f64) -> f64 {
        1.0 - self.survival(x)
    }

    /// Value not exceeded with probability `p`.
    ///
    /// ```text
    /// x(p) = μ + σ (1 - (1 - p)^(-ξ)) / (-ξ)     ξ != 0
    /// x(p) = μ - σ ln(1 - p)                       ξ == 0
    /// ```
    pub fn quantile(&self, p: f64) -> Result<f64, QueryError> {
        check_probability(p)?;
        Ok(self.quantile_unchecked(p))
    }

    pub(crate) fn quantile_unchecked(&self, p: f64) -> f64 {
        if self.shape.abs() < SHAPE_EPSILON {
            self.mu() - self.scale * (-p).ln_1p()
        } else {
            self.mu() + self.scale * (1.0 - (1.0 - p).powf(-self.shape)) / (-self.shape)
        }
    }

    /// Finite upper endpoint `μ - σ/ξ` when `ξ < 0`.
    pub fn upper_endpoint(&self) -> Option<f64> {
        (self.shape < -SHAPE_EPSILON).then(|| self.mu() - self.scale / self.shape)
    }
}
