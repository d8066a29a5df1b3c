//! pWCET queries over one or more accepted estimates.
//!
//! Under the Envelope policy each input has its own estimate and every
//! query answers for the worst input: the largest quantile and the largest
//! exceedance probability. Probabilities of different inputs are never
//! multiplied together. Under Trace-Merge there is a single estimate and
//! queries delegate to it.

use crate::distribution::{check_probability, Distribution, ExponentialTail};
use crate::error::QueryError;
use crate::estimator::Fit;
use crate::types::{InputId, MergePolicy};

/// An accepted fit and the inputs it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct PwcetEstimate {
    /// Inputs whose samples the fit was made from.
    pub inputs: Vec<InputId>,
    /// Fitted distribution.
    pub distribution: Distribution,
    /// Dense survival grid, when the fit is an exponential tail.
    pub tail: Option<ExponentialTail>,
    /// Shift from the distribution's support to execution-time units: the
    /// grid offset of an exponential tail, otherwise the threshold
    /// subtracted from the extremes before fitting.
    pub offset: f64,
}

impl PwcetEstimate {
    /// Wrap a fitted distribution with no threshold.
    pub fn new(inputs: Vec<InputId>, distribution: Distribution) -> Self {
        Self {
            inputs,
            distribution,
            tail: None,
            offset: 0.0,
        }
    }

    pub(crate) fn from_fit(inputs: Vec<InputId>, fit: Fit, threshold: f64) -> Self {
        let offset = fit.tail.as_ref().map_or(threshold, ExponentialTail::offset);
        Self {
            inputs,
            distribution: fit.distribution,
            tail: fit.tail,
            offset,
        }
    }

    /// Execution time not exceeded with probability `p`.
    pub fn quantile(&self, p: f64) -> Result<f64, QueryError> {
        match &self.tail {
            Some(tail) => tail.quantile(p),
            None => Ok(self.offset + self.distribution.quantile(p)?),
        }
    }

    /// Probability of exceeding execution time `x`.
    pub fn survival(&self, x: f64) -> f64 {
        match &self.tail {
            Some(tail) => tail.survival(x),
            None => self.distribution.survival(x - self.offset),
        }
    }

    /// Optimistic bound at `p` (point estimate when no bounds are available).
    pub fn quantile_low(&self, p: f64) -> Result<f64, QueryError> {
        match &self.tail {
            Some(tail) => tail.quantile_low(p),
            None => self.quantile(p),
        }
    }

    /// Pessimistic bound at `p` (point estimate when no bounds are available).
    pub fn quantile_high(&self, p: f64) -> Result<f64, QueryError> {
        match &self.tail {
            Some(tail) => tail.quantile_high(p),
            None => self.quantile(p),
        }
    }
}

/// Combined view over accepted estimates.
#[derive(Debug, Clone, Copy)]
pub struct Pwcet<'a> {
    estimates: &'a [PwcetEstimate],
    policy: MergePolicy,
}

impl<'a> Pwcet<'a> {
    /// Combine `estimates` under `policy`.
    ///
    /// Fails with [`QueryError::NoEstimate`] when `estimates` is empty.
    pub fn new(estimates: &'a [PwcetEstimate], policy: MergePolicy) -> Result<Self, QueryError> {
        if estimates.is_empty() {
            return Err(QueryError::NoEstimate);
        }
        Ok(Self { estimates, policy })
    }

    /// Merging policy.
    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Underlying estimates.
    pub fn estimates(&self) -> &'a [PwcetEstimate] {
        self.estimates
    }

    /// pWCET at non-exceedance probability `p`: the worst input's quantile.
    pub fn quantile(&self, p: f64) -> Result<f64, QueryError> {
        self.max_over(p, PwcetEstimate::quantile)
    }

    /// Combined optimistic bound.
    pub fn quantile_low(&self, p: f64) -> Result<f64, QueryError> {
        self.max_over(p, PwcetEstimate::quantile_low)
    }

    /// Combined pessimistic bound.
    pub fn quantile_high(&self, p: f64) -> Result<f64, QueryError> {
        self.max_over(p, PwcetEstimate::quantile_high)
    }

    /// Exceedance probability of `x`: the worst input's survival.
    pub fn survival(&self, x: f64) -> f64 {
        self.estimates
            .iter()
            .map(|e| e.survival(x))
            .fold(0.0, f64::max)
    }

    fn max_over(
        &self,
        p: f64,
        query: impl Fn(&PwcetEstimate, f64) -> Result<f64, QueryError>,
    ) -> Result<f64, QueryError> {
        check_probability(p)?;
        let mut worst = f64::NEG_INFINITY;
        for estimate in self.estimates {
            worst = worst.max(query(estimate, p)?);
        }
        Ok(worst)
    }
}
