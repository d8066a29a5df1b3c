//! Extreme-value distributions and their survival/quantile functions.
//!
//! - [`Gev`]: Generalized Extreme Value, fitted to block maxima
//! - [`Gpd`]: Generalized Pareto, fitted to threshold excesses
//! - [`ExponentialTail`]: dense survival grid for the exponential tails
//!   produced by the CV-automatic path
//!
//! Quantiles take the non-exceedance probability `p` in `(0, 1)`; survival
//! functions return the exceedance probability.

mod exponential;
mod gev;
mod gpd;

pub use exponential::ExponentialTail;
pub use gev::Gev;
pub use gpd::Gpd;

use rand::distr::Open01;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// A fitted extreme-value distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum Distribution {
    /// Generalized Extreme Value.
    Gev(Gev),
    /// Generalized Pareto.
    Gpd(Gpd),
}

impl Distribution {
    /// Short family name.
    pub fn family(&self) -> &'static str {
        match self {
            Self::Gev(_) => "GEV",
            Self::Gpd(_) => "GPD",
        }
    }

    /// Location parameter (0 for a two-parameter GPD).
    pub fn location(&self) -> f64 {
        match self {
            Self::Gev(d) => d.location(),
            Self::Gpd(d) => d.location().unwrap_or(0.0),
        }
    }

    /// Scale parameter.
    pub fn scale(&self) -> f64 {
        match self {
            Self::Gev(d) => d.scale(),
            Self::Gpd(d) => d.scale(),
        }
    }

    /// Shape parameter.
    pub fn shape(&self) -> f64 {
        match self {
            Self::Gev(d) => d.shape(),
            Self::Gpd(d) => d.shape(),
        }
    }

    /// Probability of exceeding `x`.
    pub fn survival(&self, x: f64) -> f64 {
        match self {
            Self::Gev(d) => d.survival(x),
            Self::Gpd(d) => d.survival(x),
        }
    }

    /// Probability of not exceeding `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        match self {
            Self::Gev(d) => d.cdf(x),
            Self::Gpd(d) => d.cdf(x),
        }
    }

    /// Value not exceeded with probability `p`.
    pub fn quantile(&self, p: f64) -> Result<f64, QueryError> {
        match self {
            Self::Gev(d) => d.quantile(p),
            Self::Gpd(d) => d.quantile(p),
        }
    }

    fn quantile_unchecked(&self, p: f64) -> f64 {
        match self {
            Self::Gev(d) => d.quantile_unchecked(p),
            Self::Gpd(d) => d.quantile_unchecked(p),
        }
    }
}

impl From<Gev> for Distribution {
    fn from(d: Gev) -> Self {
        Self::Gev(d)
    }
}

impl From<Gpd> for Distribution {
    fn from(d: Gpd) -> Self {
        Self::Gpd(d)
    }
}

// Inverse transform sampling, for synthetic traces.
impl rand::distr::Distribution<f64> for Distribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.sample(Open01);
        self.quantile_unchecked(u)
    }
}

impl rand::distr::Distribution<f64> for Gev {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.sample(Open01);
        self.quantile_unchecked(u)
    }
}

impl rand::distr::Distribution<f64> for Gpd {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.sample(Open01);
        self.quantile_unchecked(u)
    }
}

/// Reject probabilities outside the open unit interval.
pub(crate) fn check_probability(p: f64) -> Result<(), QueryError> {
    if p > 0.0 && p < 1.0 {
        Ok(())
    } else {
        Err(QueryError::InvalidProbability(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_dispatch() {
        let gev: Distribution = Gev::new(1.0, 2.0, 0.1).unwrap().into();
        let gpd: Distribution = Gpd::two_parameter(2.0, 0.0).unwrap().into();

        assert_eq!(gev.family(), "GEV");
        assert_eq!(gpd.family(), "GPD");
        assert_eq!(gpd.location(), 0.0);
        assert_eq!(gev.scale(), 2.0);
        assert!((gpd.survival(2.0) - (-1.0f64).exp()).abs() < 1e-12);
        assert!((gev.cdf(3.0) + gev.survival(3.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sampling_matches_median() {
        let dist: Distribution = Gpd::new(0.0, 1.0, 0.0).unwrap().into();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let samples: Vec<f64> = (0..20_000).map(|_| rng.sample(dist)).collect();
        let below = samples.iter().filter(|&&x| x <= 2.0f64.ln()).count() as f64;
        assert!((below / 20_000.0 - 0.5).abs() < 0.02);
        assert!(samples.iter().all(|&x| x >= 0.0));
    }

    #[test]
    fn test_serde_tagging() {
        let dist: Distribution = Gev::new(1.0, 2.0, -0.1).unwrap().into();
        let json = serde_json::to_string(&dist).unwrap();
        assert!(json.contains("\"family\":\"gev\""));
        let back: Distribution = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dist);
    }
}
