//! Configuration for the sampling controller.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_GROWTH_FACTOR, DEFAULT_RANK_LENGTH, DEFAULT_TEST_RESERVE};
use crate::error::ConfigError;
use crate::types::MergePolicy;

/// Configuration options for `SamplingController`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fraction of each input's samples held out for the test sub-pool
    /// (default: 0.2).
    pub samples_test_reserve: f64,

    /// Relative growth of the minimum iteration target after a size-related
    /// rejection (default: 0.2, i.e. 20%).
    pub growth_factor: f64,

    /// Optional target reliability. When set, tests size themselves for this
    /// statistical power.
    pub reliability_requirement: Option<f64>,

    /// Number of points in the dense survival grid of the CV path
    /// (default: 90,000).
    pub rank_length: usize,

    /// Optional guardrail on samples collected for a single input.
    pub max_samples_per_input: Option<usize>,

    /// Policy combining per-input estimates. Must be set before running.
    pub merge_policy: Option<MergePolicy>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            samples_test_reserve: DEFAULT_TEST_RESERVE,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            reliability_requirement: None,
            rank_length: DEFAULT_RANK_LENGTH,
            max_samples_per_input: None,
            merge_policy: None,
        }
    }
}

impl Config {
    /// Coarse survival grid for fast exploratory runs.
    ///
    /// Settings:
    /// - 10,000 grid points (vs 90,000 default)
    pub fn quick() -> Self {
        Self {
            rank_length: 10_000,
            ..Self::default()
        }
    }

    /// Fine survival grid for very small exceedance probabilities.
    ///
    /// Settings:
    /// - 1,000,000 grid points (vs 90,000 default)
    pub fn thorough() -> Self {
        Self {
            rank_length: 1_000_000,
            ..Self::default()
        }
    }

    /// Check the numeric fields.
    ///
    /// Collaborator presence (source, approach, estimator, policy) is checked
    /// by the controller itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let reserve = self.samples_test_reserve;
        if !(reserve > 0.0 && reserve < 1.0) {
            return Err(ConfigError::InvalidTestReserve(reserve));
        }
        if !(self.growth_factor > 0.0 && self.growth_factor.is_finite()) {
            return Err(ConfigError::InvalidGrowthFactor(self.growth_factor));
        }
        if let Some(r) = self.reliability_requirement {
            if !(r > 0.0 && r < 1.0) {
                return Err(ConfigError::InvalidReliability(r));
            }
        }
        if self.rank_length < 2 {
            return Err(ConfigError::InvalidRankLength(self.rank_length));
        }
        Ok(())
    }
}
