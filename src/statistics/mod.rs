//! Statistical building blocks.
//!
//! This module provides the numerical infrastructure shared by the
//! estimators and hypothesis tests:
//! - Autocorrelation function for independence testing
//! - Sample moments and probability-weighted moments
//! - Welford online mean/variance for incremental tail scans
//! - Nelder–Mead simplex minimisation for likelihood fitting
//! - Empirical quantiles using O(n) selection

mod autocorrelation;
mod moments;
mod online;
mod optimize;
mod quantile;

pub use autocorrelation::{autocorrelation_function, lag_autocorrelation};
pub use moments::{mean, probability_weighted_moments, std_dev};
pub use online::OnlineStats;
pub use optimize::{Minimum, NelderMead};
pub use quantile::compute_quantile;
