//! # pwcet-oracle
//!
//! Measurement-based probabilistic worst-case execution time (pWCET)
//! estimation with Extreme Value Theory.
//!
//! The [`SamplingController`] collects execution-time samples through
//! user-supplied hooks, extracts their extremes (Block Maxima,
//! Peaks-over-Threshold or the CV-automatic tail), fits a GEV, GPD or
//! exponential tail model and gates every step with statistical tests. When
//! a fit is rejected for lack of data, the sample target grows by 20% and
//! sampling continues. The accepted model answers queries such as "which
//! execution time is exceeded with probability 1e-9".
//!
//! ## Quick Start
//!
//! ```
//! use pwcet_oracle::{CoefficientOfVariation, CvRateEstimator, SamplingController, SyntheticTrace};
//! use rand_distr::Exp;
//!
//! let trace = SyntheticTrace::new(Exp::new(1.0).unwrap(), 7).samples(2_000);
//!
//! let mut controller = SamplingController::new()
//!     .approach(CoefficientOfVariation::new())
//!     .estimator(CvRateEstimator::new())
//!     .rank_length(10_000);
//! controller.analyze_trace(&trace).unwrap();
//!
//! if let Ok(wcet) = controller.wcet_at(1.0 - 1e-9) {
//!     println!("pWCET at 1e-9: {:.3}", wcet);
//! }
//! ```
//!
//! ## Probability convention
//!
//! `quantile(p)` takes the non-exceedance probability `p` in `(0, 1)`;
//! `survival(x)` returns the probability of exceeding `x`.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod controller;
mod error;
mod pwcet;
mod result;
mod types;

// Functional modules
pub mod constants;
pub mod distribution;
pub mod estimator;
pub mod evt;
pub mod hypothesis;
pub mod measurement;
pub mod output;
pub mod statistics;

// Re-exports for public API
pub use config::Config;
pub use controller::SamplingController;
pub use distribution::{Distribution, ExponentialTail, Gev, Gpd};
pub use error::{
    ConfigError, DistributionError, Error, EstimatorError, InsufficientData, QueryError, Result, TestError,
    TraceError,
};
pub use estimator::{CvRateEstimator, Estimator, Fit, MleEstimator, PwmEstimator};
pub use evt::{ApproachKind, BlockMaxima, CoefficientOfVariation, EvtApproach, ExtractedPools, PeaksOverThreshold, Threshold};
pub use hypothesis::{KolmogorovSmirnov, LjungBox, StatisticalTest, TestReport};
pub use measurement::{
    parse_trace, read_trace, InputSequence, InputSource, MeasuresPool, MeasuresPoolSet, SingleInput, SyntheticTrace,
};
pub use pwcet::{Pwcet, PwcetEstimate};
pub use result::{
    AnalysisOutcome, Attempt, EstimateSummary, ExecutionState, MinIterations, PwcetPoint, RejectReason, RunReport,
    SafetyRecord, Watermark,
};
pub use types::{HookStatus, InputId, MergePolicy, Sample};

/// Analyse a single-input trace with the CV-automatic approach and default
/// configuration.
///
/// Convenience wrapper around [`SamplingController::analyze_trace`]. The
/// returned controller gives access to the estimate, attempts and report.
///
/// # Errors
///
/// Never fails for a well-formed default configuration; configuration errors
/// are propagated for completeness.
pub fn analyze(trace: &[f64]) -> Result<SamplingController> {
    let mut controller = SamplingController::new()
        .approach(CoefficientOfVariation::new())
        .estimator(CvRateEstimator::new());
    controller.analyze_trace(trace)?;
    Ok(controller)
}
