//! Outcomes of fit attempts and the state and report of a sampling run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::distribution::Distribution;
use crate::evt::ApproachKind;
use crate::types::{InputId, MergePolicy};

/// Why a fit attempt was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    /// A sample test rejected the raw pool.
    RejectSampleTest,
    /// The approach or estimator did not get enough extremes.
    FailEvtAppMinSampleSize,
    /// The test extremes are too few for a post-run test.
    FailPostRunTestSampleSize,
    /// The test extremes are too few for a post-EVT test.
    FailPostEvtTestSampleSize,
    /// A post-run test rejected the training extremes.
    RejectPostRunTest,
    /// The estimator failed on the training extremes.
    FailEvtEstimator,
    /// A post-EVT test rejected the fitted distribution.
    RejectPostEvtTest,
    /// Sampling ended before the minimum iteration target was reached.
    NoEnoughSamples,
}

impl RejectReason {
    /// Whether this rejection is cured by collecting more samples.
    ///
    /// Size-related rejections inflate the minimum iteration target and
    /// sampling continues; every other reason ends the inner loop.
    pub fn triggers_growth(self) -> bool {
        matches!(
            self,
            Self::FailEvtAppMinSampleSize
                | Self::FailPostRunTestSampleSize
                | Self::FailPostEvtTestSampleSize
        )
    }

    /// Whether a statistical test caused the rejection.
    pub fn is_statistical(self) -> bool {
        matches!(
            self,
            Self::RejectSampleTest | Self::RejectPostRunTest | Self::RejectPostEvtTest
        )
    }

    /// Short human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::RejectSampleTest => "sample test rejected the pool",
            Self::FailEvtAppMinSampleSize => "too few extremes for the estimator",
            Self::FailPostRunTestSampleSize => "too few test extremes for a post-run test",
            Self::FailPostEvtTestSampleSize => "too few test extremes for a post-EVT test",
            Self::RejectPostRunTest => "post-run test rejected the extremes",
            Self::FailEvtEstimator => "estimator failed",
            Self::RejectPostEvtTest => "post-EVT test rejected the fit",
            Self::NoEnoughSamples => "not enough samples",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Result of one fit-and-test attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnalysisOutcome {
    /// All gates passed.
    Accepted(Distribution),
    /// A gate failed.
    Rejected(RejectReason),
}

impl AnalysisOutcome {
    /// Whether the attempt was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The accepted distribution, if any.
    pub fn distribution(&self) -> Option<&Distribution> {
        match self {
            Self::Accepted(d) => Some(d),
            Self::Rejected(_) => None,
        }
    }

    /// The rejection reason, if any.
    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected(r) => Some(*r),
        }
    }
}

/// Statistical standing of a run's result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyRecord {
    /// A representativity test accepted the collected inputs.
    pub input_representativity: bool,
    /// Every test could be sized for the reliability target.
    pub evt_safe: bool,
    /// Target reliability the tests were sized for.
    pub reliability_requirement: Option<f64>,
}

impl Default for SafetyRecord {
    fn default() -> Self {
        Self {
            input_representativity: false,
            evt_safe: true,
            reliability_requirement: None,
        }
    }
}

/// Minimum iteration counts the controller waits for before fitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinIterations {
    /// Minimum raw training samples (the approach's floor).
    pub train: usize,
    /// Minimum test samples (largest test floor, at least `train`).
    pub tests: usize,
    /// Minimum total samples so both sub-pools meet their floors.
    pub total: usize,
}

/// Mutable bookkeeping of the sampling controller, lent to the hooks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionState {
    /// Number of inputs whose inner loop has started.
    pub input_iteration: usize,
    /// Samples collected in the current inner loop.
    pub iteration: usize,
    /// Input currently being sampled.
    pub current_input: Option<InputId>,
    /// Current minimum iteration targets.
    pub min_iterations: MinIterations,
    /// Safety record of the run.
    pub safety: SafetyRecord,
}

/// One fit attempt as recorded in the run history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    /// Input analysed (`None` for a pooled Trace-Merge fit).
    pub input: Option<InputId>,
    /// Samples collected when the attempt was made.
    pub samples: usize,
    /// Minimum total target at the time of the attempt.
    pub min_total: usize,
    /// Rejection reason, `None` when accepted.
    pub reason: Option<RejectReason>,
}

impl Attempt {
    /// Whether the attempt was accepted.
    pub fn accepted(&self) -> bool {
        self.reason.is_none()
    }
}

/// Worst-case observed execution time at the moment a fit was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Watermark {
    /// Input of the accepted fit (`None` for a pooled fit).
    pub input: Option<InputId>,
    /// Largest sample in the whole pool, across all inputs.
    pub wcot: f64,
}

/// Parameters of one accepted estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateSummary {
    /// Inputs the estimate covers.
    pub inputs: Vec<InputId>,
    /// Fitted distribution.
    pub distribution: Distribution,
    /// Best, low and high rates of an exponential tail.
    pub rates: Option<[f64; 3]>,
    /// Threshold added back to quantiles.
    pub offset: f64,
}

/// pWCET at one exceedance probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PwcetPoint {
    /// Exceedance probability.
    pub exceedance: f64,
    /// Execution time exceeded with that probability.
    pub wcet: f64,
    /// Confidence bounds, when available.
    pub bounds: Option<(f64, f64)>,
}

/// Serializable summary of a finished sampling run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Approach used.
    pub approach: Option<ApproachKind>,
    /// Estimator name.
    pub estimator: Option<&'static str>,
    /// Merging policy.
    pub merge_policy: Option<MergePolicy>,
    /// Samples collected over the whole run.
    pub total_samples: usize,
    /// Accepted estimates.
    pub estimates: Vec<EstimateSummary>,
    /// Combined pWCET at a few standard exceedance probabilities.
    pub pwcet: Vec<PwcetPoint>,
    /// WCOT watermarks.
    pub watermarks: Vec<Watermark>,
    /// Every fit attempt in order.
    pub attempts: Vec<Attempt>,
    /// Final minimum iteration targets.
    pub min_iterations: MinIterations,
    /// Safety record.
    pub safety: SafetyRecord,
    /// Wall-clock duration of the run in seconds.
    pub runtime_secs: f64,
}

impl RunReport {
    /// Whether at least one estimate was accepted.
    pub fn has_estimate(&self) -> bool {
        !self.estimates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::Gpd;

    #[test]
    fn test_growth_reasons() {
        let growing: Vec<_> = [
            RejectReason::RejectSampleTest,
            RejectReason::FailEvtAppMinSampleSize,
            RejectReason::FailPostRunTestSampleSize,
            RejectReason::FailPostEvtTestSampleSize,
            RejectReason::RejectPostRunTest,
            RejectReason::FailEvtEstimator,
            RejectReason::RejectPostEvtTest,
            RejectReason::NoEnoughSamples,
        ]
        .into_iter()
        .filter(|r| r.triggers_growth())
        .collect();
        assert_eq!(growing.len(), 3);
        assert!(!RejectReason::FailEvtEstimator.triggers_growth());
        assert!(!RejectReason::FailEvtEstimator.is_statistical());
        assert!(RejectReason::RejectPostEvtTest.is_statistical());
    }

    #[test]
    fn test_outcome_accessors() {
        let d: Distribution = Gpd::exponential(1.0).unwrap().into();
        let accepted = AnalysisOutcome::Accepted(d);
        assert!(accepted.is_accepted());
        assert_eq!(accepted.distribution(), Some(&d));
        assert_eq!(accepted.reason(), None);

        let rejected = AnalysisOutcome::Rejected(RejectReason::NoEnoughSamples);
        assert!(!rejected.is_accepted());
        assert_eq!(rejected.reason(), Some(RejectReason::NoEnoughSamples));
    }

    #[test]
    fn test_reason_serializes_as_code() {
        let json = serde_json::to_string(&RejectReason::FailEvtAppMinSampleSize).unwrap();
        assert_eq!(json, "\"FAIL_EVT_APP_MIN_SAMPLE_SIZE\"");
        assert!(SafetyRecord::default().evt_safe);
    }
}
