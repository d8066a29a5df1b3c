//! Error types.
//!
//! Only [`ConfigError`] aborts a sampling run. Every other failure inside the
//! fit-and-test pipeline is turned into an [`crate::RejectReason`] and kept as
//! data in the run's attempt history.

use std::path::PathBuf;

use thiserror::Error;

use crate::evt::ApproachKind;

/// Invalid or incomplete controller setup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// No input source was configured.
    #[error("no input source configured")]
    MissingInputSource,

    /// No extreme-value approach was configured.
    #[error("no extreme-value approach configured")]
    MissingApproach,

    /// No estimator was configured.
    #[error("no estimator configured")]
    MissingEstimator,

    /// No merging policy was configured.
    #[error("no merging policy configured")]
    MissingMergePolicy,

    /// The configure hook asked the controller to decide but no
    /// representativity test is registered.
    #[error("adaptive input stop requested with no representativity tests configured")]
    NoRepresentativityTests,

    /// Test reserve outside the open unit interval.
    #[error("samples_test_reserve must lie in (0, 1), got {0}")]
    InvalidTestReserve(f64),

    /// Growth factor not strictly positive.
    #[error("growth factor must be positive, got {0}")]
    InvalidGrowthFactor(f64),

    /// Reliability requirement outside the open unit interval.
    #[error("reliability requirement must lie in (0, 1), got {0}")]
    InvalidReliability(f64),

    /// Dense grid needs at least two points.
    #[error("rank length must be at least 2, got {0}")]
    InvalidRankLength(usize),

    /// A test that needs a fitted reference was registered where no
    /// distribution is available.
    #[error("test `{0}` requires a reference distribution and cannot check raw samples")]
    ReferenceRequired(&'static str),

    /// The estimator cannot consume what the approach produces.
    #[error("estimator `{estimator}` cannot fit the output of {approach}")]
    IncompatibleEstimator {
        /// Estimator name.
        estimator: &'static str,
        /// Approach that was configured.
        approach: ApproachKind,
    },
}

/// Failure of a distribution estimator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimatorError {
    /// `run` was called before a source approach was designated.
    #[error("no source approach designated")]
    NoSourceApproach,

    /// The estimator has no formula for this approach's output.
    #[error("unsupported source approach: {0}")]
    UnsupportedApproach(ApproachKind),

    /// `result` was called before a successful `run`.
    #[error("estimator has not been run")]
    NotRun,

    /// Too few training extremes.
    #[error("insufficient samples: {available} available, {required} required")]
    InsufficientSamples {
        /// Samples supplied.
        available: usize,
        /// Minimum the estimator needs.
        required: usize,
    },

    /// Moments or likelihood are degenerate.
    #[error("degenerate fit: {0}")]
    Degenerate(String),

    /// The numerical optimizer ran out of iterations.
    #[error("optimizer did not converge after {iterations} iterations")]
    NotConverged {
        /// Iterations performed.
        iterations: usize,
    },

    /// The fitted parameters do not form a valid distribution.
    #[error("fitted parameters are invalid: {0}")]
    InvalidParameters(#[from] DistributionError),
}

/// An extreme-value approach could not extract a usable tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient data: {available} samples available, {required} required")]
pub struct InsufficientData {
    /// Samples available.
    pub available: usize,
    /// Samples required.
    pub required: usize,
}

/// Failure to evaluate a statistical test.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TestError {
    /// Pool smaller than the test's minimal sample size.
    #[error("test needs {required} samples, got {available}")]
    TooFewSamples {
        /// Samples supplied.
        available: usize,
        /// Minimal sample size.
        required: usize,
    },

    /// Goodness-of-fit test invoked without a fitted distribution.
    #[error("test requires a reference distribution")]
    MissingReference,

    /// Statistic could not be computed (zero variance, NaN input).
    #[error("statistic is undefined: {0}")]
    Undefined(&'static str),
}

/// Invalid pWCET query.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QueryError {
    /// Probability outside the open unit interval.
    #[error("probability must lie in (0, 1), got {0}")]
    InvalidProbability(f64),

    /// No distribution has been accepted yet.
    #[error("no accepted estimate")]
    NoEstimate,
}

/// Invalid distribution parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DistributionError {
    /// Scale must be strictly positive and finite.
    #[error("scale must be positive and finite, got {0}")]
    InvalidScale(f64),

    /// Location must be finite, and non-negative for a GPD.
    #[error("invalid location {0}")]
    InvalidLocation(f64),

    /// Shape must be finite.
    #[error("shape must be finite, got {0}")]
    InvalidShape(f64),
}

/// Failure to read a sample trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The file could not be read.
    #[error("cannot read trace {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A token is not a finite number.
    #[error("line {line}: cannot parse `{token}` as a sample")]
    Parse {
        /// One-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
}

/// Top-level error of the public API.
#[derive(Debug, Error)]
pub enum Error {
    /// Controller misconfiguration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid query.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Trace ingestion failure.
    #[error(transparent)]
    Trace(#[from] TraceError),
}

/// Result alias over the top-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
