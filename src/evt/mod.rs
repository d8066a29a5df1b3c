//! Extreme-value approaches: extraction of the tail sample from raw pools.
//!
//! Every approach consumes a [`MeasuresPoolSet`] and produces
//! [`ExtractedPools`]: the training extremes handed to the estimator and the
//! test extremes used by the post-fit tests.

mod block_maxima;
mod cv;
mod pot;

pub use block_maxima::BlockMaxima;
pub use cv::CoefficientOfVariation;
pub use pot::{PeaksOverThreshold, Threshold};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InsufficientData;
use crate::measurement::{MeasuresPool, MeasuresPoolSet};

/// Tag identifying which approach produced a set of extremes.
///
/// Estimators are told this at configuration time so they can pick the
/// matching formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApproachKind {
    /// Block maxima, suited to GEV fitting.
    BlockMaxima,
    /// Threshold excesses, suited to GPD fitting.
    PeaksOverThreshold,
    /// Automatically selected exponential tail.
    CoefficientOfVariation,
}

impl fmt::Display for ApproachKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BlockMaxima => "block maxima",
            Self::PeaksOverThreshold => "peaks over threshold",
            Self::CoefficientOfVariation => "CV-automatic",
        };
        f.write_str(name)
    }
}

/// Output of an approach.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPools {
    /// Extremes the estimator is fitted on.
    pub training: MeasuresPool,
    /// Extremes the post-fit tests are run on.
    pub test: MeasuresPool,
    /// Threshold subtracted from the extremes, if any.
    pub threshold: Option<f64>,
    /// Number of blocks the training pool was reduced from.
    pub blocks: Option<usize>,
    /// Mean of the raw samples the tail was selected from.
    pub trace_mean: Option<f64>,
}

impl ExtractedPools {
    /// Extremes with no threshold, block count or trace mean attached.
    pub fn new(training: MeasuresPool, test: MeasuresPool) -> Self {
        Self {
            training,
            test,
            threshold: None,
            blocks: None,
            trace_mean: None,
        }
    }

    /// Use the same extremes for training and testing.
    pub fn from_extremes(extremes: MeasuresPool) -> Self {
        Self::new(extremes.clone(), extremes)
    }
}

/// Strategy extracting extremes from a raw sample pool.
pub trait EvtApproach {
    /// Tag passed to estimators.
    fn kind(&self) -> ApproachKind;

    /// Human-readable name.
    fn name(&self) -> &'static str;

    /// Minimum number of raw training samples the approach needs.
    fn minimal_sample_size(&self) -> usize;

    /// Extract training and test extremes.
    fn perform(&self, set: &MeasuresPoolSet) -> Result<ExtractedPools, InsufficientData>;
}

impl<A: EvtApproach + ?Sized> EvtApproach for Box<A> {
    fn kind(&self) -> ApproachKind {
        (**self).kind()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn minimal_sample_size(&self) -> usize {
        (**self).minimal_sample_size()
    }

    fn perform(&self, set: &MeasuresPoolSet) -> Result<ExtractedPools, InsufficientData> {
        (**self).perform(set)
    }
}
