//! Statistical acceptance tests.
//!
//! Tests gate the pipeline at three points: on the raw pool (sample and
//! representativity tests), on the extracted extremes (post-run tests) and
//! on the test extremes against the fitted distribution (post-EVT tests).

mod kolmogorov_smirnov;
mod ljung_box;

pub use kolmogorov_smirnov::KolmogorovSmirnov;
pub use ljung_box::LjungBox;

use serde::Serialize;

use crate::distribution::Distribution;
use crate::error::TestError;
use crate::measurement::MeasuresPool;

/// Outcome of one test run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestReport {
    /// Test name.
    pub name: &'static str,
    /// Test statistic.
    pub statistic: f64,
    /// p-value of the statistic under the null hypothesis.
    pub p_value: f64,
    /// Significance level.
    pub alpha: f64,
    /// Whether the null hypothesis is rejected (`p_value < alpha`).
    pub reject: bool,
}

impl TestReport {
    fn new(name: &'static str, statistic: f64, p_value: f64, alpha: f64) -> Self {
        Self {
            name,
            statistic,
            p_value,
            alpha,
            reject: p_value < alpha,
        }
    }
}

/// A hypothesis test over a sample pool.
pub trait StatisticalTest {
    /// Test name.
    fn name(&self) -> &'static str;

    /// Run the test. Goodness-of-fit tests need `reference`.
    fn run(&self, pool: &MeasuresPool, reference: Option<&Distribution>) -> Result<TestReport, TestError>;

    /// Smallest pool the test accepts.
    fn minimal_sample_size(&self) -> usize;

    /// Pool size needed to reach `power`, if the test supports power sizing.
    fn minimal_sample_size_for_power(&self, _power: f64) -> Option<usize> {
        None
    }

    /// Whether power-based sizing is available.
    fn has_power(&self) -> bool {
        self.minimal_sample_size_for_power(0.9).is_some()
    }

    /// Whether the test compares against a fitted distribution.
    fn requires_reference(&self) -> bool {
        false
    }
}

impl<T: StatisticalTest + ?Sized> StatisticalTest for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn run(&self, pool: &MeasuresPool, reference: Option<&Distribution>) -> Result<TestReport, TestError> {
        (**self).run(pool, reference)
    }

    fn minimal_sample_size(&self) -> usize {
        (**self).minimal_sample_size()
    }

    fn minimal_sample_size_for_power(&self, power: f64) -> Option<usize> {
        (**self).minimal_sample_size_for_power(power)
    }

    fn has_power(&self) -> bool {
        (**self).has_power()
    }

    fn requires_reference(&self) -> bool {
        (**self).requires_reference()
    }
}

fn check_size(available: usize, required: usize) -> Result<(), TestError> {
    if available < required {
        Err(TestError::TooFewSamples {
            available,
            required,
        })
    } else {
        Ok(())
    }
}
