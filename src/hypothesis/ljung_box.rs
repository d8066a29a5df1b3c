//! Ljung–Box portmanteau test for independence.

use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::distribution::Distribution;
use crate::error::TestError;
use crate::measurement::MeasuresPool;
use crate::statistics::autocorrelation_function;

use super::{check_size, StatisticalTest, TestReport};

/// Tests that the first `lags` autocorrelations are jointly zero.
///
/// ```text
/// Q = n (n + 2) sum_{k=1}^{h} r_k^2 / (n - k)   ~ χ²(h)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LjungBox {
    alpha: f64,
    lags: usize,
}

impl LjungBox {
    /// Create a test at significance `alpha` over `lags` lags (at least 1).
    pub fn new(alpha: f64, lags: usize) -> Self {
        Self {
            alpha,
            lags: lags.max(1),
        }
    }

    /// Compute the Q statistic of a series.
    pub fn statistic(&self, data: &[f64]) -> f64 {
        let n = data.len() as f64;
        let acf = autocorrelation_function(data, self.lags);
        let sum: f64 = acf
            .iter()
            .enumerate()
            .map(|(i, r)| r * r / (n - (i + 1) as f64))
            .sum();
        n * (n + 2.0) * sum
    }
}

impl Default for LjungBox {
    fn default() -> Self {
        Self::new(0.01, 10)
    }
}

impl StatisticalTest for LjungBox {
    fn name(&self) -> &'static str {
        "Ljung-Box"
    }

    fn run(&self, pool: &MeasuresPool, _reference: Option<&Distribution>) -> Result<TestReport, TestError> {
        check_size(pool.len(), self.minimal_sample_size())?;
        let data = pool.values();
        if data.iter().any(|x| !x.is_finite()) {
            return Err(TestError::Undefined("non-finite sample"));
        }

        let q = self.statistic(&data);
        let chi2 = ChiSquared::new(self.lags as f64).map_err(|_| TestError::Undefined("degrees of freedom"))?;
        let p_value = chi2.sf(q);
        Ok(TestReport::new(self.name(), q, p_value, self.alpha))
    }

    fn minimal_sample_size(&self) -> usize {
        self.lags + 1
    }
}
