//! One-sample Kolmogorov–Smirnov goodness-of-fit test.

use crate::distribution::Distribution;
use crate::error::TestError;
use crate::measurement::MeasuresPool;

use super::{check_size, StatisticalTest, TestReport};

const MIN_SAMPLES: usize = 20;

/// Two-sided test of the test extremes against the fitted distribution.
///
/// The p-value uses the asymptotic Kolmogorov distribution with Stephens'
/// small-sample correction `λ = (√n + 0.12 + 0.11/√n) D`. Power sizing uses
/// the DKW bound for a minimum detectable sup-distance `d`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KolmogorovSmirnov {
    alpha: f64,
    distance: f64,
}

impl KolmogorovSmirnov {
    /// Create a test at significance `alpha` with detectable distance 0.1.
    pub fn new(alpha: f64) -> Self {
        Self { alpha, distance: 0.1 }
    }

    /// Set the minimum detectable distance used for power sizing.
    pub fn detectable_distance(mut self, d: f64) -> Self {
        self.distance = d;
        self
    }

    /// Sup-distance between the empirical CDF of `data` and `cdf`.
    pub fn statistic(data: &[f64], cdf: impl Fn(f64) -> f64) -> f64 {
        let mut sorted = data.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let n = sorted.len() as f64;

        sorted
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let f = cdf(x);
                let above = (i + 1) as f64 / n - f;
                let below = f - i as f64 / n;
                above.max(below)
            })
            .fold(0.0, f64::max)
    }
}

impl Default for KolmogorovSmirnov {
    fn default() -> Self {
        Self::new(0.05)
    }
}

/// Survival of the Kolmogorov distribution, `P(K > z)`.
fn kolmogorov_survival(z: f64) -> f64 {
    if z <= 0.0 {
        return 1.0;
    }
    if z < 1.18 {
        let y = (-std::f64::consts::PI.powi(2) / (8.0 * z * z)).exp();
        let cdf = (2.0 * std::f64::consts::PI).sqrt() / z * (y + y.powi(9) + y.powi(25) + y.powi(49));
        (1.0 - cdf).clamp(0.0, 1.0)
    } else {
        let x = (-2.0 * z * z).exp();
        (2.0 * (x - x.powi(4) + x.powi(9))).clamp(0.0, 1.0)
    }
}

impl StatisticalTest for KolmogorovSmirnov {
    fn name(&self) -> &'static str {
        "Kolmogorov-Smirnov"
    }

    fn run(&self, pool: &MeasuresPool, reference: Option<&Distribution>) -> Result<TestReport, TestError> {
        let reference = reference.ok_or(TestError::MissingReference)?;
        check_size(pool.len(), self.minimal_sample_size())?;

        let data = pool.values();
        if data.iter().any(|x| !x.is_finite()) {
            return Err(TestError::Undefined("non-finite sample"));
        }
        let d = Self::statistic(&data, |x| reference.cdf(x));
        let sqrt_n = (data.len() as f64).sqrt();
        let lambda = (sqrt_n + 0.12 + 0.11 / sqrt_n) * d;

        Ok(TestReport::new(self.name(), d, kolmogorov_survival(lambda), self.alpha))
    }

    fn minimal_sample_size(&self) -> usize {
        MIN_SAMPLES
    }

    fn minimal_sample_size_for_power(&self, power: f64) -> Option<usize> {
        if !(power > 0.0 && power < 1.0 && self.distance > 0.0) {
            return None;
        }
        let c_alpha = (-(self.alpha / 2.0).ln() / 2.0).sqrt();
        let c_beta = (-((1.0 - power) / 2.0).ln() / 2.0).sqrt();
        let n = ((c_alpha + c_beta) / self.distance).powi(2).ceil() as usize;
        Some(n.max(MIN_SAMPLES))
    }

    fn requires_reference(&self) -> bool {
        true
    }
}
