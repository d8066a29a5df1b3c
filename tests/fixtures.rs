//! Parameter recovery on the reference samples in `tests/data/`.
//!
//! Each file holds samples drawn from a known GEV or GPD. Expected values of
//! the deterministic estimators are pinned; the tolerance of 0.5 on the
//! generating parameters is the acceptance criterion of the estimators.

use std::path::PathBuf;

use pwcet_oracle::{
    read_trace, ApproachKind, BlockMaxima, CoefficientOfVariation, CvRateEstimator, Distribution, Estimator,
    EvtApproach, InputId, InsufficientData, MeasuresPool, MeasuresPoolSet, MleEstimator, PeaksOverThreshold,
    PwmEstimator,
};

fn fixture(name: &str) -> Vec<f64> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name);
    read_trace(&path).unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e))
}

/// Whole trace as training data, nothing reserved.
fn whole(values: &[f64]) -> MeasuresPoolSet {
    let pool = MeasuresPool::from_values(InputId(0), values.iter().copied());
    MeasuresPoolSet::split(&pool, 0.0, None)
}

fn fit(approach: &dyn EvtApproach, estimator: &mut dyn Estimator, values: &[f64]) -> Distribution {
    let extremes = approach.perform(&whole(values)).unwrap();
    estimator.set_source_approach(approach.kind());
    estimator.run(&extremes).unwrap();
    estimator.result().unwrap().distribution
}

fn assert_params(d: &Distribution, expected: (f64, f64, f64), tol: (f64, f64, f64)) {
    let (loc, scale, shape) = expected;
    assert!(
        (d.location() - loc).abs() < tol.0,
        "location {} expected {}",
        d.location(),
        loc
    );
    assert!(
        (d.scale() - scale).abs() < tol.1,
        "scale {} expected {}",
        d.scale(),
        scale
    );
    assert!(
        (d.shape() - shape).abs() < tol.2,
        "shape {} expected {}",
        d.shape(),
        shape
    );
}

// ============================================================================
// Fixture files
// ============================================================================

#[test]
fn fixtures_have_expected_sizes() {
    assert_eq!(fixture("gpd_0_1_0.txt").len(), 200);
    assert_eq!(fixture("gpd_2_20_m1.txt").len(), 200);
    assert_eq!(fixture("gev_2_1_m05.txt").len(), 1000);
    assert_eq!(fixture("gev_1_05_02.txt").len(), 1000);
    assert_eq!(fixture("gev_13641_0462_m0116.txt").len(), 1584);
}

// ============================================================================
// Block Maxima + PWM
// ============================================================================

#[test]
fn pwm_gev_reference_fixture_exact() {
    let d = fit(&BlockMaxima::new(1), &mut PwmEstimator::new(), &fixture("gev_13641_0462_m0116.txt"));
    assert_eq!(d.family(), "GEV");
    assert_params(&d, (13.64075, 0.46261, -0.11659), (1e-3, 1e-3, 1e-3));
    assert_params(&d, (13.641, 0.462, -0.116), (1e-2, 1e-2, 1e-2));
}

#[test]
fn pwm_gev_negative_shape() {
    let d = fit(&BlockMaxima::new(1), &mut PwmEstimator::new(), &fixture("gev_2_1_m05.txt"));
    assert_params(&d, (2.012, 0.993, -0.506), (1e-2, 1e-2, 1e-2));
    assert_params(&d, (2.0, 1.0, -0.5), (0.5, 0.5, 0.5));
    assert!(d.shape() < 0.0);
}

#[test]
fn pwm_gev_positive_shape() {
    let d = fit(&BlockMaxima::new(1), &mut PwmEstimator::new(), &fixture("gev_1_05_02.txt"));
    assert_params(&d, (1.018, 0.501, 0.204), (1e-2, 1e-2, 1e-2));
    assert!(d.shape() > 0.0);
}

// ============================================================================
// Peaks over Threshold + PWM
// ============================================================================

#[test]
fn pwm_gpd_exponential() {
    let d = fit(&PeaksOverThreshold::new(0.0), &mut PwmEstimator::new(), &fixture("gpd_0_1_0.txt"));
    assert_eq!(d.family(), "GPD");
    // The corrected location falls below zero and is floored
    assert_eq!(d.location(), 0.0);
    assert_params(&d, (0.0, 1.126, -0.136), (1e-2, 1e-2, 1e-2));
    assert_params(&d, (0.0, 1.0, 0.0), (0.5, 0.5, 0.5));
}

#[test]
fn pwm_gpd_uniform_tail() {
    let d = fit(&PeaksOverThreshold::new(0.0), &mut PwmEstimator::new(), &fixture("gpd_2_20_m1.txt"));
    assert_params(&d, (2.114, 19.709, -0.965), (1e-2, 1e-2, 1e-2));
    assert_params(&d, (2.0, 20.0, -1.0), (0.5, 0.5, 0.5));
}

// ============================================================================
// MLE
// ============================================================================

#[test]
fn mle_gev_fixtures() {
    let cases = [
        ("gev_2_1_m05.txt", (2.012, 0.992, -0.504)),
        ("gev_1_05_02.txt", (1.022, 0.509, 0.190)),
        ("gev_13641_0462_m0116.txt", (13.643, 0.469, -0.127)),
    ];
    for (name, expected) in cases {
        let d = fit(&BlockMaxima::new(1), &mut MleEstimator::new(), &fixture(name));
        assert_eq!(d.family(), "GEV");
        assert_params(&d, expected, (0.05, 0.05, 0.05));
    }
}

#[test]
fn mle_gpd_fixtures() {
    let d = fit(&PeaksOverThreshold::new(0.0), &mut MleEstimator::new(), &fixture("gpd_0_1_0.txt"));
    assert_params(&d, (0.00387, 1.096, -0.111), (0.05, 0.05, 0.05));

    // Shape -1 is the boundary of the search: the fit spans the sample range
    let d = fit(&PeaksOverThreshold::new(0.0), &mut MleEstimator::new(), &fixture("gpd_2_20_m1.txt"));
    assert_params(&d, (2.159, 19.773, -1.0), (0.05, 0.05, 0.05));
    assert_params(&d, (2.0, 20.0, -1.0), (0.5, 0.5, 0.5));
}

// ============================================================================
// CV-automatic
// ============================================================================

#[test]
fn cv_exponential_fixture() {
    let values = fixture("gpd_0_1_0.txt");
    let approach = CoefficientOfVariation::new();
    let extremes = approach.perform(&whole(&values)).unwrap();
    assert_eq!(extremes.training.len(), 98);
    assert_eq!(extremes.training, extremes.test);

    let mut estimator = CvRateEstimator::new().rank_length(10_000);
    estimator.set_source_approach(ApproachKind::CoefficientOfVariation);
    estimator.run(&extremes).unwrap();
    let fit = estimator.result().unwrap();

    assert_params(&fit.distribution, (0.0, 1.0, 0.0), (0.5, 0.5, 0.5));
    assert!((fit.distribution.scale() - 0.905).abs() < 1e-2, "scale={}", fit.distribution.scale());

    let tail = fit.tail.as_ref().unwrap();
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert!((tail.max_observed().unwrap() - max).abs() < 1e-9);
    let q = tail.quantile(1.0 - 1e-6).unwrap();
    assert!(tail.quantile_low(1.0 - 1e-6).unwrap() <= q);
    assert!(tail.quantile_high(1.0 - 1e-6).unwrap() >= q);
}

#[test]
fn cv_rejects_short_traces() {
    let approach = CoefficientOfVariation::new();
    let values = fixture("gpd_0_1_0.txt");

    for n in [1, 5, 10] {
        assert_eq!(
            approach.perform(&whole(&values[..n])).unwrap_err(),
            InsufficientData {
                available: n,
                required: 11
            }
        );
    }
    // 22 samples: the scan stops at 9 tail elements
    let err = approach.perform(&whole(&values[..22])).unwrap_err();
    assert!(err.available < 10, "{:?}", err);
}
