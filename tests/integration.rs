//! End-to-end runs over whole traces.

use std::io::Write;
use std::path::PathBuf;

use pwcet_oracle::output::{format_report, to_json};
use pwcet_oracle::{
    analyze, read_trace, ApproachKind, Gpd, KolmogorovSmirnov, LjungBox, PeaksOverThreshold, PwmEstimator,
    QueryError, RejectReason, SamplingController, SyntheticTrace,
};

fn reference_trace() -> Vec<f64> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/gpd_0_1_0.txt");
    read_trace(path).unwrap()
}

/// Smoke test of the one-call entry point.
#[test]
fn analyze_exponential_trace() {
    let trace = reference_trace();
    let controller = analyze(&trace).unwrap();

    assert_eq!(controller.pool().len(), 200);
    assert_eq!(controller.attempts().len(), 1);
    assert!(controller.attempts()[0].accepted());
    assert_eq!(controller.estimates().len(), 1);

    let estimate = &controller.estimates()[0];
    assert_eq!(estimate.distribution.family(), "GPD");
    assert!(estimate.tail.is_some());

    let max = trace.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(controller.watermarks()[0].wcot, max);

    let w6 = controller.wcet_at(1.0 - 1e-6).unwrap();
    let w9 = controller.wcet_at(1.0 - 1e-9).unwrap();
    assert!(w9 >= w6);
    assert!(w6 > controller.wcet_at(0.9).unwrap());
    assert!(controller.exceedance_at(w9 + 1.0).unwrap() <= 1e-9);
    assert_eq!(controller.wcet_at(1.0), Err(QueryError::InvalidProbability(1.0)));
}

#[test]
fn analyze_reads_trace_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for x in reference_trace() {
        writeln!(file, "{}", x).unwrap();
    }
    let trace = read_trace(file.path()).unwrap();
    let from_file = analyze(&trace).unwrap();
    let direct = analyze(&reference_trace()).unwrap();
    assert_eq!(
        from_file.wcet_at(1.0 - 1e-9).unwrap(),
        direct.wcet_at(1.0 - 1e-9).unwrap()
    );
}

#[test]
fn short_trace_is_not_enough_samples() {
    let trace = reference_trace();
    let controller = analyze(&trace[..50]).unwrap();

    assert!(controller.estimates().is_empty());
    assert_eq!(controller.attempts()[0].reason, Some(RejectReason::NoEnoughSamples));
    assert!(!controller.safety().input_representativity);
    assert_eq!(controller.wcet_at(0.99), Err(QueryError::NoEstimate));

    let text = format_report(&controller.report());
    assert!(text.contains("No distribution accepted"));
}

/// PoT with a quantile threshold, PWM and a goodness-of-fit check on the
/// held-out excesses.
#[test]
fn peaks_over_threshold_with_goodness_of_fit() {
    let gpd = Gpd::new(100.0, 2.0, -0.1).unwrap();
    let trace = SyntheticTrace::new(gpd, 11).samples(5_000);

    let mut controller = SamplingController::new()
        .approach(PeaksOverThreshold::at_quantile(0.9))
        .estimator(PwmEstimator::new())
        .sample_test(LjungBox::default())
        .post_evt_test(KolmogorovSmirnov::new(0.01));
    controller.analyze_trace(&trace).unwrap();

    assert_eq!(controller.attempts().len(), 1);
    assert_eq!(controller.attempts()[0].reason, None);

    let estimate = &controller.estimates()[0];
    assert_eq!(estimate.distribution.family(), "GPD");
    // The threshold sits around the 0.9 quantile of the generating model
    let u = gpd.quantile(0.9).unwrap();
    assert!((estimate.offset - u).abs() < 0.5, "offset={} u={}", estimate.offset, u);

    // Queries are expressed in execution time, above the threshold
    let w = controller.wcet_at(1.0 - 1e-9).unwrap();
    assert!(w > estimate.offset);
    assert!(w >= controller.watermarks()[0].wcot);
}

#[test]
fn report_serializes_accepted_run() {
    let controller = analyze(&reference_trace()).unwrap();
    let report = controller.report();

    assert!(report.has_estimate());
    assert_eq!(report.approach, Some(ApproachKind::CoefficientOfVariation));
    assert_eq!(report.estimator, Some("CV rate"));
    assert_eq!(report.total_samples, 200);
    assert_eq!(report.pwcet.len(), 4);
    for point in &report.pwcet {
        let (low, high) = point.bounds.unwrap();
        assert!(low <= point.wcet && point.wcet <= high);
    }

    // Offset plus the serialised distribution reproduces the queries
    let summary = &report.estimates[0];
    let implied = summary.offset + summary.distribution.quantile(0.5).unwrap();
    let median = controller.wcet_at(0.5).unwrap();
    assert!((implied - median).abs() < 1e-2, "implied={} median={}", implied, median);

    let json = to_json(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["approach"], "CoefficientOfVariation");
    assert_eq!(value["total_samples"], 200);
    assert_eq!(value["attempts"][0]["reason"], serde_json::Value::Null);

    let text = format_report(&report);
    assert!(text.contains("pWCET distribution accepted"));
    assert!(text.contains("P(exceed) = 1e-9"));
}
