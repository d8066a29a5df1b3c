//! JSON serialization for run reports.

use crate::result::RunReport;

/// Serialize a RunReport to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (non-finite numbers are written
/// as `null` by serde_json, so this should not happen).
pub fn to_json(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string(report)
}

/// Serialize a RunReport to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_pretty(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::Gpd;
    use crate::evt::ApproachKind;
    use crate::result::{Attempt, EstimateSummary, MinIterations, RejectReason, SafetyRecord};
    use crate::types::{InputId, MergePolicy};

    fn make_report() -> RunReport {
        RunReport {
            approach: Some(ApproachKind::PeaksOverThreshold),
            estimator: Some("MLE"),
            merge_policy: Some(MergePolicy::TraceMerge),
            total_samples: 1000,
            estimates: vec![EstimateSummary {
                inputs: vec![InputId(0), InputId(1)],
                distribution: Gpd::new(0.0, 2.5, -0.1).unwrap().into(),
                rates: None,
                offset: 100.0,
            }],
            pwcet: Vec::new(),
            watermarks: Vec::new(),
            attempts: vec![
                Attempt {
                    input: None,
                    samples: 500,
                    min_total: 500,
                    reason: Some(RejectReason::FailEvtAppMinSampleSize),
                },
                Attempt {
                    input: None,
                    samples: 1000,
                    min_total: 600,
                    reason: None,
                },
            ],
            min_iterations: MinIterations {
                train: 100,
                tests: 100,
                total: 600,
            },
            safety: SafetyRecord::default(),
            runtime_secs: 0.5,
        }
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&make_report()).unwrap();
        assert!(json.contains("\"family\":\"gpd\""));
        assert!(json.contains("\"reason\":\"FAIL_EVT_APP_MIN_SAMPLE_SIZE\""));
        assert!(json.contains("\"merge_policy\":\"TraceMerge\""));
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json_pretty(&make_report()).unwrap();
        assert!(json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["min_iterations"]["total"], 600);
        assert_eq!(value["attempts"].as_array().unwrap().len(), 2);
    }
}
