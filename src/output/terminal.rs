//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::result::{Attempt, RunReport, SafetyRecord};

/// Format a RunReport for human-readable terminal output.
pub fn format_report(report: &RunReport) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);

    output.push_str("pwcet-oracle\n");
    output.push_str(&sep);
    output.push('\n');
    output.push('\n');

    let approach = report.approach.map_or_else(|| "-".to_string(), |kind| kind.to_string());
    output.push_str(&format!(
        "  Approach: {}, estimator: {}\n",
        approach,
        report.estimator.unwrap_or("-")
    ));
    output.push_str(&format!(
        "  Samples: {} (minimum {} total, {} train, {} test)\n",
        report.total_samples,
        report.min_iterations.total,
        report.min_iterations.train,
        report.min_iterations.tests
    ));
    output.push_str(&format!("  Safety: {}\n", format_safety(&report.safety)));
    output.push('\n');

    if !report.has_estimate() {
        output.push_str(&format!("  {}\n\n", "\u{26A0} No distribution accepted".yellow().bold()));
        if let Some(last) = report.attempts.last() {
            output.push_str(&format!("    Last attempt: {}\n", format_attempt(last)));
        }
        output.push('\n');
        output.push_str(&sep);
        output.push('\n');
        return output;
    }

    output.push_str(&format!("  {}\n\n", "\u{2713} pWCET distribution accepted".green().bold()));
    for estimate in &report.estimates {
        let inputs: Vec<String> = estimate.inputs.iter().map(|id| id.to_string()).collect();
        let d = &estimate.distribution;
        output.push_str(&format!(
            "    {} [{}]: location {:.4}, scale {:.4}, shape {:.4}\n",
            d.family(),
            inputs.join(", "),
            d.location() + estimate.offset,
            d.scale(),
            d.shape()
        ));
        if let Some([rate, low, high]) = estimate.rates {
            output.push_str(&format!(
                "      rate {:.6} (95%: {:.6}\u{2013}{:.6})\n",
                rate, high, low
            ));
        }
    }

    if !report.pwcet.is_empty() {
        output.push('\n');
        output.push_str("    pWCET:\n");
        for point in &report.pwcet {
            match point.bounds {
                Some((low, high)) => output.push_str(&format!(
                    "      P(exceed) = {:.0e}:  {:.4}  ({:.4}\u{2013}{:.4})\n",
                    point.exceedance, point.wcet, low, high
                )),
                None => output.push_str(&format!(
                    "      P(exceed) = {:.0e}:  {:.4}\n",
                    point.exceedance, point.wcet
                )),
            }
        }
    }

    if !report.watermarks.is_empty() {
        output.push('\n');
        let wcot = report.watermarks.iter().map(|w| w.wcot).fold(f64::NEG_INFINITY, f64::max);
        output.push_str(&format!("    Worst observed: {:.4}\n", wcot));
    }

    output.push('\n');
    output.push_str(&sep);
    output.push('\n');
    output.push_str(&format!(
        "{} attempt(s), {:.2}s\n",
        report.attempts.len(),
        report.runtime_secs
    ));

    output
}

fn format_safety(safety: &SafetyRecord) -> String {
    let representativity = if safety.input_representativity {
        "inputs representative".green().to_string()
    } else {
        "inputs not shown representative".yellow().to_string()
    };
    let evt = if safety.evt_safe {
        "EVT-safe".green().to_string()
    } else {
        "not EVT-safe".red().to_string()
    };
    match safety.reliability_requirement {
        Some(r) => format!("{}, {} (reliability {})", representativity, evt, r),
        None => format!("{}, {}", representativity, evt),
    }
}

fn format_attempt(attempt: &Attempt) -> String {
    match attempt.reason {
        None => "accepted".green().to_string(),
        Some(reason) => format!(
            "{} at {} samples (target {})",
            reason.to_string().red(),
            attempt.samples,
            attempt.min_total
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::Gev;
    use crate::evt::ApproachKind;
    use crate::result::{EstimateSummary, MinIterations, PwcetPoint, RejectReason, Watermark};
    use crate::types::{InputId, MergePolicy};

    fn make_report(accepted: bool) -> RunReport {
        RunReport {
            approach: Some(ApproachKind::BlockMaxima),
            estimator: Some("PWM"),
            merge_policy: Some(MergePolicy::Envelope),
            total_samples: 500,
            estimates: if accepted {
                vec![EstimateSummary {
                    inputs: vec![InputId(0)],
                    distribution: Gev::new(10.0, 1.0, -0.2).unwrap().into(),
                    rates: None,
                    offset: 0.0,
                }]
            } else {
                Vec::new()
            },
            pwcet: if accepted {
                vec![PwcetPoint {
                    exceedance: 1e-9,
                    wcet: 14.9,
                    bounds: None,
                }]
            } else {
                Vec::new()
            },
            watermarks: vec![Watermark {
                input: Some(InputId(0)),
                wcot: 13.5,
            }],
            attempts: vec![Attempt {
                input: Some(InputId(0)),
                samples: 500,
                min_total: 600,
                reason: if accepted {
                    None
                } else {
                    Some(RejectReason::NoEnoughSamples)
                },
            }],
            min_iterations: MinIterations {
                train: 10,
                tests: 10,
                total: 50,
            },
            safety: SafetyRecord::default(),
            runtime_secs: 0.25,
        }
    }

    #[test]
    fn test_format_accepted_report() {
        let output = format_report(&make_report(true));
        assert!(output.contains("pwcet-oracle"));
        assert!(output.contains("pWCET distribution accepted"));
        assert!(output.contains("GEV [#0]"));
        assert!(output.contains("1e-9"));
        assert!(output.contains("Worst observed: 13.5000"));
    }

    #[test]
    fn test_format_rejected_report() {
        let output = format_report(&make_report(false));
        assert!(output.contains("No distribution accepted"));
        assert!(output.contains("not enough samples"));
    }
}
