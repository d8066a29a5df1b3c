//! Main `SamplingController` entry point and builder.

use std::fmt;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::constants::ROUNDING_SLACK;
use crate::distribution::Distribution;
use crate::error::{ConfigError, EstimatorError, QueryError, TestError};
use crate::estimator::Estimator;
use crate::evt::EvtApproach;
use crate::hypothesis::StatisticalTest;
use crate::measurement::{InputSource, MeasuresPool, MeasuresPoolSet, SingleInput};
use crate::pwcet::{Pwcet, PwcetEstimate};
use crate::result::{
    AnalysisOutcome, Attempt, EstimateSummary, ExecutionState, MinIterations, PwcetPoint, RejectReason, RunReport,
    SafetyRecord, Watermark,
};
use crate::types::{HookStatus, InputId, MergePolicy, Sample};

/// Exceedance probabilities tabulated in run reports.
const REPORT_EXCEEDANCES: [f64; 4] = [1e-3, 1e-6, 1e-9, 1e-12];

/// Drives sampling, extreme extraction, fitting and testing until a pWCET
/// distribution is accepted.
///
/// Use the builder methods to plug in the collaborators, then call
/// [`run`](Self::run) with the three hooks.
///
/// # Example
///
/// ```
/// use pwcet_oracle::{
///     BlockMaxima, HookStatus, InputId, MergePolicy, PwmEstimator, SamplingController, SingleInput,
/// };
///
/// let mut samples = (0..5_000u32).map(|i| 100.0 + ((i * 7919) % 1000) as f64 / 100.0);
/// let mut controller = SamplingController::new()
///     .input_source(SingleInput(InputId(0)))
///     .approach(BlockMaxima::new(20))
///     .estimator(PwmEstimator::new())
///     .merging(MergePolicy::Envelope);
///
/// controller
///     .run(
///         |state| if state.input_iteration == 0 { HookStatus::Continue } else { HookStatus::Stop },
///         |_input| samples.next(),
///         |_state| HookStatus::LetControllerDecide,
///     )
///     .unwrap();
/// assert!(!controller.attempts().is_empty());
/// ```
pub struct SamplingController {
    config: Config,
    source: Option<Box<dyn InputSource>>,
    approach: Option<Box<dyn EvtApproach>>,
    estimator: Option<Box<dyn Estimator>>,
    sample_tests: Vec<Box<dyn StatisticalTest>>,
    representativity_tests: Vec<Box<dyn StatisticalTest>>,
    post_run_tests: Vec<Box<dyn StatisticalTest>>,
    post_evt_tests: Vec<Box<dyn StatisticalTest>>,
    pool: MeasuresPool,
    state: ExecutionState,
    estimates: Vec<PwcetEstimate>,
    watermarks: Vec<Watermark>,
    attempts: Vec<Attempt>,
    runtime_secs: f64,
}

/// Verdict of a group of tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Passed,
    TooFewSamples,
    Rejected,
}

fn run_gate(
    stage: &'static str,
    tests: &[Box<dyn StatisticalTest>],
    pool: &MeasuresPool,
    reference: Option<&Distribution>,
) -> Gate {
    for test in tests {
        match test.run(pool, reference) {
            Ok(report) if report.reject => {
                debug!(stage, test = report.name, statistic = report.statistic, p_value = report.p_value, "test rejected");
                return Gate::Rejected;
            }
            Ok(_) => {}
            Err(TestError::TooFewSamples { available, required }) => {
                debug!(stage, test = test.name(), available, required, "test needs more samples");
                return Gate::TooFewSamples;
            }
            Err(err) => {
                warn!(stage, test = test.name(), error = %err, "test could not be evaluated, counting as rejection");
                return Gate::Rejected;
            }
        }
    }
    Gate::Passed
}

impl Default for SamplingController {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SamplingController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SamplingController")
            .field("config", &self.config)
            .field("approach", &self.approach.as_ref().map(|a| a.name()))
            .field("estimator", &self.estimator.as_ref().map(|e| e.name()))
            .field("tests", &self.test_count())
            .field("samples", &self.pool.len())
            .field("state", &self.state)
            .field("estimates", &self.estimates.len())
            .finish()
    }
}

impl SamplingController {
    /// Create with default configuration and no collaborators.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            source: None,
            approach: None,
            estimator: None,
            sample_tests: Vec::new(),
            representativity_tests: Vec::new(),
            post_run_tests: Vec::new(),
            post_evt_tests: Vec::new(),
            pool: MeasuresPool::new(),
            state: ExecutionState::default(),
            estimates: Vec::new(),
            watermarks: Vec::new(),
            attempts: Vec::new(),
            runtime_secs: 0.0,
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the input source.
    pub fn input_source(mut self, source: impl InputSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Set the extreme-value approach.
    pub fn approach(mut self, approach: impl EvtApproach + 'static) -> Self {
        self.approach = Some(Box::new(approach));
        self
    }

    /// Set the distribution estimator.
    pub fn estimator(mut self, estimator: impl Estimator + 'static) -> Self {
        self.estimator = Some(Box::new(estimator));
        self
    }

    /// Set the policy combining per-input estimates.
    pub fn merging(mut self, policy: MergePolicy) -> Self {
        self.config.merge_policy = Some(policy);
        self
    }

    /// Add a test run on the whole pool before every fit.
    pub fn sample_test(mut self, test: impl StatisticalTest + 'static) -> Self {
        self.sample_tests.push(Box::new(test));
        self
    }

    /// Add a test deciding when enough inputs have been sampled.
    pub fn representativity_test(mut self, test: impl StatisticalTest + 'static) -> Self {
        self.representativity_tests.push(Box::new(test));
        self
    }

    /// Add a test run on the training extremes.
    pub fn post_run_test(mut self, test: impl StatisticalTest + 'static) -> Self {
        self.post_run_tests.push(Box::new(test));
        self
    }

    /// Add a test run on the test extremes against the fitted distribution.
    pub fn post_evt_test(mut self, test: impl StatisticalTest + 'static) -> Self {
        self.post_evt_tests.push(Box::new(test));
        self
    }

    /// Set the fraction of each input's samples held out for testing.
    pub fn samples_test_reserve(mut self, reserve: f64) -> Self {
        self.config.samples_test_reserve = reserve;
        self
    }

    /// Set the growth of the minimum iteration target after a size rejection.
    pub fn growth_factor(mut self, factor: f64) -> Self {
        self.config.growth_factor = factor;
        self
    }

    /// Size the tests for a target reliability.
    pub fn reliability(mut self, reliability: f64) -> Self {
        self.config.reliability_requirement = Some(reliability);
        self
    }

    /// Set the number of points in the dense survival grid.
    pub fn rank_length(mut self, n: usize) -> Self {
        self.config.rank_length = n;
        self
    }

    /// Cap the samples collected for a single input.
    pub fn max_samples_per_input(mut self, n: usize) -> Self {
        self.config.max_samples_per_input = Some(n);
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the sampling loops.
    ///
    /// # Arguments
    ///
    /// * `configure` - Called once per input; decides whether to sample it
    /// * `measure` - Measures the target once for an input; `None` means no
    ///   more samples are available
    /// * `monitor` - Called after every sample; decides whether to keep
    ///   sampling the current input
    ///
    /// Only configuration problems are errors. Rejected fits are recorded in
    /// [`attempts`](Self::attempts) and the [`safety`](Self::safety) record.
    pub fn run<C, R, M>(&mut self, mut configure: C, mut measure: R, mut monitor: M) -> Result<(), ConfigError>
    where
        C: FnMut(&ExecutionState) -> HookStatus,
        R: FnMut(InputId) -> Option<f64>,
        M: FnMut(&ExecutionState) -> HookStatus,
    {
        let policy = self.prepare()?;
        let mut source = self.source.take().ok_or(ConfigError::MissingInputSource)?;

        let start = Instant::now();
        info!(
            approach = ?self.approach.as_ref().map(|a| a.kind()),
            estimator = ?self.estimator.as_ref().map(|e| e.name()),
            policy = ?policy,
            min_total = self.state.min_iterations.total,
            "sampling run started"
        );

        let result = self.drive(source.as_mut(), policy, &mut configure, &mut measure, &mut monitor);
        self.source = Some(source);
        self.runtime_secs = start.elapsed().as_secs_f64();

        info!(
            samples = self.pool.len(),
            attempts = self.attempts.len(),
            accepted = self.estimates.len(),
            representative = self.state.safety.input_representativity,
            runtime_secs = self.runtime_secs,
            "sampling run finished"
        );
        result
    }

    /// Analyse an in-memory trace as the samples of a single input.
    ///
    /// Installs a [`SingleInput`] source (and the Envelope policy when none is
    /// set) and feeds every value in order. The fit is attempted once the
    /// trace is exhausted.
    pub fn analyze_trace(&mut self, values: &[f64]) -> Result<(), ConfigError> {
        self.source = Some(Box::new(SingleInput(InputId::default())));
        if self.config.merge_policy.is_none() {
            self.config.merge_policy = Some(MergePolicy::Envelope);
        }
        let mut remaining = values.iter().copied();
        self.run(
            |state| {
                if state.input_iteration == 0 {
                    HookStatus::Continue
                } else {
                    HookStatus::Stop
                }
            },
            move |_| remaining.next(),
            |_| HookStatus::Continue,
        )
    }

    /// Bookkeeping of the last run.
    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    /// Safety record of the last run.
    pub fn safety(&self) -> &SafetyRecord {
        &self.state.safety
    }

    /// Samples collected in the last run.
    pub fn pool(&self) -> &MeasuresPool {
        &self.pool
    }

    /// Accepted estimates.
    pub fn estimates(&self) -> &[PwcetEstimate] {
        &self.estimates
    }

    /// Fit attempts in order.
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    /// Worst-case observed times recorded at each acceptance.
    pub fn watermarks(&self) -> &[Watermark] {
        &self.watermarks
    }

    /// Combined pWCET over the accepted estimates.
    pub fn pwcet(&self) -> Result<Pwcet<'_>, QueryError> {
        Pwcet::new(
            &self.estimates,
            self.config.merge_policy.unwrap_or(MergePolicy::Envelope),
        )
    }

    /// Execution time not exceeded with probability `p`.
    pub fn wcet_at(&self, p: f64) -> Result<f64, QueryError> {
        self.pwcet()?.quantile(p)
    }

    /// Probability of exceeding execution time `x`.
    pub fn exceedance_at(&self, x: f64) -> Result<f64, QueryError> {
        Ok(self.pwcet()?.survival(x))
    }

    /// Summary of the last run.
    pub fn report(&self) -> RunReport {
        let estimates = self
            .estimates
            .iter()
            .map(|e| EstimateSummary {
                inputs: e.inputs.clone(),
                distribution: e.distribution,
                rates: e.tail.as_ref().map(|t| [t.rate(), t.rate_low(), t.rate_high()]),
                offset: e.offset,
            })
            .collect();

        let pwcet = match self.pwcet() {
            Ok(pwcet) => {
                let has_bounds = self.estimates.iter().any(|e| e.tail.is_some());
                REPORT_EXCEEDANCES
                    .iter()
                    .filter_map(|&exceedance| {
                        let p = 1.0 - exceedance;
                        let wcet = pwcet.quantile(p).ok()?;
                        let bounds = if has_bounds {
                            Some((pwcet.quantile_low(p).ok()?, pwcet.quantile_high(p).ok()?))
                        } else {
                            None
                        };
                        Some(PwcetPoint {
                            exceedance,
                            wcet,
                            bounds,
                        })
                    })
                    .collect()
            }
            Err(_) => Vec::new(),
        };

        RunReport {
            approach: self.approach.as_ref().map(|a| a.kind()),
            estimator: self.estimator.as_ref().map(|e| e.name()),
            merge_policy: self.config.merge_policy,
            total_samples: self.pool.len(),
            estimates,
            pwcet,
            watermarks: self.watermarks.clone(),
            attempts: self.attempts.clone(),
            min_iterations: self.state.min_iterations,
            safety: self.state.safety,
            runtime_secs: self.runtime_secs,
        }
    }

    fn test_count(&self) -> usize {
        self.sample_tests.len() + self.representativity_tests.len() + self.post_run_tests.len() + self.post_evt_tests.len()
    }

    /// Validate the setup, configure the estimator and reset run state.
    fn prepare(&mut self) -> Result<MergePolicy, ConfigError> {
        if self.source.is_none() {
            return Err(ConfigError::MissingInputSource);
        }
        let approach = self.approach.as_deref().ok_or(ConfigError::MissingApproach)?;
        let estimator = self.estimator.as_deref_mut().ok_or(ConfigError::MissingEstimator)?;
        let policy = self.config.merge_policy.ok_or(ConfigError::MissingMergePolicy)?;
        self.config.validate()?;

        // Only post-EVT tests see a fitted distribution.
        if let Some(test) = self
            .sample_tests
            .iter()
            .chain(&self.representativity_tests)
            .chain(&self.post_run_tests)
            .find(|t| t.requires_reference())
        {
            return Err(ConfigError::ReferenceRequired(test.name()));
        }

        let kind = approach.kind();
        if !estimator.supports(kind) {
            return Err(ConfigError::IncompatibleEstimator {
                estimator: estimator.name(),
                approach: kind,
            });
        }
        estimator.configure(&self.config);
        estimator.set_source_approach(kind);
        let approach_min = approach.minimal_sample_size();

        self.pool = MeasuresPool::new();
        self.estimates.clear();
        self.watermarks.clear();
        self.attempts.clear();
        self.runtime_secs = 0.0;
        self.state = ExecutionState {
            safety: SafetyRecord {
                reliability_requirement: self.config.reliability_requirement,
                ..SafetyRecord::default()
            },
            ..ExecutionState::default()
        };
        self.state.min_iterations = self.min_iterations(approach_min);
        Ok(policy)
    }

    /// Minimum sample counts so that both sub-pools meet their floors.
    fn min_iterations(&mut self, train: usize) -> MinIterations {
        let tests: Vec<&dyn StatisticalTest> = self
            .sample_tests
            .iter()
            .chain(&self.representativity_tests)
            .chain(&self.post_run_tests)
            .chain(&self.post_evt_tests)
            .map(|t| &**t)
            .collect();

        let mut min_tests = tests.iter().map(|t| t.minimal_sample_size()).max().unwrap_or(0);
        if let Some(reliability) = self.config.reliability_requirement {
            let powered: Option<Vec<usize>> = tests
                .iter()
                .map(|t| t.minimal_sample_size_for_power(reliability))
                .collect();
            match powered {
                Some(sizes) => min_tests = sizes.into_iter().max().unwrap_or(0),
                None => {
                    let unsized_tests: Vec<&str> = tests.iter().filter(|t| !t.has_power()).map(|t| t.name()).collect();
                    warn!(reliability, tests = ?unsized_tests, "tests cannot be sized for the reliability target, result is not EVT-safe");
                    self.state.safety.evt_safe = false;
                }
            }
        }
        let min_tests = min_tests.max(train);

        let reserve = self.config.samples_test_reserve;
        let total = (min_tests as f64 / reserve).max(train as f64 / (1.0 - reserve));
        MinIterations {
            train,
            tests: min_tests,
            total: (total - ROUNDING_SLACK).ceil() as usize,
        }
    }

    fn drive<C, R, M>(
        &mut self,
        source: &mut dyn InputSource,
        policy: MergePolicy,
        configure: &mut C,
        measure: &mut R,
        monitor: &mut M,
    ) -> Result<(), ConfigError>
    where
        C: FnMut(&ExecutionState) -> HookStatus,
        R: FnMut(InputId) -> Option<f64>,
        M: FnMut(&ExecutionState) -> HookStatus,
    {
        while let Some(input) = source.next_input() {
            self.state.current_input = Some(input);
            match configure(&self.state) {
                HookStatus::Stop => {
                    self.state.safety.input_representativity = false;
                    break;
                }
                HookStatus::LetControllerDecide => {
                    if self.representativity_tests.is_empty() {
                        return Err(ConfigError::NoRepresentativityTests);
                    }
                    if self.inputs_representative() {
                        debug!(input_iteration = self.state.input_iteration, "representativity tests accepted");
                        self.state.safety.input_representativity = true;
                        break;
                    }
                }
                HookStatus::Continue => {}
            }

            self.state.input_iteration += 1;
            if !self.sample_input(input, policy, measure, monitor) {
                self.state.safety.input_representativity = false;
            }
        }

        if policy == MergePolicy::TraceMerge {
            let outcome = self.attempt(None, self.pool.len());
            if let AnalysisOutcome::Rejected(reason) = outcome {
                if reason.triggers_growth() {
                    self.grow(reason);
                }
                self.state.safety.input_representativity = false;
            }
        }
        Ok(())
    }

    fn inputs_representative(&self) -> bool {
        self.representativity_tests.iter().all(|test| match test.run(&self.pool, None) {
            Ok(report) => !report.reject,
            Err(err) => {
                debug!(test = test.name(), error = %err, "representativity test not evaluable yet");
                false
            }
        })
    }

    /// Inner loop over one input. Returns `false` when it ended without an
    /// accepted fit.
    fn sample_input<R, M>(&mut self, input: InputId, policy: MergePolicy, measure: &mut R, monitor: &mut M) -> bool
    where
        R: FnMut(InputId) -> Option<f64>,
        M: FnMut(&ExecutionState) -> HookStatus,
    {
        self.state.iteration = 0;
        loop {
            let capped = self
                .config
                .max_samples_per_input
                .is_some_and(|cap| self.state.iteration >= cap);
            let exhausted = capped
                || match measure(input) {
                    Some(time) => {
                        self.pool.push(Sample::new(input, time));
                        self.state.iteration += 1;
                        false
                    }
                    None => true,
                };

            let keep_going = !exhausted
                && match monitor(&self.state) {
                    HookStatus::Continue => true,
                    HookStatus::Stop => false,
                    HookStatus::LetControllerDecide => self.state.iteration < self.state.min_iterations.total,
                };
            if keep_going {
                continue;
            }
            if policy == MergePolicy::TraceMerge {
                return true;
            }

            match self.attempt(Some(input), self.state.iteration) {
                AnalysisOutcome::Accepted(_) => return true,
                AnalysisOutcome::Rejected(reason) if reason.triggers_growth() => {
                    self.grow(reason);
                    if exhausted {
                        return false;
                    }
                }
                AnalysisOutcome::Rejected(_) => return false,
            }
        }
    }

    /// Run the pipeline if enough samples exist and record the attempt.
    fn attempt(&mut self, input: Option<InputId>, samples: usize) -> AnalysisOutcome {
        let min_total = self.state.min_iterations.total;
        let outcome = if samples >= min_total {
            self.execute_analysis(input)
        } else {
            AnalysisOutcome::Rejected(RejectReason::NoEnoughSamples)
        };
        debug!(input = ?input, samples, min_total, reason = ?outcome.reason(), "fit attempt");
        self.attempts.push(Attempt {
            input,
            samples,
            min_total,
            reason: outcome.reason(),
        });
        outcome
    }

    fn grow(&mut self, reason: RejectReason) {
        let total = self.state.min_iterations.total;
        let grown = ((total as f64 * (1.0 + self.config.growth_factor)) - ROUNDING_SLACK).ceil() as usize;
        let grown = grown.max(total + 1);
        warn!(reason = %reason, from = total, to = grown, "growing minimum iteration target");
        self.state.min_iterations.total = grown;
    }

    /// Fit-and-test pipeline over the current pool.
    fn execute_analysis(&mut self, input: Option<InputId>) -> AnalysisOutcome {
        use RejectReason::*;

        let (Some(approach), Some(estimator)) = (self.approach.as_deref(), self.estimator.as_deref_mut()) else {
            return AnalysisOutcome::Rejected(FailEvtEstimator);
        };

        if run_gate("sample", &self.sample_tests, &self.pool, None) != Gate::Passed {
            return AnalysisOutcome::Rejected(RejectSampleTest);
        }

        let set = MeasuresPoolSet::split(&self.pool, self.config.samples_test_reserve, input);
        let extremes = match approach.perform(&set) {
            Ok(extremes) => extremes,
            Err(err) => {
                debug!(approach = approach.name(), error = %err, "extraction failed");
                return AnalysisOutcome::Rejected(FailEvtAppMinSampleSize);
            }
        };
        if extremes.training.len() < estimator.minimal_sample_size() {
            return AnalysisOutcome::Rejected(FailEvtAppMinSampleSize);
        }
        let test_len = extremes.test.len();
        if self.post_run_tests.iter().any(|t| test_len < t.minimal_sample_size()) {
            return AnalysisOutcome::Rejected(FailPostRunTestSampleSize);
        }
        if self.post_evt_tests.iter().any(|t| test_len < t.minimal_sample_size()) {
            return AnalysisOutcome::Rejected(FailPostEvtTestSampleSize);
        }

        match run_gate("post-run", &self.post_run_tests, &extremes.training, None) {
            Gate::Passed => {}
            Gate::TooFewSamples => return AnalysisOutcome::Rejected(FailPostRunTestSampleSize),
            Gate::Rejected => return AnalysisOutcome::Rejected(RejectPostRunTest),
        }

        let fitted = estimator.run(&extremes);
        let fit = match fitted.and_then(|()| estimator.result().cloned()) {
            Ok(fit) => fit,
            Err(EstimatorError::InsufficientSamples { .. }) => return AnalysisOutcome::Rejected(FailEvtAppMinSampleSize),
            Err(err) => {
                warn!(estimator = estimator.name(), error = %err, "estimator failed");
                return AnalysisOutcome::Rejected(FailEvtEstimator);
            }
        };

        match run_gate("post-EVT", &self.post_evt_tests, &extremes.test, Some(&fit.distribution)) {
            Gate::Passed => {}
            Gate::TooFewSamples => return AnalysisOutcome::Rejected(FailPostEvtTestSampleSize),
            Gate::Rejected => return AnalysisOutcome::Rejected(RejectPostEvtTest),
        }

        let distribution = fit.distribution;
        let inputs = match input {
            Some(id) => vec![id],
            None => self.pool.inputs(),
        };
        info!(
            input = ?input,
            family = distribution.family(),
            location = distribution.location(),
            scale = distribution.scale(),
            shape = distribution.shape(),
            extremes = extremes.training.len(),
            "distribution accepted"
        );
        self.estimates.push(PwcetEstimate::from_fit(
            inputs,
            fit,
            extremes.threshold.unwrap_or(0.0),
        ));
        if let Some(wcot) = self.pool.max() {
            self.watermarks.push(Watermark { input, wcot });
        }
        AnalysisOutcome::Accepted(distribution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::PwmEstimator;
    use crate::evt::BlockMaxima;
    use crate::hypothesis::{KolmogorovSmirnov, LjungBox};

    fn controller() -> SamplingController {
        SamplingController::new()
            .input_source(SingleInput(InputId(0)))
            .approach(BlockMaxima::new(5))
            .estimator(PwmEstimator::new())
            .merging(MergePolicy::Envelope)
    }

    #[test]
    fn test_min_iterations_from_approach() {
        let mut c = controller();
        c.prepare().unwrap();
        // train 10, tests floored at 10: max(10 / 0.2, 10 / 0.8) = 50
        assert_eq!(
            c.state().min_iterations,
            MinIterations {
                train: 10,
                tests: 10,
                total: 50
            }
        );
    }

    #[test]
    fn test_min_iterations_from_tests() {
        let mut c = controller().post_evt_test(KolmogorovSmirnov::new(0.05));
        c.prepare().unwrap();
        assert_eq!(c.state().min_iterations.tests, 20);
        assert_eq!(c.state().min_iterations.total, 100);
    }

    #[test]
    fn test_min_iterations_takes_larger_side() {
        // Training floor dominates: max(10 / 0.9, 10 / 0.1) = 100, where
        // 10 / (1 - 0.9) evaluates to 100.00000000000003
        let mut c = controller().samples_test_reserve(0.9);
        c.prepare().unwrap();
        assert_eq!(c.state().min_iterations.total, 100);

        // Test floor dominates: max(20 / 0.3, 10 / 0.7) = 66.7
        let mut c = controller()
            .samples_test_reserve(0.3)
            .post_evt_test(KolmogorovSmirnov::new(0.05));
        c.prepare().unwrap();
        assert_eq!(
            c.state().min_iterations,
            MinIterations {
                train: 10,
                tests: 20,
                total: 67
            }
        );
    }

    #[test]
    fn test_reliability_without_power_marks_unsafe() {
        let mut c = controller().sample_test(LjungBox::default()).reliability(0.9);
        c.prepare().unwrap();
        assert!(!c.safety().evt_safe);
        assert_eq!(c.safety().reliability_requirement, Some(0.9));

        let mut c = controller().post_evt_test(KolmogorovSmirnov::new(0.05)).reliability(0.9);
        c.prepare().unwrap();
        assert!(c.safety().evt_safe);
        let powered = KolmogorovSmirnov::new(0.05).minimal_sample_size_for_power(0.9).unwrap();
        assert_eq!(c.state().min_iterations.tests, powered);
    }

    #[test]
    fn test_growth_is_exact_and_monotone() {
        let mut c = controller().growth_factor(0.2);
        c.prepare().unwrap();
        c.grow(RejectReason::FailEvtAppMinSampleSize);
        assert_eq!(c.state().min_iterations.total, 60);
        c.grow(RejectReason::FailEvtAppMinSampleSize);
        assert_eq!(c.state().min_iterations.total, 72);

        let mut c = controller().growth_factor(0.001);
        c.prepare().unwrap();
        c.grow(RejectReason::FailPostEvtTestSampleSize);
        assert_eq!(c.state().min_iterations.total, 51);
    }
}
