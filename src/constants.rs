//! Numerical constants shared across the estimation pipeline.

/// Two-sided 95% standard normal critical value.
pub const Z_95: f64 = 1.96;

/// Minimum number of tail elements the CV-automatic approach accepts.
pub const MIN_TAIL_ELEMENTS: usize = 10;

/// Default number of points in a dense survival grid.
///
/// Values much larger than 10^6 lose resolution at very small
/// probabilities (around 1e-15) with `f64`.
pub const DEFAULT_RANK_LENGTH: usize = 90_000;

/// The dense grid spans `[0, RANK_SPAN_FACTOR * (max - min of tail)]`.
pub const RANK_SPAN_FACTOR: f64 = 20.0;

/// Default relative growth of the minimum iteration target after a
/// size-related rejection (20%).
pub const DEFAULT_GROWTH_FACTOR: f64 = 0.2;

/// Default fraction of samples reserved for the test sub-pool.
pub const DEFAULT_TEST_RESERVE: f64 = 0.2;

/// Slack applied before rounding a count scaled by a configured fraction,
/// so products such as `100 * 0.2` or `50 * 1.2` round to the exact integer
/// rather than one off.
pub const ROUNDING_SLACK: f64 = 1e-9;

/// Shape values with smaller magnitude are treated as exactly zero.
pub const SHAPE_EPSILON: f64 = 1e-8;
