//! Empirical quantiles using O(n) selection.

/// Compute a single quantile from a mutable slice.
///
/// Uses `select_nth_unstable_by()` for O(n) expected time. The slice is
/// partially reordered as a side effect.
///
/// # Arguments
///
/// * `data` - Mutable slice of measurements (will be partially reordered)
/// * `p` - Quantile probability in [0, 1]
///
/// # Returns
///
/// The R-7 (linear interpolation) quantile at `p`, or `None` if `data` is
/// empty or `p` is outside [0, 1].
pub fn compute_quantile(data: &mut [f64], p: f64) -> Option<f64> {
    if data.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }

    let n = data.len();
    if n == 1 {
        return Some(data[0]);
    }

    let h = (n - 1) as f64 * p;
    let h_floor = h.floor() as usize;
    let h_frac = h - h.floor();

    if h_floor >= n - 1 {
        let (_, &mut max, _) = data.select_nth_unstable_by(n - 1, |a, b| a.total_cmp(b));
        return Some(max);
    }

    let (_, &mut lower, upper) = data.select_nth_unstable_by(h_floor, |a, b| a.total_cmp(b));

    if h_frac == 0.0 {
        return Some(lower);
    }

    // Smallest element of the upper partition is the next order statistic
    let upper_min = upper
        .iter()
        .copied()
        .min_by(|a, b| a.total_cmp(b))
        .unwrap_or(lower);

    Some(lower + h_frac * (upper_min - lower))
}
