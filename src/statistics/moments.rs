//! Sample moments and probability-weighted moments.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        None
    } else {
        Some(data.iter().sum::<f64>() / data.len() as f64)
    }
}

/// Unbiased sample standard deviation, `None` with fewer than two samples.
pub fn std_dev(data: &[f64]) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }
    let m = mean(data)?;
    let ss: f64 = data.iter().map(|x| (x - m).powi(2)).sum();
    Some((ss / (data.len() - 1) as f64).sqrt())
}

/// First three unbiased probability-weighted moments `b0, b1, b2`.
///
/// With the sample sorted ascending and `i` counted from zero:
///
/// ```text
/// b0 = mean(x)
/// b1 = sum(i * x_(i)) / (n (n - 1))
/// b2 = sum(i (i - 1) * x_(i)) / (n (n - 1) (n - 2))
/// ```
///
/// Returns `None` with fewer than three samples.
pub fn probability_weighted_moments(data: &[f64]) -> Option<[f64; 3]> {
    let n = data.len();
    if n < 3 {
        return None;
    }

    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));

    let nf = n as f64;
    let mut b0 = 0.0;
    let mut b1 = 0.0;
    let mut b2 = 0.0;
    for (i, &x) in sorted.iter().enumerate() {
        let i = i as f64;
        b0 += x;
        b1 += i * x;
        b2 += i * (i - 1.0) * x;
    }

    Some([
        b0 / nf,
        b1 / (nf * (nf - 1.0)),
        b2 / (nf * (nf - 1.0) * (nf - 2.0)),
    ])
}
