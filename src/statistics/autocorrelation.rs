//! Autocorrelation function (ACF) computation.
//!
//! Sample autocorrelations feed the Ljung–Box independence test, which
//! checks that execution-time samples behave like an i.i.d. sequence before
//! extreme-value theory is applied to them.

/// Compute the autocorrelation of a series at a given lag.
///
/// # Arguments
///
/// * `data` - Measurements in arrival order
/// * `lag` - Lag at which to compute the coefficient
///
/// # Returns
///
/// The coefficient in [-1, 1], or 0.0 if the series has at most `lag`
/// elements or zero variance.
///
/// # Formula
///
/// ```text
/// r_k = sum((x_t - mean) * (x_{t+k} - mean)) / sum((x_t - mean)^2)
/// ```
pub fn lag_autocorrelation(data: &[f64], lag: usize) -> f64 {
    let n = data.len();
    if n <= lag {
        return 0.0;
    }

    let mean: f64 = data.iter().sum::<f64>() / n as f64;
    let variance: f64 = data.iter().map(|&x| (x - mean).powi(2)).sum();
    if variance == 0.0 {
        return 0.0;
    }

    autocovariance_sum(data, mean, lag) / variance
}

/// Compute autocorrelation coefficients for lags `1..=max_lag`.
///
/// The mean and variance are computed once and shared by every lag.
pub fn autocorrelation_function(data: &[f64], max_lag: usize) -> Vec<f64> {
    let n = data.len();
    if n == 0 {
        return vec![0.0; max_lag];
    }

    let mean: f64 = data.iter().sum::<f64>() / n as f64;
    let variance: f64 = data.iter().map(|&x| (x - mean).powi(2)).sum();

    (1..=max_lag)
        .map(|lag| {
            if variance == 0.0 || n <= lag {
                0.0
            } else {
                autocovariance_sum(data, mean, lag) / variance
            }
        })
        .collect()
}

fn autocovariance_sum(data: &[f64], mean: f64, lag: usize) -> f64 {
    data.iter()
        .zip(&data[lag..])
        .map(|(&a, &b)| (a - mean) * (b - mean))
        .sum()
}
