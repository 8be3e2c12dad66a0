//! Relative Strength Index — rolling-mean flavor.
//!
//! Average gain and loss are plain rolling means over `period`, not
//! Wilder's recursion, so the value is defined from index `period` (the
//! first delta consumes one row). A small guard on the loss term keeps
//! flat series defined: all-flat closes yield RSI 0.

use super::rolling::rolling_mean;

/// Guard against division by zero on loss-free windows.
const RSI_EPSILON: f64 = 1e-12;

/// RSI over `period` close-to-close deltas.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut gains = vec![f64::NAN; n];
    let mut losses = vec![f64::NAN; n];

    for i in 1..n {
        let delta = closes[i] - closes[i - 1];
        if delta.is_nan() {
            continue;
        }
        gains[i] = delta.max(0.0);
        losses[i] = (-delta).max(0.0);
    }

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    (0..n)
        .map(|i| {
            let gain = avg_gain[i];
            let loss = avg_loss[i];
            if gain.is_nan() || loss.is_nan() {
                return f64::NAN;
            }
            let rs = gain / (loss + RSI_EPSILON);
            100.0 - 100.0 / (1.0 + rs)
        })
        .collect()
}
