//! Average True Range — a simple moving average of true range.
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|).
//! TR[0] has no previous close and falls back to high-low, so the ATR is
//! defined from index `period - 1`. The smoothing here is a plain SMA, not
//! Wilder's recursion.

use super::rolling::rolling_mean;
use crate::domain::Bar;

/// Compute the True Range series from bars.
///
/// TR[0] = high[0] - low[0] (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];

    if n == 0 {
        return tr;
    }

    tr[0] = bars[0].high - bars[0].low;

    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }

    tr
}

/// ATR over `period` bars.
pub fn atr(bars: &[Bar], period: usize) -> Vec<f64> {
    rolling_mean(&true_range(bars), period)
}
