//! Bollinger Bands — SMA midline with population-σ envelopes.

use super::rolling::{rolling_mean, rolling_std_pop};

/// The three Bollinger series, aligned to the input closes.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub mid: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Bands at `width` population standard deviations around the SMA midline.
pub fn bollinger(closes: &[f64], period: usize, width: f64) -> BollingerBands {
    let mid = rolling_mean(closes, period);
    let sd = rolling_std_pop(closes, period);
    let upper = mid
        .iter()
        .zip(&sd)
        .map(|(m, s)| m + width * s)
        .collect();
    let lower = mid
        .iter()
        .zip(&sd)
        .map(|(m, s)| m - width * s)
        .collect();
    BollingerBands { upper, mid, lower }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn bands_straddle_the_midline() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0];
        let bands = bollinger(&closes, 3, 2.0);

        assert!(bands.mid[1].is_nan());
        assert_approx(bands.mid[2], 2.0, DEFAULT_EPSILON);
        // population σ of [1,2,3] = sqrt(2/3)
        let sd = (2.0f64 / 3.0).sqrt();
        assert_approx(bands.upper[2], 2.0 + 2.0 * sd, DEFAULT_EPSILON);
        assert_approx(bands.lower[2], 2.0 - 2.0 * sd, DEFAULT_EPSILON);
    }

    #[test]
    fn constant_series_collapses_the_bands() {
        let closes = [5.0; 6];
        let bands = bollinger(&closes, 4, 2.0);
        assert_approx(bands.upper[5], 5.0, DEFAULT_EPSILON);
        assert_approx(bands.mid[5], 5.0, DEFAULT_EPSILON);
        assert_approx(bands.lower[5], 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn nan_warmup_propagates_to_all_bands() {
        let closes = [1.0, 2.0, 3.0];
        let bands = bollinger(&closes, 3, 2.0);
        assert!(bands.upper[0].is_nan());
        assert!(bands.mid[1].is_nan());
        assert!(bands.lower[1].is_nan());
    }
}
