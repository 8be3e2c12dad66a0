//! Rolling-window primitives shared by the indicator implementations.
//!
//! Every function returns a vector aligned to the input: NaN until the
//! window fills, and NaN wherever the window contains a NaN value.

/// Rolling arithmetic mean over `period`.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    rolling_apply(values, period, |window| {
        window.iter().sum::<f64>() / period as f64
    })
}

/// Rolling population standard deviation (divide by n, not n − 1).
pub fn rolling_std_pop(values: &[f64], period: usize) -> Vec<f64> {
    rolling_apply(values, period, |window| {
        let mean = window.iter().sum::<f64>() / period as f64;
        let var = window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / period as f64;
        var.sqrt()
    })
}

/// Rolling maximum over `period`.
pub fn rolling_max(values: &[f64], period: usize) -> Vec<f64> {
    rolling_apply(values, period, |window| {
        window.iter().fold(f64::NEG_INFINITY, |acc, &v| acc.max(v))
    })
}

/// Rolling minimum over `period`.
pub fn rolling_min(values: &[f64], period: usize) -> Vec<f64> {
    rolling_apply(values, period, |window| {
        window.iter().fold(f64::INFINITY, |acc, &v| acc.min(v))
    })
}

fn rolling_apply<F>(values: &[f64], period: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 || n < period {
        return out;
    }
    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i] = f(window);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn mean_warms_up_then_tracks() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let out = rolling_mean(&values, 3);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_approx(out[2], 2.0, DEFAULT_EPSILON);
        assert_approx(out[3], 3.0, DEFAULT_EPSILON);
        assert_approx(out[4], 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn std_is_population_flavor() {
        // σ of [2, 4, 4, 4, 5, 5, 7, 9] with n in the denominator is exactly 2
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let out = rolling_std_pop(&values, 8);
        assert_approx(out[7], 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn max_and_min_track_extremes() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0];
        let max = rolling_max(&values, 3);
        let min = rolling_min(&values, 3);
        assert_approx(max[2], 4.0, DEFAULT_EPSILON);
        assert_approx(max[4], 5.0, DEFAULT_EPSILON);
        assert_approx(min[2], 1.0, DEFAULT_EPSILON);
        assert_approx(min[4], 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn nan_in_window_poisons_the_output() {
        let values = [1.0, f64::NAN, 3.0, 4.0, 5.0];
        let out = rolling_mean(&values, 2);
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
        assert_approx(out[3], 3.5, DEFAULT_EPSILON);
    }

    #[test]
    fn short_input_is_all_nan() {
        let out = rolling_mean(&[1.0, 2.0], 3);
        assert!(out.iter().all(|v| v.is_nan()));
    }
}
