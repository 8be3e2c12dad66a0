//! Donchian Channel — rolling extremes of highs and lows.
//!
//! The window includes the current bar, so a bar can never exceed its own
//! channel; breakout logic compares against the previous row's channel.

use super::rolling::{rolling_max, rolling_min};
use crate::domain::Bar;

/// Upper and lower channel series, aligned to the input bars.
#[derive(Debug, Clone)]
pub struct DonchianChannel {
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Channel over `period` bars: upper = rolling max of highs, lower =
/// rolling min of lows.
pub fn donchian(bars: &[Bar], period: usize) -> DonchianChannel {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    DonchianChannel {
        upper: rolling_max(&highs, period),
        lower: rolling_min(&lows, period),
    }
}
