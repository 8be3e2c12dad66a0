//! Bollinger/RSI mean reversion.

use super::{Signal, Strategy};
use crate::domain::SessionWindow;
use crate::indicators::MarketData;
use chrono::NaiveTime;

/// RSI level below which a lower-band penetration counts as oversold.
const RSI_OVERSOLD: f64 = 30.0;
/// RSI level above which an upper-band penetration counts as overbought.
const RSI_OVERBOUGHT: f64 = 70.0;

/// Fades band penetrations back toward the middle band.
///
/// An entry requires the previous bar to have closed beyond a Bollinger
/// band with RSI confirming the stretch, and the current bar to have
/// closed back inside. The trade is ridden until the close crosses the
/// middle band. Entries arm a cooldown; mid-band exits bypass it.
#[derive(Debug, Clone)]
pub struct MeanReversion {
    window: SessionWindow,
    cooldown_bars: u32,
    cooldown: u32,
}

impl MeanReversion {
    pub fn new(window: SessionWindow, cooldown_bars: u32) -> Self {
        Self {
            window,
            cooldown_bars,
            cooldown: 0,
        }
    }
}

impl Default for MeanReversion {
    /// Trades 10:00–15:30 with a six-bar cooldown, sitting out the noisy
    /// open and leaving room before the session force-close.
    fn default() -> Self {
        Self::new(
            SessionWindow::new(
                NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(15, 30, 0).unwrap(),
            ),
            6,
        )
    }
}

impl Strategy for MeanReversion {
    fn name(&self) -> &str {
        "mean_reversion"
    }

    fn signal(&mut self, index: usize, data: &MarketData) -> Signal {
        // The cooldown runs down on every consultation, in or out of the
        // trading window.
        if self.cooldown > 0 {
            self.cooldown -= 1;
        }
        if index == 0 {
            return Signal::None;
        }
        let bar = &data.bars[index];
        if !self.window.contains(bar.timestamp) {
            return Signal::None;
        }

        let close = bar.close;
        let prev_close = data.bars[index - 1].close;

        // Mid-band crosses close the trade regardless of cooldown.
        let crossed_up = prev_close < data.bb_mid[index - 1] && close >= data.bb_mid[index];
        let crossed_down = prev_close > data.bb_mid[index - 1] && close <= data.bb_mid[index];
        if crossed_up || crossed_down {
            return Signal::Exit;
        }

        if self.cooldown == 0 {
            let prev_rsi = data.rsi[index - 1];
            if prev_close < data.bb_lower[index - 1]
                && prev_rsi < RSI_OVERSOLD
                && close > data.bb_lower[index]
            {
                self.cooldown = self.cooldown_bars;
                return Signal::EnterLong;
            }
            if prev_close > data.bb_upper[index - 1]
                && prev_rsi > RSI_OVERBOUGHT
                && close < data.bb_upper[index]
            {
                self.cooldown = self.cooldown_bars;
                return Signal::EnterShort;
            }
        }

        Signal::None
    }
}
