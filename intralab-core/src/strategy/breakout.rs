//! Donchian channel breakout.
//!
//! Breaks are judged against the previous row's channel. The current
//! row's channel includes the current bar, so a bar can never clear its
//! own channel and same-row comparison would go permanently quiet.

use super::{Signal, Strategy};
use crate::domain::{Direction, SessionWindow};
use crate::indicators::MarketData;
use chrono::NaiveTime;

/// Enters on a break of the prior bar's Donchian channel, exits when the
/// opposite extreme breaks.
///
/// The remembered side is the strategy's own record of its last entry,
/// not the account position: a stop or session close can flatten the
/// account without the strategy noticing, and the stale side then exits
/// into a flat book, which the engine ignores.
#[derive(Debug, Clone)]
pub struct Breakout {
    window: SessionWindow,
    cooldown_bars: u32,
    cooldown: u32,
    side: Option<Direction>,
}

impl Breakout {
    pub fn new(window: SessionWindow, cooldown_bars: u32) -> Self {
        Self {
            window,
            cooldown_bars,
            cooldown: 0,
            side: None,
        }
    }
}

impl Default for Breakout {
    /// Trades 09:45–15:50 with an eight-bar cooldown.
    fn default() -> Self {
        Self::new(
            SessionWindow::new(
                NaiveTime::from_hms_opt(9, 45, 0).unwrap(),
                NaiveTime::from_hms_opt(15, 50, 0).unwrap(),
            ),
            8,
        )
    }
}

impl Strategy for Breakout {
    fn name(&self) -> &str {
        "breakout"
    }

    fn signal(&mut self, index: usize, data: &MarketData) -> Signal {
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

        let long_break = bar.high > data.donchian_upper[index - 1];
        let short_break = bar.low < data.donchian_lower[index - 1];

        // An opposite break abandons the remembered side regardless of
        // cooldown, and re-arms it.
        match self.side {
            Some(Direction::Long) if short_break => {
                self.side = None;
                self.cooldown = self.cooldown_bars;
                return Signal::Exit;
            }
            Some(Direction::Short) if long_break => {
                self.side = None;
                self.cooldown = self.cooldown_bars;
                return Signal::Exit;
            }
            _ => {}
        }

        // NaN ATR fails the comparison and blocks the entry.
        if self.cooldown == 0 && data.atr[index] > 0.0 {
            if long_break {
                self.side = Some(Direction::Long);
                self.cooldown = self.cooldown_bars;
                return Signal::EnterLong;
            }
            if short_break {
                self.side = Some(Direction::Short);
                self.cooldown = self.cooldown_bars;
                return Signal::EnterShort;
            }
        }

        Signal::None
    }
}
