//! Trade — a completed round-trip, recorded once and never revised.

use super::position::Direction;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Protective stop level reached.
    Stop,
    /// Profit target level reached.
    Target,
    /// Strategy-requested exit.
    #[serde(rename = "exit")]
    Signal,
    /// Forced close on a bar outside the trading session.
    SessionEnd,
    /// Forced close on the last bar of the series.
    FinalClose,
}

impl ExitReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ExitReason::Stop => "stop",
            ExitReason::Target => "target",
            ExitReason::Signal => "exit",
            ExitReason::SessionEnd => "session_end",
            ExitReason::FinalClose => "final_close",
        }
    }
}

/// A completed round-trip trade: entry → exit.
///
/// The ledger is append-only; every field is populated on every trade.
/// `pnl` is gross of commission — commissions are charged to equity
/// directly, one per side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_time: NaiveDateTime,
    pub exit_time: NaiveDateTime,
    pub direction: Direction,
    pub entry_price: f64,
    pub exit_price: f64,
    pub size: f64,
    pub pnl: f64,
    pub reason: ExitReason,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }
}
