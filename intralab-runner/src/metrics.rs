//! Performance metrics: pure functions from run output to scalars.
//!
//! Every metric takes an equity curve and/or trade list and returns a
//! number. Nothing here touches the engine, the data layer, or IO.

use intralab_core::domain::Trade;
use intralab_core::engine::{EquityPoint, RunResult};
use serde::{Deserialize, Serialize};

/// Aggregate statistics for a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub total_return_pct: f64,
    /// Worst peak-to-trough move as a negative fraction, e.g. -0.15.
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub trade_count: usize,
    pub avg_trade_pnl: f64,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
}

impl Summary {
    /// Compute the full summary for one run.
    pub fn compute(result: &RunResult) -> Self {
        Self {
            total_return_pct: result.return_pct,
            max_drawdown: max_drawdown(&result.equity_curve),
            win_rate: win_rate(&result.trades),
            profit_factor: profit_factor(&result.trades),
            trade_count: result.trades.len(),
            avg_trade_pnl: avg_trade_pnl(&result.trades),
            max_consecutive_wins: max_consecutive_wins(&result.trades),
            max_consecutive_losses: max_consecutive_losses(&result.trades),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Maximum drawdown as a negative fraction (e.g. -0.15 = 15% drawdown).
///
/// Returns 0.0 for constant or monotonically rising equity.
pub fn max_drawdown(curve: &[EquityPoint]) -> f64 {
    if curve.len() < 2 {
        return 0.0;
    }
    let mut peak = curve[0].equity;
    let mut max_dd = 0.0_f64;

    for point in curve {
        if point.equity > peak {
            peak = point.equity;
        }
        if peak > 0.0 {
            let dd = (point.equity - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Win rate: fraction of trades that were winners.
pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64
}

/// Profit factor: gross profits / gross losses.
///
/// Capped at 100.0 for edge cases (all winners, zero losses).
pub fn profit_factor(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let gross_profit: f64 = trades.iter().filter(|t| t.pnl > 0.0).map(|t| t.pnl).sum();
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.pnl < 0.0)
        .map(|t| t.pnl.abs())
        .sum();

    if gross_loss < 1e-10 {
        return if gross_profit > 0.0 { 100.0 } else { 0.0 };
    }
    (gross_profit / gross_loss).min(100.0)
}

/// Mean trade pnl; 0.0 when there are no trades.
pub fn avg_trade_pnl(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    trades.iter().map(|t| t.pnl).sum::<f64>() / trades.len() as f64
}

/// Maximum consecutive winning trades.
pub fn max_consecutive_wins(trades: &[Trade]) -> usize {
    max_consecutive(trades, true)
}

/// Maximum consecutive losing trades.
pub fn max_consecutive_losses(trades: &[Trade]) -> usize {
    max_consecutive(trades, false)
}

fn max_consecutive(trades: &[Trade], winners: bool) -> usize {
    let mut max_streak = 0;
    let mut current = 0;

    for trade in trades {
        if trade.is_winner() == winners {
            current += 1;
            if current > max_streak {
                max_streak = current;
            }
        } else {
            current = 0;
        }
    }
    max_streak
}
