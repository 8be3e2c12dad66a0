//! The per-bar state machine.
//!
//! Each processed bar runs four phases in fixed order:
//!
//! 1. Session boundary: outside the window every open position is
//!    force-closed (reason `SessionEnd`) and the strategy never runs.
//! 2. Stop/target: protective levels fill at the level itself, bypassing
//!    slippage. Stop wins when both land inside one bar.
//! 3. Strategy: consulted only when no forced exit occurred this bar.
//!    Entries fill at the current bar's open through the execution model;
//!    exits fill the same way on the closing side.
//! 4. Equity mark: exactly one point per processed bar.
//!
//! The loop covers the second bar through the second-to-last. After it, any
//! surviving position is closed on the last bar (reason `FinalClose`); that
//! terminal close appends no equity point.
//!
//! Entries fill at the open of the bar whose data produced the signal.
//! That one-bar look-ahead is part of the engine's contract and mirrors a
//! fill early in the bar being signaled; it must be weighed when reading
//! results, not silently repaired.

use super::execution::ExecutionModel;
use super::sizing::position_size;
use super::state::{EngineConfig, EngineState, EquityPoint, RunResult};
use super::trigger::{check_stop_target, TriggerResult};
use crate::domain::{Bar, Direction, ExitReason, Position};
use crate::indicators::MarketData;
use crate::strategy::{Signal, Strategy};
use chrono::NaiveDateTime;

/// Profit target distance in ATR multiples; the stop sits at one ATR.
const TARGET_ATR_MULTIPLE: f64 = 1.5;

/// What a single `step` did, for callers that inspect transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// A session or stop/target exit closed the position this bar.
    pub forced_exit: Option<ExitReason>,
    /// The strategy ran this bar (never true on forced-exit bars).
    pub consulted_strategy: bool,
}

/// Run the full simulation over a prepared frame.
///
/// Fewer than three retained rows leaves nothing to process: the result is
/// empty and `final_equity` equals the initial equity.
pub fn run_backtest(
    data: &MarketData,
    strategy: &mut dyn Strategy,
    config: &EngineConfig,
) -> RunResult {
    let mut state = EngineState::new(config);
    let n = data.len();

    for index in 1..n.saturating_sub(1) {
        step(&mut state, data, strategy, config, index);
    }

    // Terminal close on the last bar; no equity point is appended.
    if state.position.is_open() {
        let last = &data.bars[n - 1];
        close_at_open(&mut state, &config.execution, last, ExitReason::FinalClose);
    }

    state.into_result(config.initial_equity)
}

/// Advance the simulation by one bar.
pub fn step(
    state: &mut EngineState,
    data: &MarketData,
    strategy: &mut dyn Strategy,
    config: &EngineConfig,
    index: usize,
) -> StepOutcome {
    let bar = &data.bars[index];
    let mut outcome = StepOutcome {
        forced_exit: None,
        consulted_strategy: false,
    };

    // ─── Phase 1: session boundary ───────────────────────────────────
    if !config.session.contains(bar.timestamp) {
        if state.position.is_open() {
            close_at_open(state, &config.execution, bar, ExitReason::SessionEnd);
            outcome.forced_exit = Some(ExitReason::SessionEnd);
        }
        mark_equity(state, bar.timestamp);
        return outcome;
    }

    // ─── Phase 2: stop/target ────────────────────────────────────────
    match check_stop_target(&state.position, bar) {
        TriggerResult::StopHit(level) => {
            close_position(state, &config.execution, bar.timestamp, level, ExitReason::Stop);
            outcome.forced_exit = Some(ExitReason::Stop);
        }
        TriggerResult::TargetHit(level) => {
            close_position(
                state,
                &config.execution,
                bar.timestamp,
                level,
                ExitReason::Target,
            );
            outcome.forced_exit = Some(ExitReason::Target);
        }
        TriggerResult::NoTrigger => {}
    }

    // ─── Phase 3: strategy ───────────────────────────────────────────
    if outcome.forced_exit.is_none() {
        outcome.consulted_strategy = true;
        match strategy.signal(index, data) {
            Signal::EnterLong if state.position.is_flat() => {
                enter_position(state, config, data, index, Direction::Long);
            }
            Signal::EnterShort if state.position.is_flat() => {
                enter_position(state, config, data, index, Direction::Short);
            }
            Signal::Exit if state.position.is_open() => {
                close_at_open(state, &config.execution, bar, ExitReason::Signal);
            }
            _ => {}
        }
    }

    // ─── Phase 4: equity mark ────────────────────────────────────────
    mark_equity(state, bar.timestamp);
    outcome
}

// ─── Transition helpers ──────────────────────────────────────────────

/// Open a position at the slipped fill on this bar's open. Entries that
/// size to zero are skipped silently.
fn enter_position(
    state: &mut EngineState,
    config: &EngineConfig,
    data: &MarketData,
    index: usize,
    direction: Direction,
) {
    let bar = &data.bars[index];
    let fill = config.execution.fill_price(bar.open, direction);
    let atr = data.atr[index];
    let size = position_size(
        state.equity,
        fill,
        atr,
        config.risk_fraction,
        config.max_leverage,
    );
    if size <= 0.0 {
        return;
    }

    let (stop, target) = protective_levels(fill, atr, direction);
    state.position = Position {
        direction: Some(direction),
        size,
        entry_price: Some(fill),
        entry_time: Some(bar.timestamp),
        stop,
        target,
    };
    state.equity -= config.execution.commission();
}

/// Stop one ATR behind the fill, target `TARGET_ATR_MULTIPLE` ATRs ahead.
/// A degenerate ATR leaves both unarmed.
fn protective_levels(fill: f64, atr: f64, direction: Direction) -> (Option<f64>, Option<f64>) {
    if atr.is_nan() || atr <= 0.0 {
        return (None, None);
    }
    match direction {
        Direction::Long => (Some(fill - atr), Some(fill + TARGET_ATR_MULTIPLE * atr)),
        Direction::Short => (Some(fill + atr), Some(fill - TARGET_ATR_MULTIPLE * atr)),
    }
}

/// Close at the execution-model fill on `bar`'s open. No-op when flat.
fn close_at_open(state: &mut EngineState, exec: &ExecutionModel, bar: &Bar, reason: ExitReason) {
    let Some(direction) = state.position.direction else {
        return;
    };
    let price = exec.fill_price(bar.open, direction.opposite());
    close_position(state, exec, bar.timestamp, price, reason);
}

/// Close the open position at an explicit price. No-op when flat.
fn close_position(
    state: &mut EngineState,
    exec: &ExecutionModel,
    exit_time: NaiveDateTime,
    exit_price: f64,
    reason: ExitReason,
) {
    let (Some(direction), Some(entry_price), Some(entry_time)) = (
        state.position.direction,
        state.position.entry_price,
        state.position.entry_time,
    ) else {
        return;
    };

    let size = state.position.size;
    let pnl = (exit_price - entry_price) * size * direction.sign();
    state.equity += pnl;
    state.equity -= exec.commission();
    state.trades.push(crate::domain::Trade {
        entry_time,
        exit_time,
        direction,
        entry_price,
        exit_price,
        size,
        pnl,
        reason,
    });
    state.position = Position::flat();
}

fn mark_equity(state: &mut EngineState, timestamp: NaiveDateTime) {
    state.equity_curve.push(EquityPoint {
        timestamp,
        equity: state.equity,
    });
}
