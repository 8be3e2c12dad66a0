//! Engine configuration, simulation state, and the run result.

use super::execution::ExecutionModel;
use crate::domain::{Position, SessionWindow, Trade};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One equity mark, recorded once per processed bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub equity: f64,
}

/// Everything the engine needs to run one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub initial_equity: f64,
    /// Fraction of equity risked against a one-ATR move per entry.
    pub risk_fraction: f64,
    /// Cap on notional as a multiple of equity.
    pub max_leverage: f64,
    pub session: SessionWindow,
    /// ATR lookback; the other indicator periods are fixed.
    pub atr_period: usize,
    pub execution: ExecutionModel,
}

impl EngineConfig {
    pub fn new(initial_equity: f64) -> Self {
        Self {
            initial_equity,
            ..Self::default()
        }
    }

    pub fn with_execution(mut self, execution: ExecutionModel) -> Self {
        self.execution = execution;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_equity: 1000.0,
            risk_fraction: 0.01,
            max_leverage: 2.0,
            session: SessionWindow::default(),
            atr_period: 20,
            execution: ExecutionModel::default(),
        }
    }
}

/// Explicit simulation state, advanced one bar at a time by `step`.
///
/// Every transition is observable: tests drive `step` directly and inspect
/// the position, ledger, and curve between bars.
#[derive(Debug, Clone)]
pub struct EngineState {
    pub equity: f64,
    pub position: Position,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl EngineState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            equity: config.initial_equity,
            position: Position::flat(),
            trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    /// Finish the run: fold the state into an immutable result.
    pub fn into_result(self, initial_equity: f64) -> RunResult {
        let final_equity = self.equity;
        let return_pct = if initial_equity != 0.0 {
            (final_equity / initial_equity - 1.0) * 100.0
        } else {
            0.0
        };
        RunResult {
            equity_curve: self.equity_curve,
            trades: self.trades,
            final_equity,
            return_pct,
        }
    }
}

/// Output of a completed run.
///
/// `final_equity` is the account equity after the terminal force-close,
/// which can differ from the last curve point: the curve is marked before
/// that close realizes its pnl.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
    pub final_equity: f64,
    /// `(final_equity / initial_equity - 1) * 100`.
    pub return_pct: f64,
}

impl RunResult {
    /// Stable digest of the full result, for determinism checks and run
    /// comparison. Hashes the canonical JSON serialization.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_string(self).expect("RunResult serialization failed");
        blake3::hash(canonical.as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, ExitReason};
    use chrono::NaiveDate;

    #[test]
    fn default_config_matches_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.initial_equity, 1000.0);
        assert_eq!(config.risk_fraction, 0.01);
        assert_eq!(config.max_leverage, 2.0);
        assert_eq!(config.atr_period, 20);
        assert_eq!(config.execution.slippage_bps, 1.0);
        assert_eq!(config.execution.commission_per_trade, 0.5);
    }

    #[test]
    fn new_state_is_flat_and_empty() {
        let state = EngineState::new(&EngineConfig::new(5000.0));
        assert_eq!(state.equity, 5000.0);
        assert!(state.position.is_flat());
        assert!(state.trades.is_empty());
        assert!(state.equity_curve.is_empty());
    }

    #[test]
    fn into_result_computes_return_pct() {
        let mut state = EngineState::new(&EngineConfig::new(1000.0));
        state.equity = 1009.0;
        let result = state.into_result(1000.0);
        assert_eq!(result.final_equity, 1009.0);
        assert!((result.return_pct - 0.9).abs() < 1e-10);
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"initial_equity": 2500.0}"#).unwrap();
        assert_eq!(config.initial_equity, 2500.0);
        assert_eq!(config.atr_period, 20);
        assert_eq!(config.session, SessionWindow::default());
    }

    #[test]
    fn fingerprint_is_stable_and_sensitive() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let result = RunResult {
            equity_curve: vec![EquityPoint {
                timestamp: day.and_hms_opt(10, 0, 0).unwrap(),
                equity: 1000.0,
            }],
            trades: vec![Trade {
                entry_time: day.and_hms_opt(10, 0, 0).unwrap(),
                exit_time: day.and_hms_opt(10, 5, 0).unwrap(),
                direction: Direction::Long,
                entry_price: 100.0,
                exit_price: 101.0,
                size: 5.0,
                pnl: 5.0,
                reason: ExitReason::Signal,
            }],
            final_equity: 1004.0,
            return_pct: 0.4,
        };
        assert_eq!(result.fingerprint(), result.fingerprint());

        let mut other = result.clone();
        other.final_equity = 1005.0;
        assert_ne!(result.fingerprint(), other.fingerprint());
    }
}
