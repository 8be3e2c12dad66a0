//! Execution model — fill pricing and commission.
//!
//! Every strategy-driven fill references the current bar's open; slippage
//! always degrades the fill in the trade's direction. Stop and target exits
//! bypass this model entirely and fill at the level itself.

use crate::domain::Direction;
use serde::{Deserialize, Serialize};

/// Slippage in basis points of the reference price plus a fixed charge per
/// side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExecutionModel {
    pub slippage_bps: f64,
    /// Charged once at entry and once at exit.
    pub commission_per_trade: f64,
}

impl ExecutionModel {
    pub fn new(slippage_bps: f64, commission_per_trade: f64) -> Self {
        Self {
            slippage_bps,
            commission_per_trade,
        }
    }

    /// Zero slippage, zero commission.
    pub fn frictionless() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Fill on a bar's open, degraded in the trade's direction: a buyer
    /// pays up, a seller receives less.
    pub fn fill_price(&self, reference_open: f64, direction: Direction) -> f64 {
        reference_open + reference_open * (self.slippage_bps / 10_000.0) * direction.sign()
    }

    pub fn commission(&self) -> f64 {
        self.commission_per_trade
    }
}

impl Default for ExecutionModel {
    fn default() -> Self {
        Self {
            slippage_bps: 1.0,
            commission_per_trade: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_fill_pays_up() {
        let exec = ExecutionModel::new(10.0, 0.0);
        // 10 bps of 100.0 = 0.10
        assert!((exec.fill_price(100.0, Direction::Long) - 100.10).abs() < 1e-10);
    }

    #[test]
    fn short_fill_receives_less() {
        let exec = ExecutionModel::new(10.0, 0.0);
        assert!((exec.fill_price(100.0, Direction::Short) - 99.90).abs() < 1e-10);
    }

    #[test]
    fn frictionless_is_identity() {
        let exec = ExecutionModel::frictionless();
        assert_eq!(exec.fill_price(100.0, Direction::Long), 100.0);
        assert_eq!(exec.fill_price(100.0, Direction::Short), 100.0);
        assert_eq!(exec.commission(), 0.0);
    }

    #[test]
    fn default_frictions() {
        let exec = ExecutionModel::default();
        assert_eq!(exec.slippage_bps, 1.0);
        assert_eq!(exec.commission(), 0.5);
        // 1 bp of 200.0 = 0.02
        assert!((exec.fill_price(200.0, Direction::Long) - 200.02).abs() < 1e-10);
    }
}
