//! Trading strategies — map prepared market data to directional intent.
//!
//! Strategies are account-agnostic: they see the frame and their own
//! internal state (cooldown counters, a remembered side), never the
//! position or equity. The engine owns position awareness and ignores
//! entry signals while a position is open and exit signals while flat.

pub mod breakout;
pub mod mean_reversion;

pub use breakout::Breakout;
pub use mean_reversion::MeanReversion;

use crate::indicators::MarketData;
use serde::{Deserialize, Serialize};

/// Directional intent for the current bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    None,
    EnterLong,
    EnterShort,
    Exit,
}

/// A strategy consulted by the engine once per processed bar, in order.
///
/// `signal` takes `&mut self` because internal state advances as bars are
/// consumed. Implementations may read any row up to and including `index`
/// but nothing later.
pub trait Strategy: Send {
    /// Stable identifier used in reports and artifact names.
    fn name(&self) -> &str;

    /// The strategy's intent at `index`.
    fn signal(&mut self, index: usize, data: &MarketData) -> Signal;
}
