//! Backtest engine: sizing, execution costs, protective triggers, and the
//! bar-by-bar simulation loop.
//!
//! A run walks the prepared frame one bar at a time. Per bar:
//!
//! 1. force-close outside the session window,
//! 2. fill any stop or target the bar's range reached,
//! 3. otherwise consult the strategy and apply its signal,
//! 4. record an equity point.
//!
//! A position still open after the loop is closed on the final bar.

pub mod backtest;
pub mod execution;
pub mod sizing;
pub mod state;
pub mod trigger;

pub use backtest::{run_backtest, step, StepOutcome};
pub use execution::ExecutionModel;
pub use sizing::position_size;
pub use state::{EngineConfig, EngineState, EquityPoint, RunResult};
pub use trigger::{check_stop_target, TriggerResult};
