//! Intralab Runner — backtest orchestration on top of `intralab-core`.
//!
//! This crate provides:
//! - TOML run configuration with strategy and data selection
//! - CSV loading and deterministic synthetic bar generation
//! - Single-run orchestration and parallel multi-dataset batches
//! - Performance summaries
//! - JSON/CSV/Markdown artifact export with schema versioning

pub mod config;
pub mod data;
pub mod export;
pub mod metrics;
pub mod report;

pub use config::{ConfigError, DataSpec, RunConfig, StrategyConfig};
pub use data::{
    dataset_hash, load_bars_csv, resolve_dataset, synthetic_bars, write_bars_csv, DataError,
    Dataset, TIMESTAMP_FORMAT,
};
pub use export::{
    export_equity_csv, export_json, export_trades_csv, generate_report, import_json,
    load_artifacts, save_artifacts,
};
pub use metrics::{
    avg_trade_pnl, max_consecutive_losses, max_consecutive_wins, max_drawdown, profit_factor,
    win_rate, Summary,
};
pub use report::{
    compute_run_id, run_backtest_report, run_many, BacktestReport, RunError, SCHEMA_VERSION,
};
