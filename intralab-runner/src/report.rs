//! Run orchestration: wires configuration, data, engine, and metrics.
//!
//! Two entry points:
//! - `run_backtest_report()`: one strategy over one dataset.
//! - `run_many()`: the same configuration over several datasets in
//!   parallel, results in input order.

use crate::config::{ConfigError, RunConfig, StrategyConfig};
use crate::data::{dataset_hash, DataError, Dataset};
use crate::metrics::Summary;
use intralab_core::engine::{run_backtest, EngineConfig, RunResult};
use intralab_core::indicators::MarketData;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the orchestration layer.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete output of one run: engine result, summary, and enough
/// provenance to reproduce it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Content hash over configuration and dataset; identical inputs
    /// always produce the same id.
    pub run_id: String,
    pub symbol: String,
    pub strategy: String,
    /// Engine configuration actually used, session override included.
    pub engine: EngineConfig,
    pub dataset_hash: String,
    /// Bars surviving indicator warm-up, as seen by the engine.
    pub bar_count: usize,
    pub result: RunResult,
    pub summary: Summary,
    pub elapsed_ms: u64,
}

/// Default schema version for serde deserialization of older JSON
/// without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Deterministic run id: BLAKE3 over the effective engine config, the
/// strategy config, and the dataset hash.
pub fn compute_run_id(
    engine: &EngineConfig,
    strategy: &StrategyConfig,
    dataset_hash: &str,
) -> String {
    // serde_json over plain structs gives deterministic field order
    let engine_json = serde_json::to_string(engine).expect("EngineConfig must serialize");
    let strategy_json = serde_json::to_string(strategy).expect("StrategyConfig must serialize");

    let mut hasher = blake3::Hasher::new();
    hasher.update(engine_json.as_bytes());
    hasher.update(strategy_json.as_bytes());
    hasher.update(dataset_hash.as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// Run one strategy over one dataset and assemble the full report.
///
/// The configuration's `data` table does not participate here; callers
/// resolve datasets first and pass them in.
pub fn run_backtest_report(
    config: &RunConfig,
    dataset: &Dataset,
) -> Result<BacktestReport, RunError> {
    let engine = effective_engine(config, dataset);
    let mut strategy = config.strategy.build()?;
    let dataset_hash = dataset_hash(&dataset.bars);
    let run_id = compute_run_id(&engine, &config.strategy, &dataset_hash);

    let started = std::time::Instant::now();
    let data = MarketData::prepare(dataset.bars.clone(), engine.atr_period);
    let result = run_backtest(&data, strategy.as_mut(), &engine);
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let summary = Summary::compute(&result);

    Ok(BacktestReport {
        schema_version: SCHEMA_VERSION,
        run_id,
        symbol: dataset.symbol.clone(),
        strategy: config.strategy.name().to_string(),
        engine,
        dataset_hash,
        bar_count: data.len(),
        result,
        summary,
        elapsed_ms,
    })
}

/// Run the same configuration over several datasets in parallel.
///
/// Reports come back in input order regardless of which run finishes
/// first; the first error aborts the batch.
pub fn run_many(config: &RunConfig, datasets: &[Dataset]) -> Result<Vec<BacktestReport>, RunError> {
    datasets
        .par_iter()
        .map(|dataset| run_backtest_report(config, dataset))
        .collect()
}

/// The configured engine with the dataset's session override applied.
fn effective_engine(config: &RunConfig, dataset: &Dataset) -> EngineConfig {
    let mut engine = config.engine.clone();
    if let Some(session) = dataset.session {
        engine.session = session;
    }
    engine
}
