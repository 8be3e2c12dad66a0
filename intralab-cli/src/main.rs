//! Intralab CLI — run backtests and generate synthetic data.
//!
//! Commands:
//! - `run` — execute one strategy over one or more datasets, print a
//!   summary table (or JSON), and optionally save artifact bundles
//! - `synth` — write deterministic synthetic bars to a CSV file

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use intralab_core::domain::SessionWindow;
use intralab_runner::config::{DataSpec, RunConfig};
use intralab_runner::data::{resolve_dataset, synthetic_bars, write_bars_csv, Dataset};
use intralab_runner::export::save_artifacts;
use intralab_runner::report::{run_many, BacktestReport};

#[derive(Parser)]
#[command(name = "intralab", about = "Intralab CLI — intraday backtesting engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one strategy over one or more datasets.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// CSV file with bars to run on (repeatable).
        #[arg(long)]
        data: Vec<PathBuf>,

        /// Symbol to generate synthetic bars for (repeatable).
        #[arg(long)]
        synth: Vec<String>,

        /// Strategy with default parameters (mutually exclusive with --config).
        #[arg(long, value_enum)]
        strategy: Option<StrategyKind>,

        /// Trading session override, e.g. 09:35-16:00.
        #[arg(long)]
        session: Option<String>,

        /// Keep only bars on or after this date (YYYY-MM-DD).
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Keep only bars on or before this date (YYYY-MM-DD).
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Directory to save artifact bundles into.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print machine-readable JSON instead of the table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write deterministic synthetic bars to a CSV file.
    Synth {
        /// Symbol that seeds the generator.
        symbol: String,

        /// Output CSV path.
        #[arg(long)]
        out: PathBuf,

        /// Number of trading days to generate.
        #[arg(long, default_value_t = 60)]
        days: u32,

        /// Bars per trading day.
        #[arg(long, default_value_t = 78)]
        bars_per_day: u32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyKind {
    MeanReversion,
    Breakout,
}

impl StrategyKind {
    fn as_str(self) -> &'static str {
        match self {
            StrategyKind::MeanReversion => "mean_reversion",
            StrategyKind::Breakout => "breakout",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data,
            synth,
            strategy,
            session,
            from,
            to,
            out,
            json,
        } => run_cmd(config, data, synth, strategy, session, from, to, out, json),
        Commands::Synth {
            symbol,
            out,
            days,
            bars_per_day,
        } => synth_cmd(&symbol, &out, days, bars_per_day),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_cmd(
    config_path: Option<PathBuf>,
    data: Vec<PathBuf>,
    synth: Vec<String>,
    strategy: Option<StrategyKind>,
    session: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    out: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    if config_path.is_some() && strategy.is_some() {
        bail!("--config and --strategy are mutually exclusive");
    }

    let mut run_config = if let Some(path) = &config_path {
        RunConfig::from_toml_path(path)?
    } else if let Some(kind) = strategy {
        // Route through the config layer so strategy defaults live in
        // exactly one place
        RunConfig::from_toml(&format!("[strategy]\ntype = \"{}\"\n", kind.as_str()))?
    } else {
        bail!("one of --config or --strategy is required");
    };

    if let Some(spec) = &session {
        let Some((start, end)) = spec.split_once('-') else {
            bail!("--session expects HH:MM-HH:MM, got '{spec}'");
        };
        run_config.engine.session = SessionWindow::parse(start, end)?;
    }

    let mut datasets = Vec::new();
    if let Some(spec) = &run_config.data {
        datasets.push(resolve_dataset(spec)?);
    }
    for path in &data {
        datasets.push(resolve_dataset(&DataSpec::Csv {
            path: path.clone(),
            symbol: None,
            session: None,
        })?);
    }
    for symbol in &synth {
        datasets.push(resolve_dataset(&DataSpec::Synthetic {
            symbol: symbol.clone(),
            days: 60,
            bars_per_day: 78,
            session: None,
        })?);
    }
    if datasets.is_empty() {
        bail!("no datasets: pass --data, --synth, or a config with a [data] table");
    }

    apply_date_filter(&mut datasets, from, to);

    let reports = run_many(&run_config, &datasets)?;

    if json {
        print_json(&reports)?;
    } else {
        print_table(&reports);
    }

    if let Some(out_dir) = &out {
        for report in &reports {
            let run_dir = save_artifacts(report, out_dir)?;
            eprintln!("Artifacts saved to: {}", run_dir.display());
        }
    }

    Ok(())
}

fn synth_cmd(symbol: &str, out: &Path, days: u32, bars_per_day: u32) -> Result<()> {
    let bars = synthetic_bars(symbol, days, bars_per_day);
    write_bars_csv(out, &bars)?;
    println!("Wrote {} bars for {symbol} to {}", bars.len(), out.display());
    Ok(())
}

/// Trim every dataset to the inclusive [from, to] date range.
fn apply_date_filter(datasets: &mut [Dataset], from: Option<NaiveDate>, to: Option<NaiveDate>) {
    if from.is_none() && to.is_none() {
        return;
    }
    for dataset in datasets.iter_mut() {
        dataset.bars.retain(|bar| {
            let date = bar.timestamp.date();
            from.map_or(true, |d| date >= d) && to.map_or(true, |d| date <= d)
        });
    }
}

fn print_table(reports: &[BacktestReport]) {
    println!(
        "{:<10} {:<16} {:>10} {:>9} {:>7} {:>7} {:>13}",
        "Symbol", "Strategy", "Return %", "Max DD %", "Trades", "Win %", "Final Equity"
    );
    println!("{}", "-".repeat(78));
    for report in reports {
        let s = &report.summary;
        println!(
            "{:<10} {:<16} {:>10.2} {:>9.2} {:>7} {:>7.1} {:>13.2}",
            report.symbol,
            report.strategy,
            s.total_return_pct,
            s.max_drawdown * 100.0,
            s.trade_count,
            s.win_rate * 100.0,
            report.result.final_equity,
        );
    }
}

fn print_json(reports: &[BacktestReport]) -> Result<()> {
    let rows: Vec<serde_json::Value> = reports
        .iter()
        .map(|report| {
            serde_json::json!({
                "run_id": report.run_id,
                "symbol": report.symbol,
                "strategy": report.strategy,
                "summary": report.summary,
                "final_equity": report.result.final_equity,
                "elapsed_ms": report.elapsed_ms,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
