//! Reporting and export: JSON, CSV, and Markdown artifact generation.
//!
//! Three export formats for backtest reports:
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: trade tape and equity curve for external analysis tools
//! - **Markdown**: human-readable single-run summary
//!
//! Persisted artifacts carry a `schema_version` field; versions newer
//! than this build understands are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use intralab_core::domain::Trade;
use intralab_core::engine::EquityPoint;

use crate::data::TIMESTAMP_FORMAT;
use crate::report::{BacktestReport, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `BacktestReport` to pretty JSON.
pub fn export_json(report: &BacktestReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize BacktestReport to JSON")
}

/// Deserialize a `BacktestReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<BacktestReport> {
    let report: BacktestReport =
        serde_json::from_str(json).context("failed to deserialize BacktestReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export a trade list as CSV.
///
/// Columns: entry_time, exit_time, direction, entry_price, exit_price,
/// size, pnl, reason
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "entry_time",
        "exit_time",
        "direction",
        "entry_price",
        "exit_price",
        "size",
        "pnl",
        "reason",
    ])?;

    for t in trades {
        wtr.write_record([
            &t.entry_time.format(TIMESTAMP_FORMAT).to_string(),
            &t.exit_time.format(TIMESTAMP_FORMAT).to_string(),
            t.direction.as_str(),
            &format!("{:.6}", t.entry_price),
            &format!("{:.6}", t.exit_price),
            &format!("{:.6}", t.size),
            &format!("{:.2}", t.pnl),
            t.reason.as_str(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export an equity curve as CSV with timestamp and equity columns.
pub fn export_equity_csv(curve: &[EquityPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["timestamp", "equity"])?;
    for point in curve {
        wtr.write_record([
            &point.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            &format!("{:.2}", point.equity),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a single run.
///
/// Creates `{symbol}_{strategy}_{run_id prefix}/` under `output_dir`
/// containing:
/// - `report.json` — the full `BacktestReport`
/// - `trades.csv` — trade tape
/// - `equity.csv` — bar-by-bar equity curve
/// - `report.md` — human-readable summary
///
/// The directory name is derived from the run id, so re-running the
/// same configuration overwrites the same artifacts instead of piling
/// up timestamped copies.
pub fn save_artifacts(report: &BacktestReport, output_dir: &Path) -> Result<PathBuf> {
    let id_prefix: String = report.run_id.chars().take(12).collect();
    let dirname = format!("{}_{}_{}", report.symbol, report.strategy, id_prefix);
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let json = export_json(report)?;
    std::fs::write(run_dir.join("report.json"), &json)?;

    let trades_csv = export_trades_csv(&report.result.trades)?;
    std::fs::write(run_dir.join("trades.csv"), &trades_csv)?;

    let equity_csv = export_equity_csv(&report.result.equity_curve)?;
    std::fs::write(run_dir.join("equity.csv"), &equity_csv)?;

    std::fs::write(run_dir.join("report.md"), generate_report(report))?;

    Ok(run_dir)
}

/// Load a `BacktestReport` from an artifact directory's report.json.
///
/// Rejects unknown schema versions.
pub fn load_artifacts(dir: &Path) -> Result<BacktestReport> {
    let report_path = dir.join("report.json");
    let json = std::fs::read_to_string(&report_path)
        .with_context(|| format!("failed to read {}", report_path.display()))?;
    import_json(&json)
}

// ─── Markdown report ────────────────────────────────────────────────

/// Generate a Markdown summary for a single run.
pub fn generate_report(report: &BacktestReport) -> String {
    let mut md = String::with_capacity(1024);

    md.push_str("# Backtest Report\n\n");

    md.push_str("## Run\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Symbol | {} |\n", report.symbol));
    md.push_str(&format!("| Strategy | {} |\n", report.strategy));
    md.push_str(&format!("| Run ID | `{}` |\n", report.run_id));
    md.push_str(&format!("| Dataset Hash | `{}` |\n", report.dataset_hash));
    md.push_str(&format!("| Bars | {} |\n", report.bar_count));
    md.push_str(&format!(
        "| Session | {} |\n",
        format_session(&report.engine.session)
    ));
    md.push_str(&format!(
        "| Initial Equity | {:.2} |\n",
        report.engine.initial_equity
    ));
    md.push_str(&format!("| Elapsed | {} ms |\n", report.elapsed_ms));
    md.push('\n');

    let s = &report.summary;
    md.push_str("## Performance\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Total Return | {:.2}% |\n", s.total_return_pct));
    md.push_str(&format!(
        "| Max Drawdown | {:.2}% |\n",
        s.max_drawdown * 100.0
    ));
    md.push_str(&format!("| Win Rate | {:.1}% |\n", s.win_rate * 100.0));
    md.push_str(&format!("| Profit Factor | {:.2} |\n", s.profit_factor));
    md.push_str(&format!("| Trades | {} |\n", s.trade_count));
    md.push_str(&format!("| Avg Trade PnL | {:.2} |\n", s.avg_trade_pnl));
    md.push_str(&format!(
        "| Max Consecutive Wins | {} |\n",
        s.max_consecutive_wins
    ));
    md.push_str(&format!(
        "| Max Consecutive Losses | {} |\n",
        s.max_consecutive_losses
    ));
    md.push_str(&format!(
        "| Final Equity | {:.2} |\n",
        report.result.final_equity
    ));
    md.push('\n');

    md
}

fn format_session(session: &intralab_core::domain::SessionWindow) -> String {
    format!(
        "{}-{}",
        session.start.format("%H:%M"),
        session.end.format("%H:%M")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use intralab_core::domain::{Direction, ExitReason};
    use intralab_core::engine::{EngineConfig, RunResult};

    use crate::metrics::Summary;

    // ─── Test helpers ────────────────────────────────────────────────

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn sample_trade() -> Trade {
        Trade {
            entry_time: ts(10, 5),
            exit_time: ts(11, 30),
            direction: Direction::Long,
            entry_price: 450.50,
            exit_price: 455.25,
            size: 22.0,
            pnl: 104.50,
            reason: ExitReason::Target,
        }
    }

    fn sample_report() -> BacktestReport {
        let result = RunResult {
            equity_curve: (0..5)
                .map(|i| EquityPoint {
                    timestamp: ts(10, 0) + Duration::minutes(5 * i),
                    equity: 1000.0 + i as f64 * 25.0,
                })
                .collect(),
            trades: vec![sample_trade()],
            final_equity: 1100.0,
            return_pct: 10.0,
        };
        let summary = Summary::compute(&result);
        BacktestReport {
            schema_version: SCHEMA_VERSION,
            run_id: "deadbeefdeadbeefdeadbeef".into(),
            symbol: "SPY".into(),
            strategy: "mean_reversion".into(),
            engine: EngineConfig::default(),
            dataset_hash: "abc123".into(),
            bar_count: 218,
            result,
            summary,
            elapsed_ms: 3,
        }
    }

    // ─── JSON round-trip ─────────────────────────────────────────────

    #[test]
    fn json_roundtrip() {
        let original = sample_report();
        let json = export_json(&original).unwrap();
        let restored = import_json(&json).unwrap();

        assert_eq!(restored.schema_version, SCHEMA_VERSION);
        assert_eq!(restored.run_id, original.run_id);
        assert_eq!(restored.symbol, original.symbol);
        assert_eq!(restored.engine, original.engine);
        assert_eq!(
            restored.result.fingerprint(),
            original.result.fingerprint()
        );
        assert_eq!(restored.summary.trade_count, original.summary.trade_count);
    }

    #[test]
    fn json_rejects_unknown_version() {
        let mut report = sample_report();
        report.schema_version = 99;
        let json = export_json(&report).unwrap();
        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version 99"));
    }

    #[test]
    fn json_without_version_field_defaults_to_current() {
        let json = export_json(&sample_report()).unwrap();
        let stripped: Vec<String> = json
            .lines()
            .filter(|line| !line.contains("schema_version"))
            .map(String::from)
            .collect();
        let restored = import_json(&stripped.join("\n")).unwrap();
        assert_eq!(restored.schema_version, SCHEMA_VERSION);
    }

    // ─── CSV trades ─────────────────────────────────────────────────

    #[test]
    fn csv_trades_columns_and_content() {
        let csv = export_trades_csv(&[sample_trade()]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "entry_time,exit_time,direction,entry_price,exit_price,size,pnl,reason"
        );
        let row = lines[1];
        assert!(row.contains("2024-03-15 10:05:00"));
        assert!(row.contains("long"));
        assert!(row.contains("450.500000"));
        assert!(row.contains("104.50"));
        assert!(row.contains("target"));
    }

    #[test]
    fn csv_empty_trades() {
        let csv = export_trades_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    // ─── CSV equity ─────────────────────────────────────────────────

    #[test]
    fn csv_equity_basic() {
        let curve = vec![
            EquityPoint {
                timestamp: ts(9, 35),
                equity: 1000.0,
            },
            EquityPoint {
                timestamp: ts(9, 40),
                equity: 1012.5,
            },
        ];
        let csv = export_equity_csv(&curve).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "timestamp,equity");
        assert_eq!(lines[1], "2024-03-15 09:35:00,1000.00");
        assert_eq!(lines[2], "2024-03-15 09:40:00,1012.50");
    }

    // ─── Markdown report ────────────────────────────────────────────

    #[test]
    fn markdown_report_has_sections() {
        let md = generate_report(&sample_report());

        assert!(md.contains("# Backtest Report"));
        assert!(md.contains("## Run"));
        assert!(md.contains("## Performance"));
        assert!(md.contains("| Symbol | SPY |"));
        assert!(md.contains("| Strategy | mean_reversion |"));
        assert!(md.contains("| Session | 09:35-16:00 |"));
        assert!(md.contains("| Total Return | 10.00% |"));
        assert!(md.contains("| Trades | 1 |"));
    }

    // ─── Save/load artifacts ────────────────────────────────────────

    #[test]
    fn save_load_artifacts_roundtrip() {
        let report = sample_report();
        let dir = tempfile::tempdir().unwrap();
        let run_dir = save_artifacts(&report, dir.path()).unwrap();

        assert!(run_dir.join("report.json").exists());
        assert!(run_dir.join("trades.csv").exists());
        assert!(run_dir.join("equity.csv").exists());
        assert!(run_dir.join("report.md").exists());

        let loaded = load_artifacts(&run_dir).unwrap();
        assert_eq!(loaded.run_id, report.run_id);
        assert_eq!(loaded.schema_version, SCHEMA_VERSION);
        assert_eq!(loaded.summary.trade_count, report.summary.trade_count);
    }

    #[test]
    fn artifact_dir_name_is_stable() {
        let report = sample_report();
        let dir = tempfile::tempdir().unwrap();

        let first = save_artifacts(&report, dir.path()).unwrap();
        let second = save_artifacts(&report, dir.path()).unwrap();
        assert_eq!(first, second);
        assert!(first
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("SPY_mean_reversion_"));
    }
}
