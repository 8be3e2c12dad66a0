//! Criterion benchmarks for backtester hot paths.
//!
//! Benchmarks:
//! 1. Frame preparation (indicator columns plus the NaN row filter)
//! 2. Bar loop (full runs with both built-in strategies)

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use intralab_core::domain::Bar;
use intralab_core::engine::{run_backtest, EngineConfig};
use intralab_core::indicators::MarketData;
use intralab_core::strategy::{Breakout, MeanReversion};

// ── Helpers ──────────────────────────────────────────────────────────

/// Five-minute session bars on a deterministic oscillating path,
/// 09:30 through 16:00, 79 bars per day.
fn make_session_bars(days: usize) -> Vec<Bar> {
    let mut bars = Vec::with_capacity(days * 79);
    let mut close = 100.0;
    let mut i = 0usize;
    for day in 0..days {
        let date = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap() + Duration::days(day as i64);
        let mut t = date.and_hms_opt(9, 30, 0).unwrap();
        let end = date.and_hms_opt(16, 0, 0).unwrap();
        while t <= end {
            let open = close;
            close = 100.0 + (i as f64 * 0.1).sin() * 10.0 + (i as f64 * 0.013).cos() * 3.0;
            bars.push(Bar {
                timestamp: t,
                open,
                high: open.max(close) + 0.6,
                low: open.min(close) - 0.6,
                close,
                volume: 1_000_000.0,
            });
            t += Duration::minutes(5);
            i += 1;
        }
    }
    bars
}

// ── 1. Frame Preparation ─────────────────────────────────────────────

fn bench_prepare(c: &mut Criterion) {
    let mut group = c.benchmark_group("market_data_prepare");

    for &days in &[5, 21, 63] {
        let bars = make_session_bars(days);
        group.bench_with_input(BenchmarkId::from_parameter(bars.len()), &bars, |b, bars| {
            b.iter_batched(
                || bars.clone(),
                |bars| MarketData::prepare(black_box(bars), 20),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// ── 2. Bar Loop ──────────────────────────────────────────────────────

fn bench_bar_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("bar_loop");
    let config = EngineConfig::default();

    for &days in &[5, 21, 63] {
        let data = MarketData::prepare(make_session_bars(days), config.atr_period);

        group.bench_with_input(
            BenchmarkId::new("mean_reversion", data.len()),
            &data,
            |b, data| {
                b.iter(|| {
                    let mut strategy = MeanReversion::default();
                    run_backtest(black_box(data), &mut strategy, black_box(&config))
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("breakout", data.len()),
            &data,
            |b, data| {
                b.iter(|| {
                    let mut strategy = Breakout::default();
                    run_backtest(black_box(data), &mut strategy, black_box(&config))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_prepare, bench_bar_loop);
criterion_main!(benches);
