//! Bar loading and dataset resolution for the runner.
//!
//! Bars come from one of two places:
//! 1. A CSV file with `timestamp,open,high,low,close,volume` rows
//! 2. A deterministic synthetic generator seeded by the symbol name
//!
//! Synthetic data is a development aid: the same symbol always produces
//! byte-identical bars, which keeps dataset hashes and run ids stable
//! across machines.

use crate::config::DataSpec;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use intralab_core::domain::{Bar, SessionWindow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Timestamp format used in bar CSV files, e.g. `2024-01-02 09:35:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors from the data layer.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("bad timestamp {value:?} in {path} (expected e.g. 2024-01-02 09:35:00)")]
    Timestamp { path: PathBuf, value: String },

    #[error("{path} contains no bars")]
    Empty { path: PathBuf },
}

/// Shape of one CSV row; timestamps stay text until validated.
#[derive(Debug, Serialize, Deserialize)]
struct BarRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// A resolved dataset: labelled bars plus an optional session override
/// that replaces the engine's trading window for this run.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub symbol: String,
    pub bars: Vec<Bar>,
    pub session: Option<SessionWindow>,
}

/// Materialize a [`DataSpec`] into bars ready for a run.
pub fn resolve_dataset(spec: &DataSpec) -> Result<Dataset, DataError> {
    match spec {
        DataSpec::Csv {
            path,
            symbol,
            session,
        } => {
            let bars = load_bars_csv(path)?;
            if bars.is_empty() {
                return Err(DataError::Empty { path: path.clone() });
            }
            let symbol = symbol.clone().unwrap_or_else(|| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "unknown".into())
            });
            Ok(Dataset {
                symbol,
                bars,
                session: *session,
            })
        }
        DataSpec::Synthetic {
            symbol,
            days,
            bars_per_day,
            session,
        } => Ok(Dataset {
            symbol: symbol.clone(),
            bars: synthetic_bars(symbol, *days, *bars_per_day),
            session: *session,
        }),
    }
}

/// Load bars from a CSV file with a `timestamp,open,high,low,close,volume`
/// header row.
pub fn load_bars_csv(path: &Path) -> Result<Vec<Bar>, DataError> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::Reader::from_reader(file);
    let mut bars = Vec::new();
    for row in reader.deserialize() {
        let row: BarRow = row.map_err(|source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let timestamp = NaiveDateTime::parse_from_str(&row.timestamp, TIMESTAMP_FORMAT).map_err(
            |_| DataError::Timestamp {
                path: path.to_path_buf(),
                value: row.timestamp.clone(),
            },
        )?;
        bars.push(Bar {
            timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }
    Ok(bars)
}

/// Write bars to a CSV file in the format [`load_bars_csv`] reads.
pub fn write_bars_csv(path: &Path, bars: &[Bar]) -> Result<(), DataError> {
    let file = std::fs::File::create(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);
    for bar in bars {
        writer
            .serialize(BarRow {
                timestamp: bar.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
            })
            .map_err(|source| DataError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
    }
    writer.flush().map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Generate deterministic five-minute bars for a symbol.
///
/// A random walk seeded by the symbol name: per-bar returns within
/// ±0.2%, overnight gaps within ±0.5%, weekends skipped. Each trading
/// day starts at 09:30 and stamps bars at their open.
pub fn synthetic_bars(symbol: &str, days: u32, bars_per_day: u32) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // Deterministic seed from the symbol name
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::with_capacity((days * bars_per_day) as usize);
    let mut price: f64 = rng.gen_range(50.0..150.0);
    let mut date = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();

    for _ in 0..days {
        while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            date += Duration::days(1);
        }

        // Overnight gap
        price *= 1.0 + rng.gen_range(-0.005..0.005);

        let mut ts = date.and_time(NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        for _ in 0..bars_per_day {
            let bar_return: f64 = rng.gen_range(-0.002..0.002);
            let open = price;
            let close = price * (1.0 + bar_return);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.0008));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.0008));
            let volume = rng.gen_range(1_000.0..50_000.0);

            bars.push(Bar {
                timestamp: ts,
                open,
                high,
                low,
                close,
                volume,
            });

            price = close;
            ts += Duration::minutes(5);
        }

        date += Duration::days(1);
    }

    bars
}

/// Deterministic BLAKE3 hash over every bar's timestamp and OHLCV values.
///
/// Two datasets hash equal exactly when their bars are identical, so the
/// hash ties a run id to the data it saw.
pub fn dataset_hash(bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(bar.timestamp.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn synthetic_bars_are_deterministic() {
        let first = synthetic_bars("SPY", 5, 78);
        let second = synthetic_bars("SPY", 5, 78);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.timestamp, b.timestamp);
            assert_eq!(a.close, b.close);
        }
    }

    #[test]
    fn different_symbols_walk_different_paths() {
        let spy = synthetic_bars("SPY", 5, 78);
        let qqq = synthetic_bars("QQQ", 5, 78);

        assert_eq!(spy.len(), qqq.len());
        assert_ne!(spy[0].close, qqq[0].close);
    }

    #[test]
    fn synthetic_bars_hold_their_shape() {
        let bars = synthetic_bars("TEST", 3, 78);
        assert_eq!(bars.len(), 3 * 78);

        for pair in bars.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
        for bar in &bars {
            assert!(bar.is_sane(), "malformed bar at {}", bar.timestamp);
            assert!(bar.low > 0.0);
            assert_eq!(bar.timestamp.time().minute() % 5, 0);
        }
        // Day starts at 09:30, last bar of a 78-bar day opens 15:55
        assert_eq!(
            bars[0].timestamp.time(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(
            bars[77].timestamp.time(),
            NaiveTime::from_hms_opt(15, 55, 0).unwrap()
        );
    }

    #[test]
    fn synthetic_dates_skip_weekends() {
        let bars = synthetic_bars("TEST", 10, 78);
        for bar in &bars {
            let weekday = bar.timestamp.date().weekday();
            assert!(!matches!(weekday, Weekday::Sat | Weekday::Sun));
        }
    }

    #[test]
    fn csv_round_trip_preserves_bars() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.csv");
        let original = synthetic_bars("RT", 2, 10);

        write_bars_csv(&path, &original).unwrap();
        let loaded = load_bars_csv(&path).unwrap();

        assert_eq!(loaded.len(), original.len());
        for (a, b) in loaded.iter().zip(original.iter()) {
            assert_eq!(a.timestamp, b.timestamp);
            assert_eq!(a.open, b.open);
            assert_eq!(a.high, b.high);
            assert_eq!(a.low, b.low);
            assert_eq!(a.close, b.close);
            assert_eq!(a.volume, b.volume);
        }
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = load_bars_csv(Path::new("/nonexistent/bars.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/bars.csv"));
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(
            &path,
            "timestamp,open,high,low,close,volume\nyesterday,1,2,0.5,1.5,100\n",
        )
        .unwrap();

        let err = load_bars_csv(&path).unwrap_err();
        assert!(matches!(err, DataError::Timestamp { .. }));
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn header_only_csv_fails_dataset_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "timestamp,open,high,low,close,volume\n").unwrap();

        let spec = DataSpec::Csv {
            path: path.clone(),
            symbol: None,
            session: None,
        };
        let err = resolve_dataset(&spec).unwrap_err();
        assert!(matches!(err, DataError::Empty { .. }));
    }

    #[test]
    fn csv_symbol_defaults_to_the_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("es_mini.csv");
        write_bars_csv(&path, &synthetic_bars("ES", 1, 5)).unwrap();

        let spec = DataSpec::Csv {
            path,
            symbol: None,
            session: None,
        };
        let dataset = resolve_dataset(&spec).unwrap();
        assert_eq!(dataset.symbol, "es_mini");
        assert_eq!(dataset.bars.len(), 5);
    }

    #[test]
    fn dataset_hash_tracks_the_bars() {
        let bars = synthetic_bars("HASH", 2, 10);
        assert_eq!(dataset_hash(&bars), dataset_hash(&bars));

        let mut nudged = bars.clone();
        nudged[3].close += 0.01;
        assert_ne!(dataset_hash(&bars), dataset_hash(&nudged));
        assert_ne!(dataset_hash(&bars), dataset_hash(&bars[..19]));
    }
}
