//! Serializable run configuration.
//!
//! A run is described by a TOML document with three tables:
//!
//! ```toml
//! [engine]            # optional, defaults cover every field
//! initial_equity = 25000.0
//!
//! [strategy]          # required, tagged by `type`
//! type = "mean_reversion"
//! cooldown_bars = 4
//!
//! [data]              # optional, tagged by `source`
//! source = "csv"
//! path = "bars/es.csv"
//! ```
//!
//! The same document, serialized back out, reproduces the run: run ids
//! are content hashes over configuration plus dataset.

use intralab_core::domain::{SessionError, SessionWindow};
use intralab_core::engine::EngineConfig;
use intralab_core::strategy::{Breakout, MeanReversion, Strategy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from the configuration layer.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid trading window: {0}")]
    Session(#[from] SessionError),
}

/// Complete description of a single run: engine parameters, strategy
/// choice, and optionally where the bars come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub strategy: StrategyConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DataSpec>,
}

impl RunConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML config file.
    pub fn from_toml_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }
}

/// Strategy selection with per-strategy parameters (serializable enum).
///
/// Times are `"HH:MM"` strings so the TOML stays hand-editable; they are
/// validated when the strategy is built, not when the file is parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Bollinger/RSI fade back toward the middle band.
    MeanReversion {
        #[serde(default = "default_mean_reversion_min_time")]
        min_time: String,
        #[serde(default = "default_mean_reversion_max_time")]
        max_time: String,
        #[serde(default = "default_mean_reversion_cooldown")]
        cooldown_bars: u32,
    },

    /// Donchian channel breakout against the prior bar's channel.
    Breakout {
        #[serde(default = "default_breakout_min_time")]
        min_time: String,
        #[serde(default = "default_breakout_max_time")]
        max_time: String,
        #[serde(default = "default_breakout_cooldown")]
        cooldown_bars: u32,
    },
}

impl StrategyConfig {
    /// Stable identifier used in reports and artifact names.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MeanReversion { .. } => "mean_reversion",
            Self::Breakout { .. } => "breakout",
        }
    }

    /// Instantiate the configured strategy with fresh internal state.
    pub fn build(&self) -> Result<Box<dyn Strategy>, ConfigError> {
        match self {
            Self::MeanReversion {
                min_time,
                max_time,
                cooldown_bars,
            } => {
                let window = SessionWindow::parse(min_time, max_time)?;
                Ok(Box::new(MeanReversion::new(window, *cooldown_bars)))
            }
            Self::Breakout {
                min_time,
                max_time,
                cooldown_bars,
            } => {
                let window = SessionWindow::parse(min_time, max_time)?;
                Ok(Box::new(Breakout::new(window, *cooldown_bars)))
            }
        }
    }
}

fn default_mean_reversion_min_time() -> String {
    "10:00".into()
}

fn default_mean_reversion_max_time() -> String {
    "15:30".into()
}

fn default_mean_reversion_cooldown() -> u32 {
    6
}

fn default_breakout_min_time() -> String {
    "09:45".into()
}

fn default_breakout_max_time() -> String {
    "15:50".into()
}

fn default_breakout_cooldown() -> u32 {
    8
}

/// Where a run's bars come from (serializable enum).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DataSpec {
    /// Bars from a CSV file on disk.
    Csv {
        path: PathBuf,
        /// Symbol label for reports; defaults to the file stem.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        symbol: Option<String>,
        /// Session override applied to the engine for this dataset.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session: Option<SessionWindow>,
    },

    /// Deterministic generated bars, seeded by the symbol name.
    Synthetic {
        symbol: String,
        #[serde(default = "default_synthetic_days")]
        days: u32,
        #[serde(default = "default_bars_per_day")]
        bars_per_day: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session: Option<SessionWindow>,
    },
}

fn default_synthetic_days() -> u32 {
    60
}

fn default_bars_per_day() -> u32 {
    78
}
