//! Intralab Core — engine, domain types, indicator preprocessing, strategies.
//!
//! This crate contains the heart of the intraday backtester:
//! - Domain types (bars, positions, trades, session windows)
//! - Indicator columns computed once up front (ATR, RSI, Bollinger, Donchian)
//! - Bar-by-bar simulation loop with four phases per bar
//! - ATR-scaled position sizing under a leverage cap
//! - Slippage and commission execution model
//! - Built-in mean-reversion and breakout strategies

pub mod domain;
pub mod engine;
pub mod indicators;
pub mod strategy;
