//! The enriched market-data frame fed to the engine and strategies.

use super::atr::atr;
use super::bollinger::bollinger;
use super::donchian::donchian;
use super::rsi::rsi;
use crate::domain::Bar;

pub const RSI_PERIOD: usize = 14;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_WIDTH: f64 = 2.0;
pub const DONCHIAN_PERIOD: usize = 20;

/// Bars plus every derived column, restricted to rows where all columns
/// are defined.
///
/// Columns are parallel vectors of equal length; index `i` across them is
/// one row. Row positions restart at zero after dropped rows, so callers
/// index the frame positionally, never by original series index.
#[derive(Debug, Clone)]
pub struct MarketData {
    pub bars: Vec<Bar>,
    pub atr: Vec<f64>,
    pub rsi: Vec<f64>,
    pub bb_upper: Vec<f64>,
    pub bb_mid: Vec<f64>,
    pub bb_lower: Vec<f64>,
    pub donchian_upper: Vec<f64>,
    pub donchian_lower: Vec<f64>,
}

impl MarketData {
    /// Compute every indicator over the full series, then drop any row
    /// where any column (input or derived) is NaN.
    ///
    /// Warm-up truncation is expected, not an error: a series shorter than
    /// the longest warm-up yields an empty frame.
    pub fn prepare(bars: Vec<Bar>, atr_period: usize) -> Self {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let atr_col = atr(&bars, atr_period);
        let rsi_col = rsi(&closes, RSI_PERIOD);
        let bands = bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_WIDTH);
        let channel = donchian(&bars, DONCHIAN_PERIOD);

        let mut out = MarketData {
            bars: Vec::new(),
            atr: Vec::new(),
            rsi: Vec::new(),
            bb_upper: Vec::new(),
            bb_mid: Vec::new(),
            bb_lower: Vec::new(),
            donchian_upper: Vec::new(),
            donchian_lower: Vec::new(),
        };

        for (i, bar) in bars.into_iter().enumerate() {
            let row = [
                atr_col[i],
                rsi_col[i],
                bands.upper[i],
                bands.mid[i],
                bands.lower[i],
                channel.upper[i],
                channel.lower[i],
            ];
            if bar.has_nan() || row.iter().any(|v| v.is_nan()) {
                continue;
            }
            out.bars.push(bar);
            out.atr.push(row[0]);
            out.rsi.push(row[1]);
            out.bb_upper.push(row[2]);
            out.bb_mid.push(row[3]);
            out.bb_lower.push(row[4]);
            out.donchian_upper.push(row[5]);
            out.donchian_lower.push(row[6]);
        }
        out
    }

    /// Number of retained rows.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
