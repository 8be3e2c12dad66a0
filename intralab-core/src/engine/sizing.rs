//! Position sizing — ATR risk with a leverage cap.

/// Units for a new entry.
///
/// Risks `equity * risk_fraction` dollars against a one-ATR move, capped so
/// notional never exceeds `equity * max_leverage`. A degenerate ATR (NaN or
/// <= 0) sizes to zero and the caller skips the entry; that is a silent
/// skip, not an error. `fill_price` is the slipped price the entry would
/// actually pay.
pub fn position_size(
    equity: f64,
    fill_price: f64,
    atr: f64,
    risk_fraction: f64,
    max_leverage: f64,
) -> f64 {
    if atr.is_nan() || atr <= 0.0 {
        return 0.0;
    }
    let risk_units = equity * risk_fraction / atr;
    let leverage_cap = equity * max_leverage / fill_price;
    risk_units.min(leverage_cap).max(0.0)
}
