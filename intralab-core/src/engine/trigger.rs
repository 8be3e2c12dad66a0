//! Stop/target evaluation — does a bar's range reach a protective level?
//!
//! Checks the open position's levels against one bar. When both levels
//! fall inside the same bar the stop wins; intrabar ordering is unknowable
//! from OHLC data, so the engine takes the pessimistic reading. This
//! precedence is fixed.

use crate::domain::{Bar, Direction, Position};

/// Result of checking a position's protective levels against a bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerResult {
    /// Neither level was reached (or the position is flat / unarmed).
    NoTrigger,
    /// The stop level was reached; exit fills at the level.
    StopHit(f64),
    /// The target level was reached; exit fills at the level.
    TargetHit(f64),
}

/// Check a position's stop and target against a bar's range.
///
/// Long: stop triggers if `bar.low <= stop`, target if `bar.high >= target`.
/// Short: mirrored. A `None` level never triggers.
pub fn check_stop_target(position: &Position, bar: &Bar) -> TriggerResult {
    let Some(direction) = position.direction else {
        return TriggerResult::NoTrigger;
    };

    match direction {
        Direction::Long => {
            if let Some(stop) = position.stop {
                if bar.low <= stop {
                    return TriggerResult::StopHit(stop);
                }
            }
            if let Some(target) = position.target {
                if bar.high >= target {
                    return TriggerResult::TargetHit(target);
                }
            }
        }
        Direction::Short => {
            if let Some(stop) = position.stop {
                if bar.high >= stop {
                    return TriggerResult::StopHit(stop);
                }
            }
            if let Some(target) = position.target {
                if bar.low <= target {
                    return TriggerResult::TargetHit(target);
                }
            }
        }
    }

    TriggerResult::NoTrigger
}
