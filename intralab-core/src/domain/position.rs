//! Direction and the single open position.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Side of a trade or open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// +1.0 for long, -1.0 for short.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }

    /// The closing side of this direction (a long exits as a seller).
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Long => Direction::Short,
            Direction::Short => Direction::Long,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

/// The single open position.
///
/// Invariant: flat ⇔ `direction.is_none()` ⇔ `size == 0.0` ⇔ all entry
/// fields are `None`. Only the engine's enter/exit transitions mutate a
/// position; strategies never see one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub direction: Option<Direction>,
    pub size: f64,
    pub entry_price: Option<f64>,
    pub entry_time: Option<NaiveDateTime>,
    /// Protective stop level; `None` never triggers.
    pub stop: Option<f64>,
    /// Profit target level; `None` never triggers.
    pub target: Option<f64>,
}

impl Position {
    pub fn flat() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.direction.is_some()
    }

    pub fn is_flat(&self) -> bool {
        self.direction.is_none()
    }
}
