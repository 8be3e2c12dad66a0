//! Trading-session window on time-of-day.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid time-of-day {0:?}, expected HH:MM")]
    InvalidTime(String),
}

/// A trading-session window, inclusive at both ends.
///
/// Membership is decided by time-of-day alone; dates never participate, so
/// the same window applies to every day of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionWindow {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl SessionWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Parse `"HH:MM"` bounds.
    pub fn parse(start: &str, end: &str) -> Result<Self, SessionError> {
        Ok(Self {
            start: parse_hhmm(start)?,
            end: parse_hhmm(end)?,
        })
    }

    /// 00:00–23:59, for markets that never close.
    pub fn all_day() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(23, 59, 0).unwrap(),
        }
    }

    /// True if the timestamp's time-of-day lies within `[start, end]`.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        let t = ts.time();
        t >= self.start && t <= self.end
    }
}

impl Default for SessionWindow {
    /// US cash session, starting once the first five-minute bar is complete.
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(9, 35, 0).unwrap(),
            end: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
        }
    }
}

fn parse_hhmm(s: &str) -> Result<NaiveTime, SessionError> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| SessionError::InvalidTime(s.to_string()))
}

/// Serde adapter rendering session bounds as `"HH:MM"` strings.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_hhmm(&s).map_err(serde::de::Error::custom)
    }
}
