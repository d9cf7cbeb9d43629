//! Wall-clock timestamps for entity lifecycle fields.
//!
//! Timestamps are UTC instants truncated to millisecond precision, so they
//! round-trip through their RFC 3339 form unchanged. [`Timestamp::tick`]
//! guarantees a strictly later value even when the system clock has not
//! advanced (or went backwards) since the previous reading.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC instant with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Reads the current wall clock.
    #[must_use]
    pub fn now() -> Self {
        let millis = Utc::now().timestamp_millis();
        // Every i64 millisecond reading from the clock is in chrono's range.
        Self(DateTime::from_timestamp_millis(millis).unwrap_or_default())
    }

    /// Creates a timestamp from milliseconds since the Unix epoch.
    pub fn from_millis(millis: i64) -> crate::Result<Self> {
        DateTime::from_timestamp_millis(millis)
            .map(Self)
            .ok_or_else(|| crate::Error::InvalidTimestamp(format!("{millis} ms out of range")))
    }

    /// Parses an RFC 3339 string such as `2024-05-01T12:00:00.000Z`.
    pub fn parse_rfc3339(s: &str) -> crate::Result<Self> {
        let parsed = DateTime::parse_from_rfc3339(s)
            .map_err(|e| crate::Error::InvalidTimestamp(format!("{s}: {e}")))?;
        Self::from_millis(parsed.timestamp_millis())
    }

    /// Milliseconds since the Unix epoch.
    #[must_use]
    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns the wrapped chrono value.
    #[must_use]
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Returns the next timestamp, strictly after `self`.
    ///
    /// Uses the wall clock when it is ahead, otherwise `self + 1ms`.
    #[must_use]
    pub fn tick(&self) -> Self {
        let now = Self::now();
        if now > *self {
            now
        } else {
            Self(
                self.0
                    .checked_add_signed(TimeDelta::milliseconds(1))
                    .unwrap_or(self.0),
            )
        }
    }

    /// Formats as RFC 3339 with millisecond precision and a `Z` suffix.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}
