//! Date and duration kinds for 64-bit slots.
//!
//! Both are stored as tick counts of 100 nanoseconds. A [`DateTimeTicks`]
//! counts from midnight, January 1 of year 1 (proleptic Gregorian, UTC),
//! which is the layout existing authored data uses.

use super::union::SlotValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Ticks in one second.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

const NANOS_PER_TICK: i128 = 100;
const SECONDS_PER_DAY: u64 = 86_400;

/// Tick count of 1970-01-01 00:00:00 UTC.
const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// A UTC point in time, in 100 ns ticks since 0001-01-01.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateTimeTicks(pub i64);

impl DateTimeTicks {
    /// 1970-01-01 00:00:00 UTC.
    pub const UNIX_EPOCH: Self = Self(UNIX_EPOCH_TICKS);

    /// Raw tick count.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> i64 {
        self.0
    }

    /// Point in time `secs` seconds after the Unix epoch.
    #[must_use]
    pub const fn from_unix_seconds(secs: i64) -> Self {
        Self(UNIX_EPOCH_TICKS.saturating_add(secs.saturating_mul(TICKS_PER_SECOND)))
    }

    /// Converts from a `time` date, flooring to tick precision.
    #[must_use]
    pub fn from_offset_date_time(value: OffsetDateTime) -> Self {
        let ticks =
            value.unix_timestamp_nanos().div_euclid(NANOS_PER_TICK) + i128::from(UNIX_EPOCH_TICKS);
        Self(i64::try_from(ticks).unwrap_or(if ticks < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Converts to a `time` date in UTC.
    ///
    /// # Returns
    ///
    /// `None` when the tick count is outside the range `time` can represent.
    #[must_use]
    pub fn to_offset_date_time(self) -> Option<OffsetDateTime> {
        let nanos = (i128::from(self.0) - i128::from(UNIX_EPOCH_TICKS)) * NANOS_PER_TICK;
        OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
    }
}

impl fmt::Display for DateTimeTicks {
    /// Formats as `yyyy-MM-dd HH:mm:ss UTC`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_offset_date_time() {
            Some(dt) => write!(
                f,
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02} UTC",
                dt.year(),
                u8::from(dt.month()),
                dt.day(),
                dt.hour(),
                dt.minute(),
                dt.second()
            ),
            None => write!(f, "<out of range>"),
        }
    }
}

impl SlotValue<i64> for DateTimeTicks {
    #[inline]
    fn encode(self) -> i64 {
        self.0
    }

    #[inline]
    fn decode(raw: i64) -> Self {
        Self(raw)
    }
}

/// A signed duration in 100 ns ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSpanTicks(pub i64);

impl TimeSpanTicks {
    /// The empty duration.
    pub const ZERO: Self = Self(0);

    /// Raw tick count.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> i64 {
        self.0
    }

    /// Duration of `secs` whole seconds.
    #[must_use]
    pub const fn from_seconds(secs: i64) -> Self {
        Self(secs.saturating_mul(TICKS_PER_SECOND))
    }

    /// Duration in fractional seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / TICKS_PER_SECOND as f64
    }
}

impl From<std::time::Duration> for TimeSpanTicks {
    fn from(value: std::time::Duration) -> Self {
        let ticks = value.as_nanos() / 100;
        Self(i64::try_from(ticks).unwrap_or(i64::MAX))
    }
}

impl fmt::Display for TimeSpanTicks {
    /// Formats as `hh:mm:ss`, or `d.hh:mm:ss` when at least a day long.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            f.write_str("-")?;
        }
        let total = self.0.unsigned_abs() / TICKS_PER_SECOND.unsigned_abs();
        let days = total / SECONDS_PER_DAY;
        let rest = total % SECONDS_PER_DAY;
        let (hours, minutes, seconds) = (rest / 3600, rest % 3600 / 60, rest % 60);
        if days > 0 {
            write!(f, "{days}.{hours:02}:{minutes:02}:{seconds:02}")
        } else {
            write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
        }
    }
}

impl SlotValue<i64> for TimeSpanTicks {
    #[inline]
    fn encode(self) -> i64 {
        self.0
    }

    #[inline]
    fn decode(raw: i64) -> Self {
        Self(raw)
    }
}
