// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the implementation of `DateTime`.

use std::{
    fmt,
    ops::{Add, Sub},
    str::FromStr,
};

use chrono::{Duration, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::StatusCode;

const NANOS_PER_TICK: i64 = 100;
const TICKS_PER_SECOND: i64 = 10_000_000;
const TICKS_PER_MILLI: i64 = 10_000;

/// Number of 100 nanosecond intervals between 1601-01-01 and 1970-01-01.
pub const UNIX_EPOCH_OFFSET_TICKS: i64 = 116_444_736_000_000_000;

pub type DateTimeUtc = chrono::DateTime<Utc>;

/// A date/time value held as the signed count of 100 nanosecond ticks since
/// 1601-01-01 00:00:00 UTC. Ordering and hashing are on the raw tick count.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Default)]
pub struct DateTime {
    ticks: i64,
}

impl Serialize for DateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.ticks.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D>(deserializer: D) -> Result<DateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ticks = i64::deserialize(deserializer)?;
        Ok(DateTime::from_ticks(ticks))
    }
}

impl Add<Duration> for DateTime {
    type Output = Self;

    fn add(self, duration: Duration) -> Self {
        DateTime::from_ticks(
            self.ticks
                .saturating_add(Self::duration_to_ticks(duration)),
        )
    }
}

impl Sub<DateTime> for DateTime {
    type Output = Duration;

    fn sub(self, other: Self) -> Duration {
        let ticks = self.ticks.saturating_sub(other.ticks);
        Duration::microseconds(ticks / 10) + Duration::nanoseconds((ticks % 10) * NANOS_PER_TICK)
    }
}

impl Sub<Duration> for DateTime {
    type Output = Self;

    fn sub(self, duration: Duration) -> Self {
        DateTime::from_ticks(
            self.ticks
                .saturating_sub(Self::duration_to_ticks(duration)),
        )
    }
}

impl From<DateTimeUtc> for DateTime {
    fn from(date_time: DateTimeUtc) -> Self {
        // Sub-tick nanoseconds are truncated
        let ticks = date_time
            .timestamp()
            .saturating_mul(TICKS_PER_SECOND)
            .saturating_add(date_time.timestamp_subsec_nanos() as i64 / NANOS_PER_TICK)
            .saturating_add(UNIX_EPOCH_OFFSET_TICKS);
        DateTime { ticks }
    }
}

impl From<i64> for DateTime {
    fn from(ticks: i64) -> Self {
        DateTime::from_ticks(ticks)
    }
}

impl From<DateTime> for i64 {
    fn from(value: DateTime) -> Self {
        value.ticks
    }
}

impl From<DateTime> for DateTimeUtc {
    fn from(value: DateTime) -> Self {
        value.as_chrono()
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_chrono().to_rfc3339())
    }
}

impl FromStr for DateTime {
    type Err = StatusCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateTimeUtc::from_str(s).map(DateTime::from).map_err(|e| {
            error!("Cannot parse date {}, error = {}", s, e);
            StatusCode::BadInvalidArgument
        })
    }
}

impl DateTime {
    /// Constructs from a raw tick count
    pub const fn from_ticks(ticks: i64) -> DateTime {
        DateTime { ticks }
    }

    /// Returns the time in ticks, of 100 nanosecond intervals since 1601
    pub const fn ticks(&self) -> i64 {
        self.ticks
    }

    /// Constructs from milliseconds since the Unix epoch
    pub fn from_millis(millis: i64) -> DateTime {
        DateTime::from_ticks(
            millis
                .saturating_mul(TICKS_PER_MILLI)
                .saturating_add(UNIX_EPOCH_OFFSET_TICKS),
        )
    }

    /// Returns milliseconds since the Unix epoch
    pub fn as_millis(&self) -> i64 {
        self.ticks.saturating_sub(UNIX_EPOCH_OFFSET_TICKS) / TICKS_PER_MILLI
    }

    /// Constructs from the current time
    pub fn now() -> DateTime {
        DateTime::from(Utc::now())
    }

    /// Constructs from the current time with an offset
    pub fn now_with_offset(offset: Duration) -> DateTime {
        DateTime::now() + offset
    }

    /// Creates a null date time (i.e. the epoch)
    pub fn null() -> DateTime {
        DateTime::epoch()
    }

    /// Tests if the date time is null (i.e. equal to epoch)
    pub fn is_null(&self) -> bool {
        self.ticks == 0
    }

    /// Constructs a date time for the epoch, Jan 1 1601 00:00:00
    pub fn epoch() -> DateTime {
        DateTime::from_ticks(0)
    }

    /// Constructs a date time for the endtimes, Dec 31 9999 23:59:59, after which times are
    /// represented as `i64::MAX` on the wire.
    pub fn endtimes() -> DateTime {
        match Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).single() {
            Some(dt) => DateTime::from(dt),
            None => DateTime::from_ticks(i64::MAX),
        }
    }

    /// Constructs from a year, month, day, hour, minute, second. Fails if any field is out of range.
    pub fn ymd_hms(
        year: u16,
        month: u16,
        day: u16,
        hour: u16,
        minute: u16,
        second: u16,
    ) -> Result<DateTime, StatusCode> {
        Utc.with_ymd_and_hms(
            year as i32,
            month as u32,
            day as u32,
            hour as u32,
            minute as u32,
            second as u32,
        )
        .single()
        .map(DateTime::from)
        .ok_or_else(|| {
            error!(
                "Invalid date time {}-{}-{} {}:{}:{}",
                year, month, day, hour, minute, second
            );
            StatusCode::BadInvalidArgument
        })
    }

    /// Constructs from a year, month, day
    pub fn ymd(year: u16, month: u16, day: u16) -> Result<DateTime, StatusCode> {
        DateTime::ymd_hms(year, month, day, 0, 0, 0)
    }

    /// Time as chrono
    pub fn as_chrono(&self) -> DateTimeUtc {
        let unix_ticks = self.ticks as i128 - UNIX_EPOCH_OFFSET_TICKS as i128;
        let secs = unix_ticks.div_euclid(TICKS_PER_SECOND as i128) as i64;
        let nanos = (unix_ticks.rem_euclid(TICKS_PER_SECOND as i128) as i64 * NANOS_PER_TICK) as u32;
        Utc.timestamp_opt(secs, nanos)
            .single()
            .unwrap_or(if secs < 0 {
                DateTimeUtc::MIN_UTC
            } else {
                DateTimeUtc::MAX_UTC
            })
    }

    fn duration_to_ticks(duration: Duration) -> i64 {
        // Whole seconds are split off first so nanoseconds cannot overflow
        let seconds_part = Duration::seconds(duration.num_seconds());
        let nanos = (duration - seconds_part).num_nanoseconds().unwrap_or(0);
        duration
            .num_seconds()
            .saturating_mul(TICKS_PER_SECOND)
            .saturating_add(nanos / NANOS_PER_TICK)
    }
}
