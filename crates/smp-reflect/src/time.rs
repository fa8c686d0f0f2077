// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Simulation time quantities carried by [`AnySimple`](crate::AnySimple).
//!
//! Both types are signed 64-bit nanosecond tick counts. `DateTime` ticks are
//! relative to the simulation epoch chosen by the host (the reflection layer
//! never interprets it).

use std::fmt;
use std::ops::{Add, Neg, Sub};

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;

/// Signed time span in nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(pub i64);

impl Duration {
    /// Zero-length duration.
    pub const ZERO: Duration = Duration(0);

    /// Create from raw nanosecond ticks.
    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    /// Raw nanosecond ticks.
    pub const fn ticks(self) -> i64 {
        self.0
    }

    /// Create from whole calendar components.
    ///
    /// Spans beyond the `i64` nanosecond range wrap.
    pub fn from_components(days: i32, hours: i16, minutes: i16, seconds: i16, nanos: i32) -> Self {
        let secs = i64::from(days) * SECONDS_PER_DAY
            + i64::from(hours) * SECONDS_PER_HOUR
            + i64::from(minutes) * SECONDS_PER_MINUTE
            + i64::from(seconds);
        Self(
            secs.wrapping_mul(NANOS_PER_SECOND)
                .wrapping_add(i64::from(nanos)),
        )
    }

    /// Create from fractional seconds (rounded to the nearest nanosecond).
    pub fn from_secs_f64(seconds: f64) -> Self {
        Self((seconds * NANOS_PER_SECOND as f64).round() as i64)
    }

    /// Fractional seconds.
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / NANOS_PER_SECOND as f64
    }

    /// Split into (days, hours, minutes, seconds, nanoseconds).
    ///
    /// Negative durations yield components that are all non-positive.
    pub fn components(self) -> (i32, i16, i16, i16, i32) {
        let nanos = (self.0 % NANOS_PER_SECOND) as i32;
        let mut secs = self.0 / NANOS_PER_SECOND;
        let days = (secs / SECONDS_PER_DAY) as i32;
        secs %= SECONDS_PER_DAY;
        let hours = (secs / SECONDS_PER_HOUR) as i16;
        secs %= SECONDS_PER_HOUR;
        let minutes = (secs / SECONDS_PER_MINUTE) as i16;
        let seconds = (secs % SECONDS_PER_MINUTE) as i16;
        (days, hours, minutes, seconds, nanos)
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Duration {
        Duration(self.0.wrapping_sub(rhs.0))
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        Duration(self.0.wrapping_neg())
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let nanos = magnitude % NANOS_PER_SECOND as u64;
        let secs = magnitude / NANOS_PER_SECOND as u64;
        write!(
            f,
            "{}{}.{:02}:{:02}:{:02}.{:09}",
            sign,
            secs / SECONDS_PER_DAY as u64,
            secs % SECONDS_PER_DAY as u64 / SECONDS_PER_HOUR as u64,
            secs % SECONDS_PER_HOUR as u64 / SECONDS_PER_MINUTE as u64,
            secs % SECONDS_PER_MINUTE as u64,
            nanos
        )
    }
}

/// Point in simulation time, in nanoseconds since the host's epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime(pub i64);

impl DateTime {
    /// Create from raw nanosecond ticks.
    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    /// Raw nanosecond ticks.
    pub const fn ticks(self) -> i64 {
        self.0
    }
}

impl Add<Duration> for DateTime {
    type Output = DateTime;

    fn add(self, rhs: Duration) -> DateTime {
        DateTime(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for DateTime {
    type Output = Duration;

    fn sub(self, rhs: DateTime) -> Duration {
        Duration(self.0.wrapping_sub(rhs.0))
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T+{}", Duration(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_components_roundtrip() {
        let d = Duration::from_components(2, 3, 4, 5, 6);
        assert_eq!(d.components(), (2, 3, 4, 5, 6));
        assert_eq!(d.to_string(), "2.03:04:05.000000006");
    }

    #[test]
    fn test_duration_seconds() {
        let d = Duration::from_secs_f64(1.5);
        assert_eq!(d.ticks(), 1_500_000_000);
        assert_eq!(d.as_secs_f64(), 1.5);
        assert_eq!((-d).to_string(), "-0.00:00:01.500000000");
    }

    #[test]
    fn test_datetime_arithmetic() {
        let t0 = DateTime::from_ticks(1_000);
        let t1 = t0 + Duration::from_ticks(500);
        assert_eq!(t1 - t0, Duration(500));
    }

    #[test]
    fn test_extreme_durations_render_and_wrap() {
        let min = Duration(i64::MIN);
        assert_eq!(min.to_string(), "-106751.23:47:16.854775808");
        assert_eq!(Duration(i64::MAX).to_string(), "106751.23:47:16.854775807");
        assert_eq!(-min, min);
        assert_eq!(min - Duration(1), Duration(i64::MAX));
        assert_eq!(DateTime(i64::MAX) + Duration(1), DateTime(i64::MIN));
        assert_eq!(
            crate::AnySimple::Duration(min).to_string(),
            "-106751.23:47:16.854775808"
        );
    }
}
