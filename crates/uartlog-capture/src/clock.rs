//! Device-time to wall-clock correlation.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Source of the current wall-clock time in Unix microseconds.
pub trait WallClock {
    fn now_us(&self) -> i64;
}

/// The host's system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now_us(&self) -> i64 {
        Utc::now().timestamp_micros()
    }
}

impl<F: Fn() -> i64> WallClock for F {
    fn now_us(&self) -> i64 {
        self()
    }
}

/// Anchors device timestamps to wall time.
///
/// The offset is learned from the first observed record and never changes
/// afterwards, even when the device counter wraps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockCorrelator {
    offset_us: Option<i64>,
}

impl ClockCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the offset if this is the first observation. Returns the offset in force.
    pub fn observe(&mut self, timestamp_us: u32, now_us: i64) -> i64 {
        *self
            .offset_us
            .get_or_insert_with(|| now_us - i64::from(timestamp_us))
    }

    /// Learned offset, if any record has been observed.
    pub fn offset_us(&self) -> Option<i64> {
        self.offset_us
    }

    /// Wall-clock microseconds for a device timestamp. Uninterpreted before the
    /// offset is known.
    pub fn wall_time_us(&self, timestamp_us: u32) -> i64 {
        i64::from(timestamp_us) + self.offset_us.unwrap_or(0)
    }

    /// `HH:MM:SS.mmm` in local time.
    pub fn format(&self, timestamp_us: u32) -> String {
        self.format_in(timestamp_us, &Local)
    }

    /// `HH:MM:SS.mmm` in the given zone, truncated to milliseconds.
    pub fn format_in<Tz: TimeZone>(&self, timestamp_us: u32, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let micros = self.wall_time_us(timestamp_us);
        // Truncate toward negative infinity so sub-millisecond digits never round up.
        let millis = micros.div_euclid(1000);
        match DateTime::from_timestamp_millis(millis) {
            Some(utc) => utc.with_timezone(tz).format("%H:%M:%S%.3f").to_string(),
            None => "--:--:--.---".to_string(),
        }
    }
}
