//! Time-of-day sale distribution in 10-minute buckets

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;

/// Width of a distribution bucket in minutes
pub const BUCKET_MINUTES: u32 = 10;

/// Local wall-clock slot, floored to [`BUCKET_MINUTES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeBucket {
    hour: u32,
    minute: u32,
}

impl TimeBucket {
    pub fn from_time(time: NaiveTime) -> Self {
        Self {
            hour: time.hour(),
            minute: (time.minute() / BUCKET_MINUTES) * BUCKET_MINUTES,
        }
    }

    /// Bucket for a UTC instant as seen in `tz`.
    pub fn at(instant: DateTime<Utc>, tz: Tz) -> Self {
        Self::from_time(instant.with_timezone(&tz).time())
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Units sold per bucket, rebuilt from the sales event log
#[derive(Debug, Clone)]
pub struct TimeDistribution {
    tz: Tz,
    buckets: BTreeMap<TimeBucket, i64>,
}

impl TimeDistribution {
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            buckets: BTreeMap::new(),
        }
    }

    /// Add a logged delta; undo bookkeeping and zero deltas are ignored.
    pub fn record(&mut self, at: DateTime<Utc>, delta: i32) {
        if delta <= 0 {
            return;
        }
        *self.buckets.entry(TimeBucket::at(at, self.tz)).or_insert(0) += i64::from(delta);
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// `[("HH:MM", units), ...]` in time order.
    pub fn into_series(self) -> Vec<(String, i64)> {
        self.buckets
            .into_iter()
            .map(|(bucket, units)| (bucket.to_string(), units))
            .collect()
    }
}
