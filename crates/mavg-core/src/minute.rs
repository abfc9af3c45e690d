//! Minute-aligned instants.
//!
//! Every window edge, bucket key and output label in the engine is a whole
//! minute. [`Minute`] stores it as a count of minutes since the Unix epoch so
//! that sliding the window is plain integer arithmetic.

use std::fmt;

use chrono::{DateTime, NaiveDateTime};

/// Microseconds in one minute. Event timestamps carry microsecond precision.
pub const MICROS_PER_MINUTE: i64 = 60_000_000;

/// Format used when rendering a minute as an output label.
pub const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A minute-aligned instant, counted in whole minutes since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Minute(i64);

impl Minute {
    /// Build a minute from its index (minutes since the Unix epoch).
    pub const fn from_index(index: i64) -> Self {
        Self(index)
    }

    /// Minutes since the Unix epoch.
    pub const fn index(self) -> i64 {
        self.0
    }

    /// The start of the minute containing `micros`.
    pub const fn floor_micros(micros: i64) -> Self {
        Self(micros.div_euclid(MICROS_PER_MINUTE))
    }

    /// The first minute start at or after `micros`.
    ///
    /// An instant exactly on a boundary maps to that boundary; anything past
    /// it maps to the next one.
    pub const fn ceil_micros(micros: i64) -> Self {
        let floor = micros.div_euclid(MICROS_PER_MINUTE);
        if micros.rem_euclid(MICROS_PER_MINUTE) == 0 {
            Self(floor)
        } else {
            Self(floor + 1)
        }
    }

    /// The start of the minute containing `at`.
    pub fn floor_of(at: &NaiveDateTime) -> Self {
        Self::floor_micros(timestamp_micros(at))
    }

    /// The first minute start at or after `at`.
    pub fn ceil_of(at: &NaiveDateTime) -> Self {
        Self::ceil_micros(timestamp_micros(at))
    }

    /// Whether `micros` falls exactly on a minute boundary.
    pub const fn is_aligned(micros: i64) -> bool {
        micros.rem_euclid(MICROS_PER_MINUTE) == 0
    }

    /// Microseconds since the Unix epoch at the start of this minute.
    pub const fn start_micros(self) -> i64 {
        self.0.saturating_mul(MICROS_PER_MINUTE)
    }

    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub const fn prev(self) -> Self {
        Self(self.0 - 1)
    }

    /// This minute moved `minutes` into the past.
    pub const fn minus(self, minutes: u32) -> Self {
        Self(self.0 - minutes as i64)
    }

    /// Convert back to a calendar timestamp, if representable.
    pub fn to_datetime(self) -> Option<NaiveDateTime> {
        let secs = self.0.checked_mul(60)?;
        DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
    }
}

impl fmt::Display for Minute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format(LABEL_FORMAT)),
            None => write!(f, "minute#{}", self.0),
        }
    }
}

/// Microseconds since the Unix epoch, treating `at` as UTC.
pub fn timestamp_micros(at: &NaiveDateTime) -> i64 {
    at.and_utc().timestamp_micros()
}
