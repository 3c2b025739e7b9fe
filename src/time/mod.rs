//! Remaining-time arithmetic
//!
//! The countdown is a pure function of two instants: the launch target and
//! a sample of the wall clock. [`tick`] turns that pair into a
//! [`RemainingDuration`], the days/hours/minutes/seconds breakdown shown on
//! the coming-soon page.

#[doc(hidden)]
pub mod datetime;
#[doc(hidden)]
pub mod duration;
mod human;

use std::fmt;

use chrono::prelude::*;
use serde::Serialize;

pub use datetime::parse_target;
pub use human::DurationExt;

pub const MILLIS_PER_SECOND: u64 = 1000;
pub const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

/// Time left until the launch, broken down into display units
///
/// Always the floor-division decomposition of a non-negative millisecond
/// delta, so `hours < 24`, `minutes < 60` and `seconds < 60`. The
/// sub-second remainder is dropped. A target in the past yields
/// [`RemainingDuration::ZERO`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize)]
pub struct RemainingDuration {
    days: u64,
    hours: u8,
    minutes: u8,
    seconds: u8,
}

impl RemainingDuration {
    pub const ZERO: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Decompose a millisecond delta, clamping anything not in the future to zero
    pub fn from_millis(delta: i64) -> Self {
        if delta <= 0 {
            return Self::ZERO;
        }

        let delta = delta.unsigned_abs();

        Self {
            days: delta / MILLIS_PER_DAY,
            hours: ((delta % MILLIS_PER_DAY) / MILLIS_PER_HOUR) as u8,
            minutes: ((delta % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE) as u8,
            seconds: ((delta % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND) as u8,
        }
    }

    pub fn days(&self) -> u64 {
        self.days
    }

    pub fn hours(&self) -> u8 {
        self.hours
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    /// All four fields as a tuple, largest unit first
    pub fn parts(&self) -> (u64, u8, u8, u8) {
        (self.days, self.hours, self.minutes, self.seconds)
    }

    /// Check if the countdown has run out
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Whole seconds represented by this breakdown
    pub fn total_seconds(&self) -> u64 {
        self.as_millis() / MILLIS_PER_SECOND
    }

    /// Milliseconds represented by this breakdown, always a multiple of 1000
    pub fn as_millis(&self) -> u64 {
        self.days * MILLIS_PER_DAY
            + u64::from(self.hours) * MILLIS_PER_HOUR
            + u64::from(self.minutes) * MILLIS_PER_MINUTE
            + u64::from(self.seconds) * MILLIS_PER_SECOND
    }

    /// The labelled units in the order the page lays them out
    pub fn units(&self) -> [Unit; 4] {
        [
            Unit::new("DAYS", self.days),
            Unit::new("HOURS", self.hours.into()),
            Unit::new("MINUTES", self.minutes.into()),
            Unit::new("SECONDS", self.seconds.into()),
        ]
    }
}

/// Formats as `DD:HH:MM:SS`, each field padded to at least two digits
impl fmt::Display for RemainingDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// One labelled block of the countdown display
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Unit {
    pub label: &'static str,
    pub value: u64,
}

impl Unit {
    fn new(label: &'static str, value: u64) -> Self {
        Self { label, value }
    }
}

/// Compute the time remaining from `now` until `target`
pub fn tick(target: DateTime<Local>, now: DateTime<Local>) -> RemainingDuration {
    RemainingDuration::from_millis((target - now).num_milliseconds())
}
