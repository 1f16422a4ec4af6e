//! Source of the current local time.

use chrono::{NaiveDate, NaiveDateTime};

/// Supplies the shop-local wall-clock time.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Today's date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall clock in the server's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    /// Stopped at `now`.
    #[must_use]
    pub const fn at(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Stopped at midnight on `date`.
    #[must_use]
    pub fn on(date: NaiveDate) -> Self {
        Self::at(date.and_time(chrono::NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}
