//! datecycle: date-cycle engine for recurring alarms.
//!
//! Given an alarm's recurrence rule (weekly, monthly-by-date,
//! monthly-relative, annual, or a custom day interval), a wall-clock
//! time-of-day, and an IANA timezone, compute the next instant the alarm
//! should fire, with month-end overflow, leap years, and DST transitions
//! handled.
//!
//! # Examples
//!
//! ```
//! use datecycle::{AlarmSchedule, CycleSpec, TimeOfDay, Weekday};
//!
//! let schedule = AlarmSchedule::new(
//!     CycleSpec::Weekly {
//!         days_of_week: vec![Weekday::Monday],
//!         interval: 1,
//!     },
//!     TimeOfDay::new(9, 0),
//!     "America/New_York",
//! );
//! let now: jiff::Zoned = "2026-03-03T12:00:00-05:00[America/New_York]".parse().unwrap();
//! let next = schedule.next_fire(&now).unwrap();
//! assert_eq!(next.date().day(), 9); // the following Monday
//! ```

pub mod display;
pub mod error;
pub mod eval;
pub mod schedule;

pub use error::InvalidScheduleError;
pub use eval::{next_fire_date, BoundedOccurrences, Occurrences};
pub use schedule::{AlarmSchedule, CycleSpec, TimeOfDay, Weekday};

use jiff::Zoned;

// --- AlarmSchedule convenience methods ---

impl AlarmSchedule {
    /// Compute the next fire instant strictly after `reference`.
    pub fn next_fire(&self, reference: &Zoned) -> Result<Zoned, InvalidScheduleError> {
        eval::next_fire_date(self, reference)
    }

    /// Compute the next `n` fire instants strictly after `reference`.
    pub fn next_fires(
        &self,
        reference: &Zoned,
        n: usize,
    ) -> Result<Vec<Zoned>, InvalidScheduleError> {
        eval::next_n_fire_dates(self, reference, n)
    }

    /// Lazy iterator over fire instants strictly after `from`.
    pub fn occurrences(&self, from: &Zoned) -> Occurrences<'_> {
        Occurrences::new(self, from.clone())
    }

    /// Iterator over fire instants in the range (from, to].
    pub fn between(&self, from: &Zoned, to: &Zoned) -> BoundedOccurrences<'_> {
        eval::between(self, from, to)
    }

    /// Set the anchor date for multi-week intervals.
    pub fn with_anchor(mut self, date: jiff::civil::Date) -> Self {
        self.anchor = Some(date);
        self
    }

    /// Record the most recent fire instant.
    pub fn with_last_fired(mut self, at: jiff::Timestamp) -> Self {
        self.last_fired_at = Some(at);
        self
    }
}
