use std::sync::LazyLock;

use jiff::civil::{Date, Time};
use jiff::tz::{AmbiguousOffset, TimeZone};
use jiff::Zoned;

use crate::error::InvalidScheduleError;
use crate::schedule::{AlarmSchedule, CycleSpec, TimeOfDay, Weekday};

/// Epoch anchor for multi-week intervals: Monday 1970-01-05. Used when a
/// schedule carries no creation-date anchor.
static EPOCH_MONDAY: LazyLock<Date> = LazyLock::new(|| Date::new(1970, 1, 5).unwrap());

/// Resolve the timezone for a schedule. There is no fallback: an unknown
/// identifier is a caller bug and must surface.
fn resolve_tz(name: &str) -> Result<TimeZone, InvalidScheduleError> {
    TimeZone::get(name).map_err(|e| InvalidScheduleError::timezone(name, e.to_string()))
}

/// Convert a validated TimeOfDay to a jiff Time.
fn to_time(tod: TimeOfDay) -> Time {
    Time::new(tod.hour as i8, tod.minute as i8, 0, 0).unwrap()
}

/// Resolve a local calendar date + wall-clock time to an absolute instant
/// under the timezone's rules for that specific date.
///
/// This is the single DST post-processing step shared by every cycle kind:
/// - a skipped wall-clock time (spring-forward gap) resolves to the first
///   valid instant after the gap, i.e. the transition itself;
/// - a repeated wall-clock time (fall-back fold) resolves to the first,
///   earlier occurrence.
fn resolve_local(date: Date, time: Time, tz: &TimeZone) -> Result<Zoned, InvalidScheduleError> {
    let dt = date.to_datetime(time);
    let ambiguous = tz.to_ambiguous_timestamp(dt);
    match ambiguous.offset() {
        AmbiguousOffset::Unambiguous { .. } | AmbiguousOffset::Fold { .. } => {
            let ts = ambiguous
                .earlier()
                .map_err(|e| InvalidScheduleError::compute(format!("{e}")))?;
            Ok(ts.to_zoned(tz.clone()))
        }
        AmbiguousOffset::Gap { .. } => {
            // `earlier` lands just before the skipped range; the next
            // transition after it is the end of the gap.
            let before_gap = ambiguous
                .earlier()
                .map_err(|e| InvalidScheduleError::compute(format!("{e}")))?;
            match tz.following(before_gap).next() {
                Some(transition) => Ok(transition.timestamp().to_zoned(tz.clone())),
                None => Err(InvalidScheduleError::compute(
                    "missing timezone transition after a DST gap",
                )),
            }
        }
    }
}

/// Last day of a month. Errors when the month falls outside jiff's
/// supported calendar range.
fn last_day_of_month(year: i16, month: i8) -> Result<Date, InvalidScheduleError> {
    if month == 12 {
        // December always has 31 days; no need to reach into the next year.
        return Date::new(year, 12, 31).map_err(|e| InvalidScheduleError::compute(format!("{e}")));
    }
    Date::new(year, month + 1, 1)
        .map_err(|e| InvalidScheduleError::compute(format!("{e}")))?
        .yesterday()
        .map_err(|e| InvalidScheduleError::compute(format!("{e}")))
}

/// Nth occurrence of a weekday in a month (1-indexed). Returns None if it
/// doesn't exist; the 1st through 4th occurrences always do.
fn nth_weekday_of_month(year: i16, month: i8, weekday: Weekday, n: u8) -> Option<Date> {
    let target_wd = weekday.to_jiff();
    let first = Date::new(year, month, 1).ok()?;
    let mut d = first;
    while d.weekday() != target_wd {
        d = d.tomorrow().ok()?;
    }
    for _ in 1..n {
        d = d.checked_add(jiff::Span::new().days(7)).ok()?;
    }
    if d.month() != month {
        None
    } else {
        Some(d)
    }
}

/// Last occurrence of a weekday in a month.
fn last_weekday_in_month(
    year: i16,
    month: i8,
    weekday: Weekday,
) -> Result<Date, InvalidScheduleError> {
    let target_wd = weekday.to_jiff();
    let mut d = last_day_of_month(year, month)?;
    while d.weekday() != target_wd {
        d = d
            .yesterday()
            .map_err(|e| InvalidScheduleError::compute(format!("{e}")))?;
    }
    Ok(d)
}

/// Whole Monday-based weeks between two Mondays.
fn weeks_between(a: Date, b: Date) -> i64 {
    days_between(a, b) / 7
}

/// Signed days between two dates.
fn days_between(a: Date, b: Date) -> i64 {
    a.until(b).unwrap().get_days() as i64
}

/// Step a (year, month) pair forward by a number of months. The arithmetic
/// runs in i64 so an oversized interval surfaces as an error rather than
/// wrapping the year.
fn step_months(year: i16, month: i8, by: i64) -> Result<(i16, i8), InvalidScheduleError> {
    let total = year as i64 * 12 + (month as i64 - 1) + by;
    let target_year = total.div_euclid(12);
    let year = i16::try_from(target_year).map_err(|_| year_out_of_range(target_year))?;
    Ok((year, (total.rem_euclid(12) + 1) as i8))
}

fn year_out_of_range(year: i64) -> InvalidScheduleError {
    InvalidScheduleError::compute(format!("target year {year} is outside the supported range"))
}

fn add_days(date: Date, days: i64) -> Result<Date, InvalidScheduleError> {
    date.checked_add(jiff::Span::new().days(days))
        .map_err(|e| InvalidScheduleError::compute(format!("{e}")))
}

fn exhausted() -> InvalidScheduleError {
    InvalidScheduleError::compute("no next occurrence within the search window")
}

/// Compute the next occurrence of `schedule` strictly after `reference`.
///
/// The result is a [`Zoned`] in the schedule's timezone; take `.timestamp()`
/// for the absolute instant. If `last_fired_at` is later than `reference`,
/// the search anchors there instead, so a stale "now" never re-produces an
/// occurrence that already fired.
pub fn next_fire_date(
    schedule: &AlarmSchedule,
    reference: &Zoned,
) -> Result<Zoned, InvalidScheduleError> {
    schedule.validate()?;
    let tz = resolve_tz(&schedule.timezone)?;
    let time = to_time(schedule.time_of_day);

    let mut reference = reference.with_time_zone(tz.clone());
    if let Some(fired) = schedule.last_fired_at {
        if fired > reference.timestamp() {
            reference = fired.to_zoned(tz.clone());
        }
    }

    match &schedule.cycle {
        CycleSpec::Weekly {
            days_of_week,
            interval,
        } => next_weekly(days_of_week, *interval, time, &tz, schedule.anchor, &reference),
        CycleSpec::MonthlyByDate {
            day_of_month,
            interval,
        } => next_monthly_by_date(*day_of_month, *interval, time, &tz, &reference),
        CycleSpec::MonthlyRelative {
            week_of_month,
            day_of_week,
            interval,
        } => next_monthly_relative(*week_of_month, *day_of_week, *interval, time, &tz, &reference),
        CycleSpec::Annual {
            month,
            day_of_month,
            interval,
        } => next_annual(*month, *day_of_month, *interval, time, &tz, &reference),
        CycleSpec::CustomDays {
            interval_days,
            anchor_date,
        } => next_custom_days(*interval_days, *anchor_date, time, &tz, &reference),
    }
}

/// Compute the next `n` occurrences strictly after `reference`.
pub fn next_n_fire_dates(
    schedule: &AlarmSchedule,
    reference: &Zoned,
    n: usize,
) -> Result<Vec<Zoned>, InvalidScheduleError> {
    Occurrences::new(schedule, reference.clone()).take(n).collect()
}

// --- Per-kind searches ---
//
// Every search works on local calendar dates and converts through
// `resolve_local` exactly once per candidate. Alignment arithmetic makes each
// search check at most two candidates (the aligned week/month/year containing
// the reference, then the next aligned one), so no search loops unbounded.

fn next_weekly(
    days: &[Weekday],
    interval: u32,
    time: Time,
    tz: &TimeZone,
    anchor: Option<Date>,
    reference: &Zoned,
) -> Result<Zoned, InvalidScheduleError> {
    let date = reference.date();

    let mut sorted_days: Vec<Weekday> = days.to_vec();
    sorted_days.sort_by_key(|d| d.number());
    sorted_days.dedup();

    let dow_offset = date.weekday().to_monday_one_offset() as i64 - 1;
    let current_monday = add_days(date, -dow_offset)?;

    let anchor_date = anchor.unwrap_or(*EPOCH_MONDAY);
    let anchor_dow_offset = anchor_date.weekday().to_monday_one_offset() as i64 - 1;
    let anchor_monday = add_days(anchor_date, -anchor_dow_offset)?;

    // Alignment only matters for multi-week intervals; every week is a
    // multiple when interval is 1.
    let weeks_since_anchor = weeks_between(anchor_monday, current_monday);
    let first_aligned_monday = if interval <= 1 {
        current_monday
    } else if weeks_since_anchor < 0 {
        anchor_monday
    } else {
        let remainder = weeks_since_anchor % interval as i64;
        if remainder == 0 {
            current_monday
        } else {
            add_days(current_monday, (interval as i64 - remainder) * 7)?
        }
    };

    let mut monday = first_aligned_monday;
    for _ in 0..2 {
        for wd in &sorted_days {
            let target = add_days(monday, wd.number() as i64 - 1)?;
            let candidate = resolve_local(target, time, tz)?;
            if candidate > *reference {
                return Ok(candidate);
            }
        }
        monday = add_days(monday, interval as i64 * 7)?;
    }

    Err(exhausted())
}

fn next_monthly_by_date(
    day_of_month: u8,
    interval: u32,
    time: Time,
    tz: &TimeZone,
    reference: &Zoned,
) -> Result<Zoned, InvalidScheduleError> {
    let mut year = reference.date().year();
    let mut month = reference.date().month();

    for _ in 0..2 {
        // Month-end overflow: requested day 31 fires on a 30-day month's
        // 30th, and on Feb 28/29 depending on leap year.
        let day = (day_of_month as i8).min(last_day_of_month(year, month)?.day());
        let target = Date::new(year, month, day)
            .map_err(|e| InvalidScheduleError::compute(format!("{e}")))?;
        let candidate = resolve_local(target, time, tz)?;
        if candidate > *reference {
            return Ok(candidate);
        }
        (year, month) = step_months(year, month, interval as i64)?;
    }

    Err(exhausted())
}

fn next_monthly_relative(
    week_of_month: u8,
    day_of_week: Weekday,
    interval: u32,
    time: Time,
    tz: &TimeZone,
    reference: &Zoned,
) -> Result<Zoned, InvalidScheduleError> {
    let mut year = reference.date().year();
    let mut month = reference.date().month();

    for _ in 0..2 {
        // week_of_month 5 means "last", whether or not a 5th week exists.
        let target = if week_of_month == 5 {
            Some(last_weekday_in_month(year, month, day_of_week)?)
        } else {
            nth_weekday_of_month(year, month, day_of_week, week_of_month)
        };
        if let Some(target) = target {
            let candidate = resolve_local(target, time, tz)?;
            if candidate > *reference {
                return Ok(candidate);
            }
        }
        (year, month) = step_months(year, month, interval as i64)?;
    }

    Err(exhausted())
}

fn next_annual(
    month: u8,
    day_of_month: u8,
    interval: u32,
    time: Time,
    tz: &TimeZone,
    reference: &Zoned,
) -> Result<Zoned, InvalidScheduleError> {
    let start_year = reference.date().year();

    for k in 0..2i64 {
        let target_year = start_year as i64 + k * interval as i64;
        let year = i16::try_from(target_year).map_err(|_| year_out_of_range(target_year))?;
        // Feb 29 clamps to Feb 28 in non-leap target years.
        let day = (day_of_month as i8).min(last_day_of_month(year, month as i8)?.day());
        let target = Date::new(year, month as i8, day)
            .map_err(|e| InvalidScheduleError::compute(format!("{e}")))?;
        let candidate = resolve_local(target, time, tz)?;
        if candidate > *reference {
            return Ok(candidate);
        }
    }

    Err(exhausted())
}

fn next_custom_days(
    interval_days: u32,
    anchor_date: Date,
    time: Time,
    tz: &TimeZone,
    reference: &Zoned,
) -> Result<Zoned, InvalidScheduleError> {
    let today = reference.date();
    let offset = days_between(anchor_date, today);

    // Align to the cycle day at or before today (or the anchor itself when
    // the anchor is still in the future), then check that day and the next.
    let k0 = if offset <= 0 {
        0
    } else {
        offset / interval_days as i64
    };

    for k in [k0, k0 + 1] {
        let target = add_days(anchor_date, k * interval_days as i64)?;
        let candidate = resolve_local(target, time, tz)?;
        if candidate > *reference {
            return Ok(candidate);
        }
    }

    Err(exhausted())
}

// --- Occurrence iterators ---

/// Lazy iterator over successive fire instants strictly after a starting
/// point. Because `next_fire_date` is strictly-after, each result re-anchors
/// the next call directly.
pub struct Occurrences<'a> {
    schedule: &'a AlarmSchedule,
    current: Zoned,
}

impl<'a> Occurrences<'a> {
    pub fn new(schedule: &'a AlarmSchedule, from: Zoned) -> Self {
        Self {
            schedule,
            current: from,
        }
    }
}

impl Iterator for Occurrences<'_> {
    type Item = Result<Zoned, InvalidScheduleError>;

    fn next(&mut self) -> Option<Self::Item> {
        match next_fire_date(self.schedule, &self.current) {
            Ok(dt) => {
                self.current = dt.clone();
                Some(Ok(dt))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Bounded iterator for occurrences where from < occurrence <= to.
pub struct BoundedOccurrences<'a> {
    inner: Occurrences<'a>,
    to: Zoned,
}

impl<'a> BoundedOccurrences<'a> {
    pub fn new(schedule: &'a AlarmSchedule, from: Zoned, to: Zoned) -> Self {
        Self {
            inner: Occurrences::new(schedule, from),
            to,
        }
    }
}

impl Iterator for BoundedOccurrences<'_> {
    type Item = Result<Zoned, InvalidScheduleError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next() {
            Some(Ok(dt)) if dt <= self.to => Some(Ok(dt)),
            Some(Ok(_)) => None, // Past end bound
            Some(Err(e)) => Some(Err(e)),
            None => None,
        }
    }
}

/// Create a bounded iterator of occurrences in the range (from, to].
pub fn between<'a>(
    schedule: &'a AlarmSchedule,
    from: &Zoned,
    to: &Zoned,
) -> BoundedOccurrences<'a> {
    BoundedOccurrences::new(schedule, from.clone(), to.clone())
}
