//! DST policy: a spring-forward gap resolves to the first valid instant
//! after the gap (the transition itself); a fall-back fold resolves to the
//! first, earlier occurrence. The policy is one shared post-processing step,
//! so every cycle kind lands on the identical instant.

use datecycle::{AlarmSchedule, CycleSpec, TimeOfDay, Weekday};
use jiff::Zoned;

fn zoned(s: &str) -> Zoned {
    s.parse().expect("valid zoned datetime")
}

fn schedule(cycle: CycleSpec, hour: u8, minute: u8) -> AlarmSchedule {
    AlarmSchedule::new(cycle, TimeOfDay::new(hour, minute), "America/New_York")
}

// March 8, 2026: America/New_York skips from 02:00 to 03:00.
// November 1, 2026: 02:00 falls back to 01:00, repeating 01:00-02:00.

#[test]
fn spring_forward_gap_resolves_to_gap_end() {
    let s = schedule(
        CycleSpec::Weekly {
            days_of_week: vec![Weekday::Sunday],
            interval: 1,
        },
        2,
        30,
    );
    let now = zoned("2026-03-07T12:00:00-05:00[America/New_York]");

    // 02:30 does not exist on Mar 8; the alarm fires at 03:00 EDT sharp.
    let next = s.next_fire(&now).unwrap();
    assert_eq!(next.date(), jiff::civil::date(2026, 3, 8));
    assert_eq!(next.time().hour(), 3);
    assert_eq!(next.time().minute(), 0);
    assert_eq!(next.offset(), jiff::tz::offset(-4));
}

#[test]
fn gap_policy_is_identical_across_cycle_kinds() {
    let kinds = vec![
        CycleSpec::Weekly {
            days_of_week: vec![Weekday::Sunday],
            interval: 1,
        },
        CycleSpec::MonthlyByDate {
            day_of_month: 8,
            interval: 1,
        },
        // March 8, 2026 is also the second Sunday of the month.
        CycleSpec::MonthlyRelative {
            week_of_month: 2,
            day_of_week: Weekday::Sunday,
            interval: 1,
        },
        CycleSpec::Annual {
            month: 3,
            day_of_month: 8,
            interval: 1,
        },
        CycleSpec::CustomDays {
            interval_days: 1,
            anchor_date: jiff::civil::date(2026, 3, 1),
        },
    ];
    let now = zoned("2026-03-07T12:00:00-05:00[America/New_York]");

    let expected = zoned("2026-03-08T03:00:00-04:00[America/New_York]").timestamp();
    for cycle in kinds {
        let s = schedule(cycle, 2, 30);
        let next = s.next_fire(&now).unwrap();
        assert_eq!(next.timestamp(), expected, "{s}");
    }
}

#[test]
fn gap_start_time_also_resolves_to_gap_end() {
    let s = schedule(
        CycleSpec::CustomDays {
            interval_days: 1,
            anchor_date: jiff::civil::date(2026, 3, 1),
        },
        2,
        0,
    );
    let now = zoned("2026-03-08T00:00:00-05:00[America/New_York]");

    let next = s.next_fire(&now).unwrap();
    assert_eq!(
        next.timestamp(),
        zoned("2026-03-08T03:00:00-04:00[America/New_York]").timestamp()
    );
}

#[test]
fn fall_back_fold_takes_the_earlier_occurrence() {
    let s = schedule(
        CycleSpec::Weekly {
            days_of_week: vec![Weekday::Sunday],
            interval: 1,
        },
        1,
        30,
    );
    let now = zoned("2026-10-31T12:00:00-04:00[America/New_York]");

    // 01:30 happens twice on Nov 1; the first pass is still on EDT.
    let next = s.next_fire(&now).unwrap();
    assert_eq!(next.date(), jiff::civil::date(2026, 11, 1));
    assert_eq!(next.time().hour(), 1);
    assert_eq!(next.time().minute(), 30);
    assert_eq!(next.offset(), jiff::tz::offset(-4));
}

#[test]
fn fold_resolution_is_deterministic() {
    let s = schedule(
        CycleSpec::MonthlyByDate {
            day_of_month: 1,
            interval: 1,
        },
        1,
        30,
    );
    let now = zoned("2026-10-31T12:00:00-04:00[America/New_York]");

    let a = s.next_fire(&now).unwrap();
    let b = s.next_fire(&now).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.offset(), jiff::tz::offset(-4));
}

#[test]
fn unaffected_times_pass_through_a_transition_day_unchanged() {
    let s = schedule(
        CycleSpec::CustomDays {
            interval_days: 1,
            anchor_date: jiff::civil::date(2026, 3, 1),
        },
        12,
        0,
    );
    let now = zoned("2026-03-08T00:00:00-05:00[America/New_York]");

    let next = s.next_fire(&now).unwrap();
    assert_eq!(next.time().hour(), 12);
    assert_eq!(next.offset(), jiff::tz::offset(-4));
}

#[test]
fn re_anchoring_across_a_gap_stays_strictly_increasing() {
    let s = schedule(
        CycleSpec::CustomDays {
            interval_days: 1,
            anchor_date: jiff::civil::date(2026, 3, 1),
        },
        2,
        30,
    );
    let mut current = zoned("2026-03-06T00:00:00-05:00[America/New_York]");

    // Mar 6 02:30 EST, Mar 7 02:30 EST, Mar 8 03:00 EDT, Mar 9 02:30 EDT.
    let mut hours = Vec::new();
    for _ in 0..4 {
        let next = s.next_fire(&current).unwrap();
        assert!(next > current);
        hours.push(next.time().hour());
        current = next;
    }
    assert_eq!(hours, vec![2, 2, 3, 2]);
}
